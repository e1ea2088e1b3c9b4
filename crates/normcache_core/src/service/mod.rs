//! Transport-boundary services.
//!
//! # Responsibility
//! - Run the import pipeline for a delivered batch and hand the result to a store.
//! - Keep transports decoupled from walker, normalizer and storage details.

pub mod import_service;
