//! Entity model for the normalized cache.
//!
//! # Responsibility
//! - Define inbound payload shapes (`raw`) and store-ready shapes.
//! - Keep one identity type (`EntityId`) across both.
//!
//! # Invariants
//! - Canonical shapes never embed other entities; they hold ids.
//! - Raw shapes never fail on malformed nested fragments.

pub mod account;
pub mod emoji;
pub mod entity;
pub mod filter;
pub mod id;
pub mod job;
pub(crate) mod lenient;
pub mod organization;
pub mod poll;
pub mod post;
pub mod raw;
