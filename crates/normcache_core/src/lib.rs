//! Normalized entity cache importer.
//!
//! Flattens nested API payloads (posts, accounts, polls, filters,
//! organizations, jobs) into per-type, id-unique, normalized collections and
//! hands them to a store as one ordered emission per batch.

pub mod collector;
pub mod config;
pub mod db;
pub mod emitter;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod service;
pub mod store;
pub mod walker;

pub use collector::{Collected, Merge, UniqueCollector};
pub use config::{ConfigError, DedupStrategy, ImportConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use emitter::{BatchEmitter, Emission, ImportCommand, RawBatch};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{CanonicalEntity, Entity};
pub use model::id::{EntityId, EntityKind, Identified};
pub use normalize::{build_poll, normalize_all, Normalize};
pub use service::import_service::{ImportError, ImportReport, ImportResult, ImportService};
pub use store::memory_store::MemoryStore;
pub use store::sqlite_store::SqliteStore;
pub use store::{EntityStore, NoPrior, PriorLookup, StoreError, StoreResult};
pub use walker::{GraphWalker, NormalizedBatch, WalkOutput};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
