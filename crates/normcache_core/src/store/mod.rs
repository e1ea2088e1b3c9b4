//! Store-side contracts and reference implementations.
//!
//! # Responsibility
//! - Define the prior-state lookup the normalizers consume.
//! - Define how an emission is applied by whoever owns the cache.
//!
//! # Invariants
//! - `apply` is all-or-nothing per emission.
//! - Applying entities is last-applied-wins per `(kind, id)`.
//!
//! # See also
//! - `crate::emitter` for the emission shape.

use crate::db::DbError;
use crate::emitter::Emission;
use crate::model::entity::Entity;
use crate::model::id::{EntityId, EntityKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "entity serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored entity data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Read access to previously cached entities, keyed by kind and id.
pub trait PriorLookup {
    fn prior_by_id(&self, kind: EntityKind, id: &EntityId) -> Option<Entity>;
}

/// Lookup for a cold cache: every sighting is the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrior;

impl PriorLookup for NoPrior {
    fn prior_by_id(&self, _kind: EntityKind, _id: &EntityId) -> Option<Entity> {
        None
    }
}

/// The owner of the canonical cache.
pub trait EntityStore: PriorLookup {
    /// Applies every command of one emission, atomically.
    fn apply(&mut self, emission: &Emission) -> StoreResult<()>;
    fn entity(&self, kind: EntityKind, id: &EntityId) -> StoreResult<Option<Entity>>;
    fn count(&self, kind: EntityKind) -> StoreResult<usize>;
}
