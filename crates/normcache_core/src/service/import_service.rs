//! Import use-case service.
//!
//! # Responsibility
//! - Decode a delivered batch, emit it against the store's prior state, and
//!   apply the emission.
//! - Adapt callback-style and future-style fetch completions.
//!
//! # Invariants
//! - A failed or aborted fetch never reaches the pipeline; nothing is emitted.
//! - One delivered batch produces at most one emission and one store apply.

use crate::config::ImportConfig;
use crate::emitter::{BatchEmitter, RawBatch};
use crate::model::id::EntityKind;
use crate::store::{EntityStore, StoreError};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use uuid::Uuid;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug)]
pub enum ImportError {
    Decode(serde_json::Error),
    Store(StoreError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "batch decode failed: {err}"),
            Self::Store(err) => write!(f, "store apply failed: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Summary of one applied emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub batch_id: Uuid,
    /// Command type names, in emission order.
    pub commands: Vec<String>,
    pub counts: BTreeMap<EntityKind, usize>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Import pipeline bound to one store.
pub struct ImportService<S: EntityStore> {
    store: S,
    config: ImportConfig,
}

impl<S: EntityStore> ImportService<S> {
    pub fn new(store: S, config: ImportConfig) -> Self {
        Self { store, config }
    }

    /// Emits `batch` against the current store contents and applies it.
    pub fn import(&mut self, batch: &RawBatch) -> ImportResult<ImportReport> {
        let emission = BatchEmitter::new(&self.store, &self.config).emit(batch);
        self.store.apply(&emission)?;

        let report = ImportReport {
            batch_id: emission.batch_id,
            commands: emission
                .commands
                .iter()
                .map(|command| command.name().to_string())
                .collect(),
            counts: emission.counts(),
        };
        info!(
            "event=import module=service status=ok batch_id={} entities={}",
            report.batch_id,
            report.total()
        );
        Ok(report)
    }

    pub fn import_json(&mut self, text: &str) -> ImportResult<ImportReport> {
        let batch = RawBatch::from_json_str(text)?;
        self.import(&batch)
    }

    /// Completion callback for a fetch. Failures are logged and dropped.
    pub fn complete_fetch<E: Display>(
        &mut self,
        fetched: Result<RawBatch, E>,
    ) -> ImportResult<Option<ImportReport>> {
        match fetched {
            Ok(batch) => self.import(&batch).map(Some),
            Err(err) => {
                warn!("event=import module=service status=skip reason=fetch_failed error={err}");
                Ok(None)
            }
        }
    }

    /// Awaits `fetch`, then imports what it delivered.
    pub async fn import_when_ready<F, E>(&mut self, fetch: F) -> ImportResult<Option<ImportReport>>
    where
        F: Future<Output = Result<RawBatch, E>>,
        E: Display,
    {
        let fetched = fetch.await;
        self.complete_fetch(fetched)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
