//! SQLite-backed entity cache.
//!
//! # Responsibility
//! - Persist canonical entities as JSON bodies keyed by `(kind, id)`.
//! - Record every applied emission in `emission_log`.
//!
//! # Invariants
//! - One emission is applied inside one immediate transaction.
//! - Upserts replace the whole body; merging already happened upstream.
//! - A stored body that no longer decodes counts as "no prior"; the next
//!   upsert repairs it.
//! - Any other prior read failure is remembered, and the next `apply` is
//!   refused so an emission built without its priors never overwrites them.

use super::{EntityStore, PriorLookup, StoreError, StoreResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::emitter::Emission;
use crate::model::entity::Entity;
use crate::model::id::{EntityId, EntityKind};
use log::{error, info, warn};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::cell::RefCell;
use std::time::Instant;
use uuid::Uuid;

/// Store over a migrated connection owned by the caller.
pub struct SqliteStore<'conn> {
    conn: &'conn mut Connection,
    /// First prior read failure since the last `apply`.
    lookup_failure: RefCell<Option<String>>,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn mut Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self {
            conn,
            lookup_failure: RefCell::new(None),
        })
    }

    /// Batch ids in application order.
    pub fn applied_batches(&self) -> StoreResult<Vec<Uuid>> {
        let mut stmt = self
            .conn
            .prepare("SELECT batch_id FROM emission_log ORDER BY seq ASC;")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut batches = Vec::new();
        for row in rows {
            let text = row?;
            let batch_id = Uuid::parse_str(&text).map_err(|_| {
                StoreError::InvalidData(format!("invalid batch id `{text}` in emission_log"))
            })?;
            batches.push(batch_id);
        }
        Ok(batches)
    }

    fn load(&self, kind: EntityKind, id: &EntityId) -> StoreResult<Option<Entity>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM entities WHERE kind = ?1 AND id = ?2;",
                params![kind.as_str(), id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| Entity::from_json(kind, &body).map_err(StoreError::from))
            .transpose()
    }
}

impl PriorLookup for SqliteStore<'_> {
    fn prior_by_id(&self, kind: EntityKind, id: &EntityId) -> Option<Entity> {
        match self.load(kind, id) {
            Ok(entity) => entity,
            Err(err @ StoreError::Serialization(_)) => {
                warn!(
                    "event=prior_lookup module=store status=undecodable kind={} id={} error={}",
                    kind, id, err
                );
                None
            }
            Err(err) => {
                error!(
                    "event=prior_lookup module=store status=error kind={} id={} error={}",
                    kind, id, err
                );
                self.lookup_failure
                    .borrow_mut()
                    .get_or_insert_with(|| format!("prior {kind} `{id}` unreadable: {err}"));
                None
            }
        }
    }
}

impl EntityStore for SqliteStore<'_> {
    fn apply(&mut self, emission: &Emission) -> StoreResult<()> {
        let started_at = Instant::now();
        let batch_id = emission.batch_id.to_string();

        let result = match self.lookup_failure.take() {
            Some(message) => Err(StoreError::InvalidData(message)),
            None => apply_in_tx(self.conn, emission, &batch_id),
        };
        match &result {
            Ok(entity_count) => info!(
                "event=store_apply module=store status=ok batch_id={} commands={} entities={} duration_ms={}",
                batch_id,
                emission.commands.len(),
                entity_count,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_apply module=store status=error batch_id={} duration_ms={} error={}",
                batch_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result.map(|_| ())
    }

    fn entity(&self, kind: EntityKind, id: &EntityId) -> StoreResult<Option<Entity>> {
        self.load(kind, id)
    }

    fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entities WHERE kind = ?1;",
            [kind.as_str()],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative entity count {count}")))
    }
}

fn apply_in_tx(conn: &mut Connection, emission: &Emission, batch_id: &str) -> StoreResult<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut entity_count = 0usize;
    {
        let mut upsert = tx.prepare(
            "INSERT INTO entities (kind, id, body, batch_id, updated_at)
             VALUES (?1, ?2, ?3, ?4, (strftime('%s', 'now') * 1000))
             ON CONFLICT (kind, id) DO UPDATE SET
                body = excluded.body,
                batch_id = excluded.batch_id,
                updated_at = excluded.updated_at;",
        )?;
        for command in &emission.commands {
            for entity in command.entities() {
                let body = entity.to_json()?;
                upsert.execute(params![
                    entity.kind().as_str(),
                    entity.id().as_str(),
                    body,
                    batch_id
                ])?;
                entity_count += 1;
            }
        }
    }

    tx.execute(
        "INSERT INTO emission_log (batch_id, command_count, entity_count)
         VALUES (?1, ?2, ?3);",
        params![
            batch_id,
            emission.commands.len() as i64,
            entity_count as i64
        ],
    )?;
    tx.commit()?;
    Ok(entity_count)
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        }
        .into());
    }

    for table in ["entities", "emission_log"] {
        if !table_exists(conn, table)? {
            return Err(DbError::MissingRequiredTable(table).into());
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
