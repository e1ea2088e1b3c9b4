//! In-process entity store for tests and one-shot imports.

use super::{EntityStore, PriorLookup, StoreResult};
use crate::emitter::Emission;
use crate::model::entity::Entity;
use crate::model::id::{EntityId, EntityKind};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entities: BTreeMap<(EntityKind, EntityId), Entity>,
    applied: Vec<Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one entity directly, bypassing emission bookkeeping.
    pub fn insert(&mut self, entity: Entity) {
        self.entities
            .insert((entity.kind(), entity.id().clone()), entity);
    }

    pub fn get(&self, kind: EntityKind, id: &str) -> Option<&Entity> {
        let id = EntityId::new(id)?;
        self.entities.get(&(kind, id))
    }

    /// Batch ids in application order.
    pub fn applied_batches(&self) -> &[Uuid] {
        &self.applied
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl PriorLookup for MemoryStore {
    fn prior_by_id(&self, kind: EntityKind, id: &EntityId) -> Option<Entity> {
        self.entities.get(&(kind, id.clone())).cloned()
    }
}

impl EntityStore for MemoryStore {
    fn apply(&mut self, emission: &Emission) -> StoreResult<()> {
        for command in &emission.commands {
            for entity in command.entities() {
                self.insert(entity);
            }
        }
        self.applied.push(emission.batch_id);
        Ok(())
    }

    fn entity(&self, kind: EntityKind, id: &EntityId) -> StoreResult<Option<Entity>> {
        Ok(self.prior_by_id(kind, id))
    }

    fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        Ok(self
            .entities
            .keys()
            .filter(|(entry_kind, _)| *entry_kind == kind)
            .count())
    }
}
