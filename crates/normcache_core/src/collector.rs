//! Per-type unique collection in first-seen order.
//!
//! # Responsibility
//! - Accumulate candidates of one entity type, once per id.
//! - Merge repeated candidates into the existing entry.
//!
//! # Invariants
//! - Output order is first-seen order, for both strategies.
//! - Candidates without an identifier are never admitted.
//! - A repeat keeps its first position; the later values win field by field.

use crate::config::DedupStrategy;
use crate::model::id::{EntityId, Identified};
use std::collections::HashMap;

/// Field-wise merge of a later occurrence over an earlier one.
pub trait Merge {
    fn merge_from(&mut self, later: Self);
}

/// Outcome of one [`UniqueCollector::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collected {
    Inserted,
    Merged,
    Rejected,
}

/// Ordered, id-unique accumulator for one entity type.
#[derive(Debug, Clone)]
pub struct UniqueCollector<T> {
    items: Vec<T>,
    /// `None` selects the linear scan.
    index: Option<HashMap<EntityId, usize>>,
}

impl<T> UniqueCollector<T>
where
    T: Identified + Merge,
{
    pub fn new(strategy: DedupStrategy) -> Self {
        let index = match strategy {
            DedupStrategy::Linear => None,
            DedupStrategy::Hashed => Some(HashMap::new()),
        };
        Self {
            items: Vec::new(),
            index,
        }
    }

    /// Admits, merges or rejects one candidate.
    pub fn push(&mut self, candidate: T) -> Collected {
        let Some(id) = candidate.entity_id().cloned() else {
            return Collected::Rejected;
        };

        match self.position(&id) {
            Some(position) => {
                self.items[position].merge_from(candidate);
                Collected::Merged
            }
            None => {
                if let Some(index) = self.index.as_mut() {
                    index.insert(id, self.items.len());
                }
                self.items.push(candidate);
                Collected::Inserted
            }
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        match &self.index {
            Some(index) => index.get(id).copied(),
            None => self
                .items
                .iter()
                .position(|item| item.entity_id() == Some(id)),
        }
    }
}
