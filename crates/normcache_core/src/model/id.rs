//! Entity identity primitives.
//!
//! # Responsibility
//! - Define the opaque identifier shared by raw and canonical shapes.
//! - Name every entity type the importer understands.
//!
//! # Invariants
//! - An `EntityId` is never blank.
//! - `EntityKind::as_str` values are stable; they are persisted by stores.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque server identifier, stable across payloads of the same object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Builds an identifier, returning `None` for blank input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.len() == value.len() {
            return Some(Self(value));
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Every entity type carried through the import pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Account,
    Post,
    Poll,
    Filter,
    Organization,
    Job,
    JobApplication,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        Self::Account,
        Self::Post,
        Self::Poll,
        Self::Filter,
        Self::Organization,
        Self::Job,
        Self::JobApplication,
    ];

    /// Stable string id used in store rows and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Post => "post",
            Self::Poll => "poll",
            Self::Filter => "filter",
            Self::Organization => "organization",
            Self::Job => "job",
            Self::JobApplication => "job_application",
        }
    }

    /// Parses a value previously produced by [`EntityKind::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that may carry a resolvable identifier.
pub trait Identified {
    fn entity_id(&self) -> Option<&EntityId>;
}

#[cfg(test)]
mod tests {
    use super::{EntityId, EntityKind};

    #[test]
    fn blank_ids_are_rejected() {
        assert!(EntityId::new("").is_none());
        assert!(EntityId::new("   ").is_none());
        assert_eq!(EntityId::new(" 42 ").unwrap(), "42");
    }

    #[test]
    fn kind_strings_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("status"), None);
    }
}
