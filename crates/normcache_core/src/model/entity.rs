//! Type-erased canonical entity used at the store boundary.

use crate::model::account::Account;
use crate::model::filter::Filter;
use crate::model::id::{EntityId, EntityKind};
use crate::model::job::{Job, JobApplication};
use crate::model::organization::Organization;
use crate::model::poll::Poll;
use crate::model::post::Post;

/// Any canonical entity, tagged by its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Account(Account),
    Post(Post),
    Poll(Poll),
    Filter(Filter),
    Organization(Organization),
    Job(Job),
    JobApplication(JobApplication),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Account(_) => EntityKind::Account,
            Self::Post(_) => EntityKind::Post,
            Self::Poll(_) => EntityKind::Poll,
            Self::Filter(_) => EntityKind::Filter,
            Self::Organization(_) => EntityKind::Organization,
            Self::Job(_) => EntityKind::Job,
            Self::JobApplication(_) => EntityKind::JobApplication,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            Self::Account(value) => &value.id,
            Self::Post(value) => &value.id,
            Self::Poll(value) => &value.id,
            Self::Filter(value) => &value.id,
            Self::Organization(value) => &value.id,
            Self::Job(value) => &value.id,
            Self::JobApplication(value) => &value.id,
        }
    }

    /// Serializes the inner value (without the kind tag) as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Self::Account(value) => serde_json::to_string(value),
            Self::Post(value) => serde_json::to_string(value),
            Self::Poll(value) => serde_json::to_string(value),
            Self::Filter(value) => serde_json::to_string(value),
            Self::Organization(value) => serde_json::to_string(value),
            Self::Job(value) => serde_json::to_string(value),
            Self::JobApplication(value) => serde_json::to_string(value),
        }
    }

    /// Inverse of [`Entity::to_json`] for a known kind.
    pub fn from_json(kind: EntityKind, body: &str) -> serde_json::Result<Self> {
        match kind {
            EntityKind::Account => serde_json::from_str(body).map(Self::Account),
            EntityKind::Post => serde_json::from_str(body).map(Self::Post),
            EntityKind::Poll => serde_json::from_str(body).map(Self::Poll),
            EntityKind::Filter => serde_json::from_str(body).map(Self::Filter),
            EntityKind::Organization => serde_json::from_str(body).map(Self::Organization),
            EntityKind::Job => serde_json::from_str(body).map(Self::Job),
            EntityKind::JobApplication => serde_json::from_str(body).map(Self::JobApplication),
        }
    }
}

/// Typed access to one [`Entity`] variant.
pub trait CanonicalEntity: Sized {
    const KIND: EntityKind;

    fn id(&self) -> &EntityId;
    fn from_entity(entity: Entity) -> Option<Self>;
    fn into_entity(self) -> Entity;
}

macro_rules! canonical_entity {
    ($ty:ident) => {
        impl CanonicalEntity for $ty {
            const KIND: EntityKind = EntityKind::$ty;

            fn id(&self) -> &EntityId {
                &self.id
            }

            fn from_entity(entity: Entity) -> Option<Self> {
                match entity {
                    Entity::$ty(value) => Some(value),
                    _ => None,
                }
            }

            fn into_entity(self) -> Entity {
                Entity::$ty(self)
            }
        }
    };
}

canonical_entity!(Account);
canonical_entity!(Post);
canonical_entity!(Poll);
canonical_entity!(Filter);
canonical_entity!(Organization);
canonical_entity!(Job);
canonical_entity!(JobApplication);
