//! Canonical organization shape.

use crate::model::id::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Organization with member accounts reduced to references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    /// Lowercased mail domain used to attach users.
    pub email_domain: Option<String>,
    pub avatar: Option<String>,
    /// Member account ids, unique, in payload order.
    pub members: Vec<EntityId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
