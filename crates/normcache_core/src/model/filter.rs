use crate::model::id::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default action when the server does not send one.
pub const DEFAULT_FILTER_ACTION: &str = "warn";

/// Content filter referenced by post filter matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub id: EntityId,
    pub title: String,
    pub context: Vec<String>,
    pub expires_at: Option<String>,
    pub filter_action: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
