//! Canonical account shape.

use crate::model::emoji::CustomEmoji;
use crate::model::id::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Store-ready account.
///
/// `moved` is a reference, never an embedded account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: EntityId,
    pub username: String,
    pub acct: String,
    pub display_name: String,
    pub note: String,
    pub emojis: Vec<CustomEmoji>,
    pub moved: Option<EntityId>,
    /// Escaped display name (username fallback) with custom emoji rendered.
    pub display_name_html: String,
    pub note_emojified: String,
    pub note_plain: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
