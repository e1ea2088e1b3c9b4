//! Canonical poll shape.

use crate::model::emoji::CustomEmoji;
use crate::model::id::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Store-ready poll.
///
/// `own_votes` and `voted` form the viewer's vote hint. The server omits them
/// for anonymous fetches, so they are carried from the cached poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: EntityId,
    pub options: Vec<PollOption>,
    pub own_votes: Vec<usize>,
    pub voted: bool,
    pub multiple: bool,
    pub expired: bool,
    pub expires_at: Option<String>,
    pub votes_count: u64,
    pub voters_count: Option<u64>,
    pub emojis: Vec<CustomEmoji>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub title: String,
    /// Hidden by the server until the poll ends on some instances.
    pub votes_count: Option<u64>,
    pub title_html: String,
    pub voted: bool,
    pub translation: Option<Value>,
}
