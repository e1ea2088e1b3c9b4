//! Canonical post shape.
//!
//! # Invariants
//! - `account`, `reblog`, `poll`, `filtered[].filter` and card author
//!   `account` values are ids of entities emitted alongside, or already stored.
//! - Render fields (`content_html`, `spoiler_html`, `search_index`, `hidden`,
//!   `translation`) are client-local and survive refetches of unchanged text.

use crate::model::emoji::CustomEmoji;
use crate::model::id::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    /// Author reference.
    pub account: EntityId,
    pub reblog: Option<EntityId>,
    pub poll: Option<EntityId>,
    pub filtered: Vec<FilterMatch>,
    pub card: Option<Card>,
    pub content: String,
    pub spoiler_text: String,
    pub sensitive: bool,
    pub emojis: Vec<CustomEmoji>,
    pub content_html: String,
    pub spoiler_html: String,
    pub search_index: String,
    /// Whether the body is collapsed behind its content warning.
    pub hidden: bool,
    /// Client-side translation, set by the UI after import.
    pub translation: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A filter hit, reduced to a filter reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMatch {
    pub filter: EntityId,
    pub keyword_matches: Vec<String>,
    pub status_matches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub authors: Vec<CardAuthor>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAuthor {
    /// `None` for anonymous authors.
    pub account: Option<EntityId>,
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
