//! Custom emoji references embedded in accounts, posts and polls.

use serde::{Deserialize, Serialize};

/// One server-side custom emoji usable as `:shortcode:` in text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEmoji {
    pub shortcode: String,
    pub url: String,
    #[serde(default)]
    pub static_url: Option<String>,
}
