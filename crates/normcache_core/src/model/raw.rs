//! Inbound payload shapes as delivered by the server.
//!
//! # Responsibility
//! - Decode tree-shaped payloads with every optional embedding explicit.
//! - Keep unmodeled server fields verbatim in `fields`.
//!
//! # Invariants
//! - Nested structures with the wrong shape decode as `None`, never as errors.
//! - JSON `null` and an omitted key are indistinguishable (`None`).
//! - Merging a later occurrence only overrides what it actually supplies.

use crate::collector::Merge;
use crate::model::emoji::CustomEmoji;
use crate::model::id::{EntityId, Identified};
use crate::model::lenient;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Account payload; `moved` is self-referential.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAccount {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub acct: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub emojis: Option<Vec<CustomEmoji>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub moved: Option<Box<RawAccount>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Post payload with its embedded author, reblog, poll, filter results and card.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPost {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub account: Option<RawAccount>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub reblog: Option<Box<RawPost>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub poll: Option<RawPoll>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub filtered: Option<Vec<RawFilterResult>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub card: Option<RawCard>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub spoiler_text: Option<String>,
    #[serde(default)]
    pub sensitive: Option<bool>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub emojis: Option<Vec<CustomEmoji>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawPost {
    /// Author id, when the author is embedded and identified.
    pub fn author_id(&self) -> Option<&EntityId> {
        self.account.as_ref()?.id.as_ref()
    }

    /// Post id, but only when the author is identified too.
    ///
    /// A post without an author cannot be referenced without dangling.
    pub fn admissible_id(&self) -> Option<&EntityId> {
        self.author_id()?;
        self.id.as_ref()
    }
}

/// One filter hit attached to a post.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFilterResult {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub filter: Option<RawFilter>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub keyword_matches: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub status_matches: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFilter {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub context: Option<Vec<String>>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub filter_action: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Link preview card.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCard {
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub authors: Option<Vec<RawCardAuthor>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Card author; anonymous authors carry no `account`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCardAuthor {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub account: Option<RawAccount>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPoll {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub options: Option<Vec<RawPollOption>>,
    /// Indices the viewer voted for; omitted for anonymous fetches.
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub own_votes: Option<Vec<usize>>,
    #[serde(default)]
    pub voted: Option<bool>,
    #[serde(default)]
    pub multiple: Option<bool>,
    #[serde(default)]
    pub expired: Option<bool>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub votes_count: Option<u64>,
    #[serde(default)]
    pub voters_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub emojis: Option<Vec<CustomEmoji>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawPoll {
    pub(crate) fn option_titles(&self) -> Vec<String> {
        self.options
            .iter()
            .flatten()
            .filter_map(|option| option.title.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPollOption {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub votes_count: Option<u64>,
}

/// Organization payload with embedded member accounts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawOrganization {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub email_domain: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient::sequence")]
    pub members: Option<Vec<RawAccount>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawJob {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub job_category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub organization_logo: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawJobApplication {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub job_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub account_id: Option<EntityId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Identified for RawAccount {
    fn entity_id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

impl Identified for RawPost {
    fn entity_id(&self) -> Option<&EntityId> {
        self.admissible_id()
    }
}

impl Identified for RawPoll {
    fn entity_id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

impl Identified for RawFilter {
    fn entity_id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

impl Identified for RawOrganization {
    fn entity_id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

impl Identified for RawJob {
    fn entity_id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

impl Identified for RawJobApplication {
    fn entity_id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

fn overlay<T>(slot: &mut Option<T>, later: Option<T>) {
    if later.is_some() {
        *slot = later;
    }
}

fn overlay_fields(fields: &mut Map<String, Value>, later: Map<String, Value>) {
    fields.extend(later);
}

impl Merge for RawAccount {
    fn merge_from(&mut self, later: Self) {
        overlay(&mut self.username, later.username);
        overlay(&mut self.acct, later.acct);
        overlay(&mut self.display_name, later.display_name);
        overlay(&mut self.note, later.note);
        overlay(&mut self.emojis, later.emojis);
        overlay(&mut self.moved, later.moved);
        overlay_fields(&mut self.fields, later.fields);
    }
}

impl Merge for RawPost {
    fn merge_from(&mut self, later: Self) {
        overlay(&mut self.account, later.account);
        overlay(&mut self.reblog, later.reblog);
        overlay(&mut self.poll, later.poll);
        overlay(&mut self.filtered, later.filtered);
        overlay(&mut self.card, later.card);
        overlay(&mut self.content, later.content);
        overlay(&mut self.spoiler_text, later.spoiler_text);
        overlay(&mut self.sensitive, later.sensitive);
        overlay(&mut self.emojis, later.emojis);
        overlay_fields(&mut self.fields, later.fields);
    }
}

impl Merge for RawPoll {
    fn merge_from(&mut self, later: Self) {
        overlay(&mut self.options, later.options);
        overlay(&mut self.own_votes, later.own_votes);
        overlay(&mut self.voted, later.voted);
        overlay(&mut self.multiple, later.multiple);
        overlay(&mut self.expired, later.expired);
        overlay(&mut self.expires_at, later.expires_at);
        overlay(&mut self.votes_count, later.votes_count);
        overlay(&mut self.voters_count, later.voters_count);
        overlay(&mut self.emojis, later.emojis);
        overlay_fields(&mut self.fields, later.fields);
    }
}

impl Merge for RawFilter {
    fn merge_from(&mut self, later: Self) {
        overlay(&mut self.title, later.title);
        overlay(&mut self.context, later.context);
        overlay(&mut self.expires_at, later.expires_at);
        overlay(&mut self.filter_action, later.filter_action);
        overlay_fields(&mut self.fields, later.fields);
    }
}

impl Merge for RawOrganization {
    fn merge_from(&mut self, later: Self) {
        overlay(&mut self.name, later.name);
        overlay(&mut self.description, later.description);
        overlay(&mut self.email_domain, later.email_domain);
        overlay(&mut self.avatar, later.avatar);
        overlay(&mut self.members, later.members);
        overlay_fields(&mut self.fields, later.fields);
    }
}

impl Merge for RawJob {
    fn merge_from(&mut self, later: Self) {
        overlay(&mut self.title, later.title);
        overlay(&mut self.status, later.status);
        overlay(&mut self.job_type, later.job_type);
        overlay(&mut self.job_category, later.job_category);
        overlay(&mut self.location, later.location);
        overlay(&mut self.salary_range, later.salary_range);
        overlay(&mut self.deadline, later.deadline);
        overlay(&mut self.organization_name, later.organization_name);
        overlay(&mut self.organization_logo, later.organization_logo);
        overlay_fields(&mut self.fields, later.fields);
    }
}

impl Merge for RawJobApplication {
    fn merge_from(&mut self, later: Self) {
        overlay(&mut self.job_id, later.job_id);
        overlay(&mut self.account_id, later.account_id);
        overlay(&mut self.status, later.status);
        overlay_fields(&mut self.fields, later.fields);
    }
}

#[cfg(test)]
mod tests {
    use super::{RawAccount, RawPost};
    use crate::collector::Merge;
    use serde_json::json;

    #[test]
    fn numeric_ids_become_strings() {
        let account: RawAccount = serde_json::from_value(json!({"id": 109_000_123})).unwrap();
        assert_eq!(account.id.unwrap(), "109000123");
    }

    #[test]
    fn malformed_reblog_decodes_as_absent() {
        let post: RawPost = serde_json::from_value(json!({
            "id": "1",
            "account": {"id": "a"},
            "reblog": "not-a-post",
            "filtered": "nope",
            "visibility": "public"
        }))
        .unwrap();

        assert!(post.reblog.is_none());
        assert!(post.filtered.is_none());
        assert_eq!(post.fields["visibility"], "public");
        assert!(!post.fields.contains_key("reblog"));
    }

    #[test]
    fn merge_keeps_fields_the_later_payload_omits() {
        let mut earlier: RawAccount = serde_json::from_value(json!({
            "id": "1",
            "display_name": "Old",
            "note": "<p>bio</p>",
            "followers_count": 3
        }))
        .unwrap();
        let later: RawAccount = serde_json::from_value(json!({
            "id": "1",
            "display_name": "New",
            "followers_count": 4
        }))
        .unwrap();

        earlier.merge_from(later);

        assert_eq!(earlier.display_name.as_deref(), Some("New"));
        assert_eq!(earlier.note.as_deref(), Some("<p>bio</p>"));
        assert_eq!(earlier.fields["followers_count"], 4);
    }
}
