use super::text::{emojify, escape_html, search_text};
use super::{carry, carry_optional, overlay_fields, Normalize};
use crate::config::ImportConfig;
use crate::model::emoji::CustomEmoji;
use crate::model::post::{Card, CardAuthor, FilterMatch, Post};
use crate::model::raw::{RawCard, RawFilterResult, RawPost};
use serde_json::Value;

/// Client-local render state of a post.
struct RenderState {
    content_html: String,
    spoiler_html: String,
    search_index: String,
    hidden: bool,
    translation: Option<Value>,
}

impl RenderState {
    fn carried(prior: &Post) -> Self {
        Self {
            content_html: prior.content_html.clone(),
            spoiler_html: prior.spoiler_html.clone(),
            search_index: prior.search_index.clone(),
            hidden: prior.hidden,
            translation: prior.translation.clone(),
        }
    }

    fn render(
        content: &str,
        spoiler_text: &str,
        sensitive: bool,
        emojis: &[CustomEmoji],
        poll_titles: &[String],
        config: &ImportConfig,
    ) -> Self {
        Self {
            content_html: emojify(content, emojis),
            spoiler_html: emojify(&escape_html(spoiler_text), emojis),
            search_index: search_text(spoiler_text, content, poll_titles),
            hidden: !config.expand_spoilers && (!spoiler_text.is_empty() || sensitive),
            translation: None,
        }
    }
}

impl Normalize for RawPost {
    type Canonical = Post;

    /// Render state is recomputed only when `content` or `spoiler_text` changed.
    fn normalize(self, prior: Option<&Post>, config: &ImportConfig) -> Option<Post> {
        let account = self.author_id()?.clone();
        let id = self.id?;

        let reblog = carry_optional(
            self.reblog
                .as_deref()
                .and_then(RawPost::admissible_id)
                .cloned(),
            prior,
            |p| &p.reblog,
        );
        let poll_titles = self
            .poll
            .as_ref()
            .map(|poll| poll.option_titles())
            .unwrap_or_default();
        let poll = carry_optional(self.poll.and_then(|poll| poll.id), prior, |p| &p.poll);
        let filtered = carry(self.filtered.map(filter_matches), prior, |p| &p.filtered)
            .unwrap_or_default();
        let card = carry_optional(self.card.map(normalize_card), prior, |p| &p.card);

        let content = carry(self.content, prior, |p| &p.content).unwrap_or_default();
        let spoiler_text = carry(self.spoiler_text, prior, |p| &p.spoiler_text).unwrap_or_default();
        let sensitive = carry(self.sensitive, prior, |p| &p.sensitive).unwrap_or(false);
        let emojis = carry(self.emojis, prior, |p| &p.emojis).unwrap_or_default();

        let render = match prior {
            Some(prior) if prior.content == content && prior.spoiler_text == spoiler_text => {
                RenderState::carried(prior)
            }
            _ => RenderState::render(
                &content,
                &spoiler_text,
                sensitive,
                &emojis,
                &poll_titles,
                config,
            ),
        };

        Some(Post {
            id,
            account,
            reblog,
            poll,
            filtered,
            card,
            content,
            spoiler_text,
            sensitive,
            emojis,
            content_html: render.content_html,
            spoiler_html: render.spoiler_html,
            search_index: render.search_index,
            hidden: render.hidden,
            translation: render.translation,
            fields: overlay_fields(prior.map(|p| &p.fields), self.fields),
        })
    }
}

fn filter_matches(results: Vec<RawFilterResult>) -> Vec<FilterMatch> {
    results
        .into_iter()
        .filter_map(|result| {
            Some(FilterMatch {
                filter: result.filter?.id?,
                keyword_matches: result.keyword_matches.unwrap_or_default(),
                status_matches: result.status_matches.unwrap_or_default(),
            })
        })
        .collect()
}

fn normalize_card(raw: RawCard) -> Card {
    let authors = raw
        .authors
        .unwrap_or_default()
        .into_iter()
        .map(|author| CardAuthor {
            account: author.account.and_then(|account| account.id),
            name: author.name,
            url: author.url,
            fields: author.fields,
        })
        .collect();
    Card {
        authors,
        fields: raw.fields,
    }
}
