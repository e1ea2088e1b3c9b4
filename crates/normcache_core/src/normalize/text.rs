//! Text rendering helpers shared by the normalizers.
//!
//! # Responsibility
//! - Escape user text for HTML display.
//! - Substitute custom emoji shortcodes with inline images.
//! - Flatten server HTML into plain text for search indexes.

use crate::model::emoji::CustomEmoji;
use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SHORTCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([a-zA-Z0-9_]{2,}):").expect("valid shortcode regex"));

/// Wrap width for plain-text rendering; wide enough that nothing wraps.
const PLAIN_TEXT_WIDTH: usize = 10_000;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Replaces `:shortcode:` with an `<img>` for every known custom emoji.
///
/// Unknown shortcodes are left untouched.
pub fn emojify(html: &str, emojis: &[CustomEmoji]) -> String {
    if emojis.is_empty() {
        return html.to_string();
    }

    SHORTCODE_RE
        .replace_all(html, |caps: &Captures<'_>| {
            let shortcode = &caps[1];
            match emojis.iter().find(|emoji| emoji.shortcode == shortcode) {
                Some(emoji) => format!(
                    "<img draggable=\"false\" class=\"emojione custom-emoji\" alt=\":{code}:\" title=\":{code}:\" src=\"{src}\" />",
                    code = shortcode,
                    src = escape_html(&emoji.url)
                ),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Plain text of an HTML fragment: breaks become newlines, paragraphs are
/// separated by a blank line, entities are decoded.
pub fn html_to_text(html: &str) -> String {
    match html2text::config::plain_no_decorate().string_from_read(html.as_bytes(), PLAIN_TEXT_WIDTH)
    {
        Ok(text) => text.trim_end().to_string(),
        Err(err) => {
            warn!("event=html_to_text module=normalize status=error error={err}");
            String::new()
        }
    }
}

/// Search text for a post: spoiler, body, then poll option titles.
///
/// Each part is flattened on its own so empty parts still hold their slot.
pub fn search_text(spoiler_text: &str, content: &str, poll_titles: &[String]) -> String {
    let mut parts = vec![html_to_text(spoiler_text), html_to_text(content)];
    parts.extend(poll_titles.iter().map(|title| html_to_text(title)));
    parts.join("\n\n")
}
