//! Poll builder.
//!
//! # Responsibility
//! - Build a canonical poll from the payload and the cached poll of the same id.
//! - Preserve the viewer's vote hint across fetches that do not echo it.
//!
//! # Invariants
//! - `own_votes`/`voted` come from the payload when present, else the prior.
//! - Option `voted` flags always agree with `own_votes`.
//! - An option translation survives only while its title is unchanged.

use super::text::{emojify, escape_html};
use super::{carry, overlay_fields, Normalize};
use crate::config::ImportConfig;
use crate::model::emoji::CustomEmoji;
use crate::model::poll::{Poll, PollOption};
use crate::model::raw::{RawPoll, RawPollOption};

/// Builds the canonical poll; `None` when the payload has no id.
pub fn build_poll(raw: RawPoll, prior: Option<&Poll>) -> Option<Poll> {
    let id = raw.id?;
    let emojis = carry(raw.emojis, prior, |p| &p.emojis).unwrap_or_default();
    let own_votes = carry(raw.own_votes, prior, |p| &p.own_votes).unwrap_or_default();
    let voted = carry(raw.voted, prior, |p| &p.voted).unwrap_or(!own_votes.is_empty());

    let mut options: Vec<PollOption> = match raw.options {
        Some(options) => options
            .into_iter()
            .enumerate()
            .map(|(index, option)| build_option(option, prior_option(prior, index), &emojis))
            .collect(),
        None => prior.map(|p| p.options.clone()).unwrap_or_default(),
    };
    for (index, option) in options.iter_mut().enumerate() {
        option.voted = own_votes.contains(&index);
    }

    Some(Poll {
        id,
        options,
        own_votes,
        voted,
        multiple: carry(raw.multiple, prior, |p| &p.multiple).unwrap_or(false),
        expired: carry(raw.expired, prior, |p| &p.expired).unwrap_or(false),
        expires_at: raw.expires_at.or_else(|| prior.and_then(|p| p.expires_at.clone())),
        votes_count: carry(raw.votes_count, prior, |p| &p.votes_count).unwrap_or(0),
        voters_count: raw
            .voters_count
            .or_else(|| prior.and_then(|p| p.voters_count)),
        emojis,
        fields: overlay_fields(prior.map(|p| &p.fields), raw.fields),
    })
}

fn prior_option(prior: Option<&Poll>, index: usize) -> Option<&PollOption> {
    prior?.options.get(index)
}

fn build_option(raw: RawPollOption, prior: Option<&PollOption>, emojis: &[CustomEmoji]) -> PollOption {
    let title = raw.title.unwrap_or_default();
    let translation = prior
        .filter(|prior| prior.title == title)
        .and_then(|prior| prior.translation.clone());
    PollOption {
        title_html: emojify(&escape_html(&title), emojis),
        title,
        // Server-authoritative: hidden totals stay hidden.
        votes_count: raw.votes_count,
        voted: false,
        translation,
    }
}

impl Normalize for RawPoll {
    type Canonical = Poll;

    fn normalize(self, prior: Option<&Poll>, _config: &ImportConfig) -> Option<Poll> {
        build_poll(self, prior)
    }
}
