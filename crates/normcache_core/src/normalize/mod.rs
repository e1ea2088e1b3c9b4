//! Raw-to-canonical transforms.
//!
//! # Responsibility
//! - Shape one node at a time; recursion belongs to the walker.
//! - Merge the payload over the previously cached version of the same id.
//!
//! # Invariants
//! - Supplied fields overwrite; omitted fields are carried from the prior.
//! - Without a prior, derived fields take their defaults.
//! - Normalization is a pure function of `(raw, prior, config)`.

use crate::config::ImportConfig;
use crate::model::entity::CanonicalEntity;
use crate::model::id::Identified;
use crate::store::PriorLookup;
use serde_json::{Map, Value};

mod account;
mod filter;
mod job;
mod organization;
pub mod poll;
mod post;
pub mod text;

pub use poll::build_poll;

/// Per-type transform from payload shape to store shape.
pub trait Normalize: Identified + Sized {
    type Canonical: CanonicalEntity;

    /// Returns `None` when the node cannot be identified.
    fn normalize(self, prior: Option<&Self::Canonical>, config: &ImportConfig)
        -> Option<Self::Canonical>;
}

/// Normalizes every node against its prior from `lookup`, keeping order.
pub fn normalize_all<R, L>(raws: Vec<R>, lookup: &L, config: &ImportConfig) -> Vec<R::Canonical>
where
    R: Normalize,
    L: PriorLookup + ?Sized,
{
    raws.into_iter()
        .filter_map(|raw| {
            let prior = raw
                .entity_id()
                .and_then(|id| lookup.prior_by_id(R::Canonical::KIND, id))
                .and_then(R::Canonical::from_entity);
            raw.normalize(prior.as_ref(), config)
        })
        .collect()
}

/// Payload value, else the prior's.
pub(crate) fn carry<'p, P, T: Clone + 'p>(
    raw: Option<T>,
    prior: Option<&'p P>,
    field: impl FnOnce(&'p P) -> &'p T,
) -> Option<T> {
    raw.or_else(|| prior.map(|prior| field(prior).clone()))
}

/// [`carry`] for fields that are optional on the canonical side too.
pub(crate) fn carry_optional<'p, P, T: Clone + 'p>(
    raw: Option<T>,
    prior: Option<&'p P>,
    field: impl FnOnce(&'p P) -> &'p Option<T>,
) -> Option<T> {
    raw.or_else(|| prior.and_then(|prior| field(prior).clone()))
}

/// Prior verbatim fields with the payload's keys laid over them.
pub(crate) fn overlay_fields(
    prior: Option<&Map<String, Value>>,
    raw: Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = prior.cloned().unwrap_or_default();
    merged.extend(raw);
    merged
}
