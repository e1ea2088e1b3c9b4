use super::{carry, carry_optional, overlay_fields, Normalize};
use crate::config::ImportConfig;
use crate::model::filter::{Filter, DEFAULT_FILTER_ACTION};
use crate::model::raw::RawFilter;

impl Normalize for RawFilter {
    type Canonical = Filter;

    fn normalize(self, prior: Option<&Filter>, _config: &ImportConfig) -> Option<Filter> {
        Some(Filter {
            id: self.id?,
            title: carry(self.title, prior, |p| &p.title).unwrap_or_default(),
            context: carry(self.context, prior, |p| &p.context).unwrap_or_default(),
            expires_at: carry_optional(self.expires_at, prior, |p| &p.expires_at),
            filter_action: carry(self.filter_action, prior, |p| &p.filter_action)
                .unwrap_or_else(|| DEFAULT_FILTER_ACTION.to_string()),
            fields: overlay_fields(prior.map(|p| &p.fields), self.fields),
        })
    }
}
