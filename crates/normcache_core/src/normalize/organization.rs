use super::{carry, carry_optional, overlay_fields, Normalize};
use crate::config::ImportConfig;
use crate::model::id::EntityId;
use crate::model::organization::Organization;
use crate::model::raw::{RawAccount, RawOrganization};

impl Normalize for RawOrganization {
    type Canonical = Organization;

    fn normalize(self, prior: Option<&Organization>, _config: &ImportConfig) -> Option<Organization> {
        Some(Organization {
            id: self.id?,
            name: carry(self.name, prior, |p| &p.name)
                .map(|name| squish(&name))
                .unwrap_or_default(),
            description: carry_optional(self.description, prior, |p| &p.description),
            email_domain: carry_optional(self.email_domain, prior, |p| &p.email_domain)
                .map(|domain| domain.trim().to_ascii_lowercase()),
            avatar: carry_optional(self.avatar, prior, |p| &p.avatar),
            members: carry(self.members.map(member_ids), prior, |p| &p.members)
                .unwrap_or_default(),
            fields: overlay_fields(prior.map(|p| &p.fields), self.fields),
        })
    }
}

/// Identified members, first occurrence wins.
fn member_ids(members: Vec<RawAccount>) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = Vec::with_capacity(members.len());
    for id in members.into_iter().filter_map(|member| member.id) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

fn squish(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
