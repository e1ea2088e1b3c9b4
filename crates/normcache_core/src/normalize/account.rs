use super::text::{emojify, escape_html, html_to_text};
use super::{carry, carry_optional, overlay_fields, Normalize};
use crate::config::ImportConfig;
use crate::model::account::Account;
use crate::model::raw::RawAccount;

/// Accounts have no client-local state; render fields follow the merged text.
impl Normalize for RawAccount {
    type Canonical = Account;

    fn normalize(self, prior: Option<&Account>, _config: &ImportConfig) -> Option<Account> {
        let id = self.id?;
        let username = carry(self.username, prior, |p| &p.username).unwrap_or_default();
        let acct = carry(self.acct, prior, |p| &p.acct).unwrap_or_default();
        let display_name = carry(self.display_name, prior, |p| &p.display_name).unwrap_or_default();
        let note = carry(self.note, prior, |p| &p.note).unwrap_or_default();
        let emojis = carry(self.emojis, prior, |p| &p.emojis).unwrap_or_default();
        let moved = carry_optional(self.moved.and_then(|moved| moved.id), prior, |p| &p.moved);

        let shown_name = if display_name.trim().is_empty() {
            username.as_str()
        } else {
            display_name.as_str()
        };
        let display_name_html = emojify(&escape_html(shown_name), &emojis);
        let note_emojified = emojify(&note, &emojis);
        let note_plain = html_to_text(&note);

        Some(Account {
            id,
            username,
            acct,
            display_name,
            note,
            emojis,
            moved,
            display_name_html,
            note_emojified,
            note_plain,
            fields: overlay_fields(prior.map(|p| &p.fields), self.fields),
        })
    }
}
