use normcache_core::model::poll::Poll;
use normcache_core::model::post::Post;
use normcache_core::model::raw::{RawAccount, RawFilter, RawPoll, RawPost};
use normcache_core::{
    build_poll, normalize_all, CanonicalEntity, ImportConfig, MemoryStore, Normalize,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

fn raw<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

fn first_post(value: Value) -> Post {
    raw::<RawPost>(value)
        .normalize(None, &ImportConfig::default())
        .unwrap()
}

#[test]
fn unchanged_text_carries_render_state_from_prior() {
    let mut prior = first_post(json!({
        "id": "1",
        "account": {"id": "a"},
        "content": "<p>hello</p>",
        "spoiler_text": "cw"
    }));
    prior.content_html = "<p>cached</p>".to_string();
    prior.hidden = false;
    prior.translation = Some(json!({"content": "<p>hallo</p>"}));

    let post = raw::<RawPost>(json!({
        "id": "1",
        "account": {"id": "a"},
        "content": "<p>hello</p>",
        "favourites_count": 3
    }))
    .normalize(Some(&prior), &ImportConfig::default())
    .unwrap();

    assert_eq!(post.spoiler_text, "cw");
    assert_eq!(post.content_html, "<p>cached</p>");
    assert!(!post.hidden);
    assert_eq!(post.translation, prior.translation);
    assert_eq!(post.fields["favourites_count"], 3);
}

#[test]
fn edited_text_recomputes_render_state() {
    let mut prior = first_post(json!({
        "id": "1",
        "account": {"id": "a"},
        "content": "<p>before</p>"
    }));
    prior.translation = Some(json!({"content": "<p>vorher</p>"}));

    let post = raw::<RawPost>(json!({
        "id": "1",
        "account": {"id": "a"},
        "content": "<p>after :blob:</p>",
        "emojis": [{"shortcode": "blob", "url": "https://cdn.example/blob.png"}],
        "poll": {"id": "p", "options": [{"title": "Yes"}, {"title": "No"}]}
    }))
    .normalize(Some(&prior), &ImportConfig::default())
    .unwrap();

    assert_eq!(post.translation, None);
    assert!(post.content_html.contains("src=\"https://cdn.example/blob.png\""));
    assert_eq!(post.search_index, "\n\nafter :blob:\n\nYes\n\nNo");
    assert!(!post.hidden);
}

#[test]
fn spoilers_and_sensitive_media_start_hidden_unless_expanded() {
    let payload = json!({
        "id": "1",
        "account": {"id": "a"},
        "spoiler_text": "<b>plot</b>",
        "content": "<p>twist</p>"
    });
    let sensitive = json!({"id": "2", "account": {"id": "a"}, "sensitive": true});

    let hidden = first_post(payload.clone());
    assert!(hidden.hidden);
    assert_eq!(hidden.spoiler_html, "&lt;b&gt;plot&lt;/b&gt;");
    assert!(first_post(sensitive.clone()).hidden);

    let expanded = ImportConfig {
        expand_spoilers: true,
        ..ImportConfig::default()
    };
    assert!(!raw::<RawPost>(payload).normalize(None, &expanded).unwrap().hidden);
    assert!(!raw::<RawPost>(sensitive).normalize(None, &expanded).unwrap().hidden);
}

#[test]
fn account_keeps_cached_fields_the_payload_omits() {
    let prior = raw::<RawAccount>(json!({
        "id": "a",
        "username": "alice",
        "display_name": "Alice :wave:",
        "note": "<p>hi<br>there</p>",
        "emojis": [{"shortcode": "wave", "url": "https://cdn.example/wave.png"}],
        "followers_count": 10
    }))
    .normalize(None, &ImportConfig::default())
    .unwrap();

    let account = raw::<RawAccount>(json!({"id": "a", "display_name": "  "}))
        .normalize(Some(&prior), &ImportConfig::default())
        .unwrap();

    assert_eq!(account.username, "alice");
    assert_eq!(account.note, "<p>hi<br>there</p>");
    assert_eq!(account.note_plain, "hi\nthere");
    assert_eq!(account.display_name_html, "alice");
    assert_eq!(account.fields["followers_count"], 10);
    assert!(prior.display_name_html.starts_with("Alice <img"));
}

#[test]
fn poll_keeps_vote_hint_when_payload_omits_it() {
    let prior = build_poll(
        raw(json!({
            "id": "p",
            "options": [{"title": "Tea"}, {"title": "Coffee"}],
            "own_votes": [1],
            "voted": true
        })),
        None,
    )
    .unwrap();

    let poll = build_poll(
        raw(json!({
            "id": "p",
            "options": [{"title": "Tea", "votes_count": 4}, {"title": "Coffee", "votes_count": 9}],
            "votes_count": 13
        })),
        Some(&prior),
    )
    .unwrap();

    assert_eq!(poll.own_votes, vec![1]);
    assert!(poll.voted);
    assert!(!poll.options[0].voted);
    assert!(poll.options[1].voted);
    assert_eq!(poll.options[1].votes_count, Some(9));
    assert_eq!(poll.votes_count, 13);
}

#[test]
fn payload_vote_hint_overrides_prior() {
    let prior = build_poll(raw(json!({"id": "p", "own_votes": [0]})), None).unwrap();
    assert!(prior.voted);

    let poll = build_poll(
        raw(json!({"id": "p", "own_votes": [], "voted": false})),
        Some(&prior),
    )
    .unwrap();

    assert!(poll.own_votes.is_empty());
    assert!(!poll.voted);
}

#[test]
fn option_translation_survives_only_unchanged_titles() {
    let mut prior: Poll = build_poll(
        raw(json!({"id": "p", "options": [{"title": "Tea"}, {"title": "Coffee"}]})),
        None,
    )
    .unwrap();
    prior.options[0].translation = Some(json!("Tee"));
    prior.options[1].translation = Some(json!("Kaffee"));

    let poll = build_poll(
        raw(json!({"id": "p", "options": [{"title": "Tea"}, {"title": "Cocoa"}]})),
        Some(&prior),
    )
    .unwrap();

    assert_eq!(poll.options[0].translation, Some(json!("Tee")));
    assert_eq!(poll.options[1].translation, None);
}

#[test]
fn poll_without_options_reuses_prior_options() {
    let prior = build_poll(
        raw(json!({"id": "p", "options": [{"title": "A"}, {"title": "B"}], "own_votes": [0]})),
        None,
    )
    .unwrap();

    let poll = build_poll(raw(json!({"id": "p", "own_votes": [1]})), Some(&prior)).unwrap();

    assert_eq!(poll.options.len(), 2);
    assert!(!poll.options[0].voted);
    assert!(poll.options[1].voted);
}

#[test]
fn filter_action_defaults_to_warn() {
    let filter = raw::<RawFilter>(json!({"id": 5, "title": "News", "context": ["home"]}))
        .normalize(None, &ImportConfig::default())
        .unwrap();

    assert_eq!(filter.id, "5");
    assert_eq!(filter.filter_action, "warn");
    assert_eq!(filter.context, vec!["home"]);
}

#[test]
fn normalize_all_reads_priors_by_kind() {
    let mut store = MemoryStore::new();
    let cached = build_poll(raw(json!({"id": "same", "own_votes": [0]})), None).unwrap();
    store.insert(cached.into_entity());

    let polls: Vec<RawPoll> = vec![raw(json!({"id": "same"})), raw(json!({"id": "other"}))];
    let normalized = normalize_all(polls, &store, &ImportConfig::default());
    assert_eq!(normalized[0].own_votes, vec![0]);
    assert!(normalized[1].own_votes.is_empty());

    // An account with the same id does not see the poll as its prior.
    let accounts: Vec<RawAccount> = vec![raw(json!({"id": "same"}))];
    let normalized = normalize_all(accounts, &store, &ImportConfig::default());
    assert_eq!(normalized[0].username, "");
}
