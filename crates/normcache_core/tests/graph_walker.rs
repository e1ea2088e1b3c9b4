use normcache_core::model::raw::{RawAccount, RawOrganization, RawPost};
use normcache_core::{DedupStrategy, EntityId, GraphWalker, ImportConfig, NoPrior};
use serde_json::{json, Value};

fn posts(value: Value) -> Vec<RawPost> {
    serde_json::from_value(value).unwrap()
}

fn id_list<'a>(ids: impl IntoIterator<Item = &'a EntityId>) -> Vec<&'a str> {
    ids.into_iter().map(EntityId::as_str).collect()
}

#[test]
fn reblog_yields_two_posts_and_both_authors() {
    let roots = posts(json!([{
        "id": "1",
        "account": {"id": "a"},
        "reblog": {"id": "2", "account": {"id": "b"}}
    }]));

    let mut walker = GraphWalker::new(DedupStrategy::Hashed);
    walker.walk_posts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(id_list(batch.posts.iter().map(|p| &p.id)), vec!["1", "2"]);
    assert_eq!(id_list(batch.accounts.iter().map(|a| &a.id)), vec!["a", "b"]);
    assert_eq!(batch.posts[0].reblog.as_ref().map(EntityId::as_str), Some("2"));
}

#[test]
fn self_reblog_collects_shared_author_once() {
    let roots = posts(json!([{
        "id": "1",
        "account": {"id": "a"},
        "reblog": {"id": "2", "account": {"id": "a", "display_name": "Later"}}
    }]));

    let mut walker = GraphWalker::new(DedupStrategy::Linear);
    walker.walk_posts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(batch.posts.len(), 2);
    assert_eq!(batch.accounts.len(), 1);
    assert_eq!(batch.accounts[0].display_name, "Later");
}

#[test]
fn moved_chain_is_followed_to_the_end() {
    let roots: Vec<RawAccount> = serde_json::from_value(json!([{
        "id": "a",
        "moved": {"id": "b", "moved": {"id": "c"}}
    }]))
    .unwrap();

    let mut walker = GraphWalker::new(DedupStrategy::Hashed);
    walker.walk_accounts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(id_list(batch.accounts.iter().map(|a| &a.id)), vec!["a", "b", "c"]);
    assert_eq!(batch.accounts[0].moved.as_ref().map(EntityId::as_str), Some("b"));
    assert_eq!(batch.accounts[2].moved, None);
}

#[test]
fn cyclic_id_chains_terminate() {
    let accounts: Vec<RawAccount> = serde_json::from_value(json!([{
        "id": "a",
        "moved": {"id": "b", "moved": {"id": "a", "moved": {"id": "b"}}}
    }]))
    .unwrap();
    let roots = posts(json!([{
        "id": "1",
        "account": {"id": "a"},
        "reblog": {
            "id": "2",
            "account": {"id": "b"},
            "reblog": {"id": "1", "account": {"id": "a"}}
        }
    }]));

    let mut walker = GraphWalker::new(DedupStrategy::Hashed);
    walker.walk_accounts(&accounts);
    walker.walk_posts(&roots);
    let output = walker.into_output();

    assert_eq!(output.accounts.len(), 2);
    assert_eq!(output.posts.len(), 2);
}

#[test]
fn cyclic_occurrence_still_collects_what_it_newly_references() {
    let roots = posts(json!([{
        "id": "1",
        "account": {"id": "a"},
        "reblog": {
            "id": "2",
            "account": {"id": "b"},
            "reblog": {"id": "1", "account": {"id": "a"}, "poll": {"id": "q"}}
        }
    }]));

    let mut walker = GraphWalker::new(DedupStrategy::Hashed);
    walker.walk_posts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(id_list(batch.posts.iter().map(|p| &p.id)), vec!["1", "2"]);
    assert_eq!(batch.posts[0].poll.as_ref().map(EntityId::as_str), Some("q"));
    assert_eq!(id_list(batch.polls.iter().map(|p| &p.id)), vec!["q"]);
}

#[test]
fn anonymous_card_authors_are_skipped() {
    let roots = posts(json!([{
        "id": "1",
        "account": {"id": "a"},
        "card": {
            "url": "https://example.com/story",
            "authors": [
                {"name": "Anonymous"},
                {"name": "Known", "account": {"id": "c"}},
                {"account": {"username": "no-id"}}
            ]
        }
    }]));

    let mut walker = GraphWalker::new(DedupStrategy::Hashed);
    walker.walk_posts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(id_list(batch.accounts.iter().map(|a| &a.id)), vec!["a", "c"]);
    let card = batch.posts[0].card.as_ref().unwrap();
    assert_eq!(card.authors.len(), 3);
    assert_eq!(card.authors[0].account, None);
    assert_eq!(card.authors[1].account.as_ref().map(EntityId::as_str), Some("c"));
    assert_eq!(card.authors[2].account, None);
}

#[test]
fn unidentified_posts_are_dropped_but_their_children_are_kept() {
    let roots = posts(json!([
        {"id": "1", "reblog": {"id": "2", "account": {"id": "b"}}},
        {"id": "3", "account": {"display_name": "nobody"}},
        {"id": "4", "account": {"id": "d"}},
        {"account": {"id": "a"}, "poll": {"id": "p"}}
    ]));

    let mut walker = GraphWalker::new(DedupStrategy::Hashed);
    walker.walk_posts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(id_list(batch.posts.iter().map(|p| &p.id)), vec!["2", "4"]);
    assert_eq!(id_list(batch.accounts.iter().map(|a| &a.id)), vec!["b", "d", "a"]);
    assert_eq!(id_list(batch.polls.iter().map(|p| &p.id)), vec!["p"]);
}

#[test]
fn revisit_still_collects_newly_referenced_children() {
    let roots = posts(json!([
        {"id": "1", "account": {"id": "a"}},
        {"id": "1", "account": {"id": "a"}, "poll": {"id": "p", "options": [{"title": "yes"}]}}
    ]));

    let mut walker = GraphWalker::new(DedupStrategy::Hashed);
    walker.walk_posts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(batch.posts.len(), 1);
    assert_eq!(batch.posts[0].poll.as_ref().map(EntityId::as_str), Some("p"));
    assert_eq!(id_list(batch.polls.iter().map(|p| &p.id)), vec!["p"]);
}

#[test]
fn repeated_parent_merges_later_nested_values() {
    let roots = posts(json!([
        {
            "id": "1",
            "account": {"id": "a", "display_name": "Old"},
            "poll": {"id": "p", "votes_count": 1}
        },
        {
            "id": "1",
            "account": {"id": "a", "display_name": "New"},
            "poll": {"id": "p", "votes_count": 9}
        }
    ]));

    let mut walker = GraphWalker::new(DedupStrategy::Linear);
    walker.walk_posts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(batch.posts.len(), 1);
    assert_eq!(batch.accounts.len(), 1);
    assert_eq!(batch.accounts[0].display_name, "New");
    assert_eq!(batch.polls.len(), 1);
    assert_eq!(batch.polls[0].votes_count, 9);
}

#[test]
fn filters_and_polls_are_collected_once_per_batch() {
    let roots = posts(json!([
        {
            "id": "1",
            "account": {"id": "a"},
            "filtered": [{"filter": {"id": "f", "title": "spoilers"}, "keyword_matches": ["finale"]}],
            "poll": {"id": "p"}
        },
        {
            "id": "2",
            "account": {"id": "a"},
            "filtered": [{"filter": {"id": "f"}}, {"filter": {"title": "no id"}}],
            "poll": {"id": "p"}
        }
    ]));

    let mut walker = GraphWalker::new(DedupStrategy::Linear);
    walker.walk_posts(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(batch.filters.len(), 1);
    assert_eq!(batch.filters[0].title, "spoilers");
    assert_eq!(batch.polls.len(), 1);
    assert_eq!(batch.posts[1].filtered.len(), 1);
    assert_eq!(batch.posts[0].filtered[0].keyword_matches, vec!["finale"]);
}

#[test]
fn organizations_yield_member_accounts() {
    let roots: Vec<RawOrganization> = serde_json::from_value(json!([
        {
            "id": "o1",
            "name": "  Acme   Labs ",
            "email_domain": "ACME.example",
            "members": [
                {"id": "m1", "moved": {"id": "m2"}},
                {"id": "m1"},
                {"username": "no-id"}
            ]
        },
        {"name": "unidentified", "members": [{"id": "m9"}]}
    ]))
    .unwrap();

    let mut walker = GraphWalker::new(DedupStrategy::Hashed);
    walker.walk_organizations(&roots);
    let batch = walker.finish(&NoPrior, &ImportConfig::default());

    assert_eq!(batch.organizations.len(), 1);
    let org = &batch.organizations[0];
    assert_eq!(org.name, "Acme Labs");
    assert_eq!(org.email_domain.as_deref(), Some("acme.example"));
    assert_eq!(id_list(&org.members), vec!["m1"]);
    assert_eq!(id_list(batch.accounts.iter().map(|a| &a.id)), vec!["m1", "m2", "m9"]);
}
