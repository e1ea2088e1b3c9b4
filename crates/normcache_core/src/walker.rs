//! Graph walker: flattens nested payload trees into per-type batches.
//!
//! # Responsibility
//! - Discover every embedded entity reachable from a batch of roots.
//! - Feed each discovery to the per-type collector for the whole batch.
//! - Normalize the collected nodes once traversal is complete.
//!
//! # Invariants
//! - Traversal is an explicit pre-order worklist; stack depth is constant.
//! - Every occurrence is merged into its collector in payload order, so later
//!   values win even for entities nested under a repeated parent.
//! - A node whose id is already on the current ancestor path is merged, and only
//!   its not-yet-collected children are walked. Cyclic id chains terminate and
//!   every merged reference still resolves.
//! - An unidentified node is dropped on its own; its children are still walked.

use crate::collector::{Collected, UniqueCollector};
use crate::config::{DedupStrategy, ImportConfig};
use crate::model::account::Account;
use crate::model::filter::Filter;
use crate::model::id::{EntityId, EntityKind, Identified};
use crate::model::organization::Organization;
use crate::model::poll::Poll;
use crate::model::post::Post;
use crate::model::raw::{RawAccount, RawFilter, RawOrganization, RawPoll, RawPost};
use crate::normalize::normalize_all;
use crate::store::PriorLookup;
use log::debug;

/// A pending node, borrowed from the inbound payload tree.
#[derive(Clone, Copy)]
enum Node<'a> {
    Post(&'a RawPost),
    Account(&'a RawAccount),
    Poll(&'a RawPoll),
    Filter(&'a RawFilter),
}

impl<'a> Node<'a> {
    fn id(self) -> Option<&'a EntityId> {
        match self {
            Self::Post(post) => post.entity_id(),
            Self::Account(account) => account.entity_id(),
            Self::Poll(poll) => poll.entity_id(),
            Self::Filter(filter) => filter.entity_id(),
        }
    }

    fn kind(self) -> EntityKind {
        match self {
            Self::Post(_) => EntityKind::Post,
            Self::Account(_) => EntityKind::Account,
            Self::Poll(_) => EntityKind::Poll,
            Self::Filter(_) => EntityKind::Filter,
        }
    }
}

pub struct GraphWalker<'a> {
    /// Pending nodes with the ancestor-path length they were discovered at.
    stack: Vec<(Node<'a>, usize)>,
    path: Vec<(EntityKind, &'a EntityId)>,
    accounts: UniqueCollector<RawAccount>,
    posts: UniqueCollector<RawPost>,
    polls: UniqueCollector<RawPoll>,
    filters: UniqueCollector<RawFilter>,
    organizations: UniqueCollector<RawOrganization>,
}

impl<'a> GraphWalker<'a> {
    pub fn new(strategy: DedupStrategy) -> Self {
        Self {
            stack: Vec::new(),
            path: Vec::new(),
            accounts: UniqueCollector::new(strategy),
            posts: UniqueCollector::new(strategy),
            polls: UniqueCollector::new(strategy),
            filters: UniqueCollector::new(strategy),
            organizations: UniqueCollector::new(strategy),
        }
    }

    /// Walks root posts: yields posts, accounts, polls and filters.
    pub fn walk_posts(&mut self, roots: &'a [RawPost]) {
        for root in roots {
            self.run(Node::Post(root));
        }
    }

    /// Walks root accounts and their `moved` chains.
    pub fn walk_accounts(&mut self, roots: &'a [RawAccount]) {
        for root in roots {
            self.run(Node::Account(root));
        }
    }

    /// Collects organizations, then walks their members as accounts.
    pub fn walk_organizations(&mut self, roots: &'a [RawOrganization]) {
        for root in roots {
            if self.organizations.push(root.clone()) == Collected::Rejected {
                skip(EntityKind::Organization);
            }
            for member in root.members.iter().flatten() {
                self.run(Node::Account(member));
            }
        }
    }

    /// Collected raw nodes, before normalization.
    pub fn into_output(self) -> WalkOutput {
        WalkOutput {
            accounts: self.accounts.into_vec(),
            posts: self.posts.into_vec(),
            polls: self.polls.into_vec(),
            filters: self.filters.into_vec(),
            organizations: self.organizations.into_vec(),
        }
    }

    /// Normalizes everything collected against `lookup`.
    pub fn finish<L>(self, lookup: &L, config: &ImportConfig) -> NormalizedBatch
    where
        L: PriorLookup + ?Sized,
    {
        let output = self.into_output();
        NormalizedBatch {
            accounts: normalize_all(output.accounts, lookup, config),
            posts: normalize_all(output.posts, lookup, config),
            polls: normalize_all(output.polls, lookup, config),
            filters: normalize_all(output.filters, lookup, config),
            organizations: normalize_all(output.organizations, lookup, config),
        }
    }

    fn run(&mut self, root: Node<'a>) {
        self.stack.push((root, 0));
        while let Some((node, depth)) = self.stack.pop() {
            self.path.truncate(depth);
            self.visit(node);
        }
    }

    fn visit(&mut self, node: Node<'a>) {
        let kind = node.kind();
        let id = node.id();
        let in_progress = id.is_some_and(|id| self.path.contains(&(kind, id)));

        let outcome = match node {
            Node::Post(post) => self.posts.push(post.clone()),
            Node::Account(account) => self.accounts.push(account.clone()),
            Node::Poll(poll) => self.polls.push(poll.clone()),
            Node::Filter(filter) => self.filters.push(filter.clone()),
        };
        if outcome == Collected::Rejected {
            skip(kind);
        }

        let mut pending = children(node);
        if in_progress {
            // Only what this occurrence newly references, so no merged id dangles.
            debug!("event=walk_node module=walker status=cycle kind={kind}");
            pending.retain(|child| !self.is_collected(*child));
        } else if let Some(id) = id {
            self.path.push((kind, id));
        }

        let depth = self.path.len();
        // Reversed so the stack pops children in payload order.
        for child in pending.into_iter().rev() {
            self.stack.push((child, depth));
        }
    }

    fn is_collected(&self, node: Node<'_>) -> bool {
        let Some(id) = node.id() else {
            return false;
        };
        match node {
            Node::Post(_) => self.posts.contains(id),
            Node::Account(_) => self.accounts.contains(id),
            Node::Poll(_) => self.polls.contains(id),
            Node::Filter(_) => self.filters.contains(id),
        }
    }
}

/// Embedded children in discovery order.
fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    match node {
        Node::Post(post) => {
            if let Some(author) = &post.account {
                out.push(Node::Account(author));
            }
            for result in post.filtered.iter().flatten() {
                if let Some(filter) = &result.filter {
                    out.push(Node::Filter(filter));
                }
            }
            if let Some(reblog) = post.reblog.as_deref() {
                out.push(Node::Post(reblog));
            }
            if let Some(poll) = &post.poll {
                out.push(Node::Poll(poll));
            }
            let card_authors = post
                .card
                .as_ref()
                .and_then(|card| card.authors.as_ref())
                .into_iter()
                .flatten();
            // Anonymous authors have no account to collect.
            for author in card_authors {
                if let Some(account) = &author.account {
                    out.push(Node::Account(account));
                }
            }
        }
        Node::Account(account) => {
            if let Some(moved) = account.moved.as_deref() {
                out.push(Node::Account(moved));
            }
        }
        Node::Poll(_) | Node::Filter(_) => {}
    }
    out
}

fn skip(kind: EntityKind) {
    debug!("event=walk_node module=walker status=skip kind={kind} reason=unidentified");
}

/// Deduplicated raw nodes per type, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    pub accounts: Vec<RawAccount>,
    pub posts: Vec<RawPost>,
    pub polls: Vec<RawPoll>,
    pub filters: Vec<RawFilter>,
    pub organizations: Vec<RawOrganization>,
}

/// Deduplicated canonical entities per type, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub accounts: Vec<Account>,
    pub posts: Vec<Post>,
    pub polls: Vec<Poll>,
    pub filters: Vec<Filter>,
    pub organizations: Vec<Organization>,
}
