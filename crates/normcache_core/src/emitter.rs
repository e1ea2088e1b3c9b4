//! Batch emitter: one inbound batch in, one emission out.
//!
//! # Responsibility
//! - Run the walker over a batch and package the normalized collections.
//! - Order commands so referenced entities precede their referrers.
//!
//! # Invariants
//! - Each command's collection is id-unique.
//! - Empty collections are not emitted.
//! - Emission is synchronous and all-or-nothing; nothing is emitted for a
//!   batch that was never delivered.

use crate::collector::UniqueCollector;
use crate::config::ImportConfig;
use crate::model::account::Account;
use crate::model::entity::{CanonicalEntity, Entity};
use crate::model::filter::Filter;
use crate::model::id::{EntityKind, Identified};
use crate::model::job::{Job, JobApplication};
use crate::model::lenient;
use crate::model::organization::Organization;
use crate::model::poll::Poll;
use crate::model::post::Post;
use crate::model::raw::{RawAccount, RawJob, RawJobApplication, RawOrganization, RawPost};
use crate::normalize::{normalize_all, Normalize};
use crate::store::PriorLookup;
use crate::walker::{GraphWalker, NormalizedBatch};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Inbound batch, tagged by what the request returned.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum RawBatch {
    Post(Box<RawPost>),
    Posts(#[serde(deserialize_with = "lenient::items")] Vec<RawPost>),
    Account(Box<RawAccount>),
    Accounts(#[serde(deserialize_with = "lenient::items")] Vec<RawAccount>),
    Organization(Box<RawOrganization>),
    Organizations(#[serde(deserialize_with = "lenient::items")] Vec<RawOrganization>),
    Job(Box<RawJob>),
    Jobs(#[serde(deserialize_with = "lenient::items")] Vec<RawJob>),
    JobApplication(Box<RawJobApplication>),
    JobApplications(#[serde(deserialize_with = "lenient::items")] Vec<RawJobApplication>),
}

impl RawBatch {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// One instruction to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ImportCommand {
    Account(Account),
    Organization(Organization),
    Job(Job),
    JobApplication(JobApplication),
    Accounts(Vec<Account>),
    Posts(Vec<Post>),
    Polls(Vec<Poll>),
    Filters(Vec<Filter>),
    Organizations(Vec<Organization>),
    Jobs(Vec<Job>),
    JobApplications(Vec<JobApplication>),
}

impl ImportCommand {
    /// The serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Account(_) => "account",
            Self::Organization(_) => "organization",
            Self::Job(_) => "job",
            Self::JobApplication(_) => "job_application",
            Self::Accounts(_) => "accounts",
            Self::Posts(_) => "posts",
            Self::Polls(_) => "polls",
            Self::Filters(_) => "filters",
            Self::Organizations(_) => "organizations",
            Self::Jobs(_) => "jobs",
            Self::JobApplications(_) => "job_applications",
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Account(_) | Self::Accounts(_) => EntityKind::Account,
            Self::Organization(_) | Self::Organizations(_) => EntityKind::Organization,
            Self::Job(_) | Self::Jobs(_) => EntityKind::Job,
            Self::JobApplication(_) | Self::JobApplications(_) => EntityKind::JobApplication,
            Self::Posts(_) => EntityKind::Post,
            Self::Polls(_) => EntityKind::Poll,
            Self::Filters(_) => EntityKind::Filter,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Account(_) | Self::Organization(_) | Self::Job(_) | Self::JobApplication(_) => 1,
            Self::Accounts(items) => items.len(),
            Self::Posts(items) => items.len(),
            Self::Polls(items) => items.len(),
            Self::Filters(items) => items.len(),
            Self::Organizations(items) => items.len(),
            Self::Jobs(items) => items.len(),
            Self::JobApplications(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type-erased copies of the carried entities, in order.
    pub fn entities(&self) -> Vec<Entity> {
        match self {
            Self::Account(value) => vec![Entity::Account(value.clone())],
            Self::Organization(value) => vec![Entity::Organization(value.clone())],
            Self::Job(value) => vec![Entity::Job(value.clone())],
            Self::JobApplication(value) => vec![Entity::JobApplication(value.clone())],
            Self::Accounts(items) => erase(items),
            Self::Posts(items) => erase(items),
            Self::Polls(items) => erase(items),
            Self::Filters(items) => erase(items),
            Self::Organizations(items) => erase(items),
            Self::Jobs(items) => erase(items),
            Self::JobApplications(items) => erase(items),
        }
    }
}

fn erase<T: CanonicalEntity + Clone>(items: &[T]) -> Vec<Entity> {
    items.iter().cloned().map(CanonicalEntity::into_entity).collect()
}

/// The commands produced for one inbound batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emission {
    /// Correlates log lines and store rows of one batch.
    pub batch_id: Uuid,
    pub commands: Vec<ImportCommand>,
}

impl Emission {
    fn new(commands: Vec<ImportCommand>) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            commands,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Entity count per kind across all commands.
    pub fn counts(&self) -> BTreeMap<EntityKind, usize> {
        let mut counts = BTreeMap::new();
        for command in &self.commands {
            *counts.entry(command.kind()).or_insert(0) += command.len();
        }
        counts
    }

    pub fn accounts(&self) -> Vec<&Account> {
        let mut out = Vec::new();
        for command in &self.commands {
            match command {
                ImportCommand::Account(value) => out.push(value),
                ImportCommand::Accounts(items) => out.extend(items),
                _ => {}
            }
        }
        out
    }

    pub fn posts(&self) -> Vec<&Post> {
        self.commands
            .iter()
            .flat_map(|command| match command {
                ImportCommand::Posts(items) => items.as_slice(),
                _ => &[],
            })
            .collect()
    }

    pub fn polls(&self) -> Vec<&Poll> {
        self.commands
            .iter()
            .flat_map(|command| match command {
                ImportCommand::Polls(items) => items.as_slice(),
                _ => &[],
            })
            .collect()
    }

    pub fn filters(&self) -> Vec<&Filter> {
        self.commands
            .iter()
            .flat_map(|command| match command {
                ImportCommand::Filters(items) => items.as_slice(),
                _ => &[],
            })
            .collect()
    }

    pub fn organizations(&self) -> Vec<&Organization> {
        let mut out = Vec::new();
        for command in &self.commands {
            match command {
                ImportCommand::Organization(value) => out.push(value),
                ImportCommand::Organizations(items) => out.extend(items),
                _ => {}
            }
        }
        out
    }
}

/// Runs the walk-normalize-package pipeline for one batch at a time.
pub struct BatchEmitter<'a, L: PriorLookup + ?Sized> {
    lookup: &'a L,
    config: &'a ImportConfig,
}

impl<'a, L: PriorLookup + ?Sized> BatchEmitter<'a, L> {
    pub fn new(lookup: &'a L, config: &'a ImportConfig) -> Self {
        Self { lookup, config }
    }

    pub fn emit(&self, batch: &RawBatch) -> Emission {
        match batch {
            RawBatch::Post(post) => self.emit_post(post),
            RawBatch::Posts(posts) => self.emit_posts(posts),
            RawBatch::Account(account) => self.emit_account(account),
            RawBatch::Accounts(accounts) => self.emit_accounts(accounts),
            RawBatch::Organization(organization) => self.emit_organization(organization),
            RawBatch::Organizations(organizations) => self.emit_organizations(organizations),
            RawBatch::Job(job) => self.emit_job(job),
            RawBatch::Jobs(jobs) => self.emit_jobs(jobs),
            RawBatch::JobApplication(application) => self.emit_job_application(application),
            RawBatch::JobApplications(applications) => self.emit_job_applications(applications),
        }
    }

    /// Nothing is emitted when the root post itself is unidentified.
    pub fn emit_post(&self, post: &RawPost) -> Emission {
        if post.admissible_id().is_none() {
            return self.finish("post", 1, Vec::new());
        }
        self.emit_posts(std::slice::from_ref(post))
    }

    /// Polls, accounts and filters precede the posts that reference them.
    pub fn emit_posts(&self, posts: &[RawPost]) -> Emission {
        let mut walker = GraphWalker::new(self.config.dedup_strategy);
        walker.walk_posts(posts);
        let batch = walker.finish(self.lookup, self.config);

        let mut commands = Vec::new();
        push_nonempty(&mut commands, batch.polls, ImportCommand::Polls);
        push_nonempty(&mut commands, batch.accounts, ImportCommand::Accounts);
        push_nonempty(&mut commands, batch.filters, ImportCommand::Filters);
        push_nonempty(&mut commands, batch.posts, ImportCommand::Posts);
        self.finish("posts", posts.len(), commands)
    }

    /// The root as a single command, its moved chain as a collection.
    pub fn emit_account(&self, account: &RawAccount) -> Emission {
        if account.entity_id().is_none() {
            return self.finish("account", 1, Vec::new());
        }
        let batch = self.walk_accounts(std::slice::from_ref(account));
        let mut accounts = batch.accounts.into_iter();
        let mut commands = Vec::new();
        if let Some(root) = accounts.next() {
            push_nonempty(&mut commands, accounts.collect(), ImportCommand::Accounts);
            commands.push(ImportCommand::Account(root));
        }
        self.finish("account", 1, commands)
    }

    pub fn emit_accounts(&self, accounts: &[RawAccount]) -> Emission {
        let batch = self.walk_accounts(accounts);
        let mut commands = Vec::new();
        push_nonempty(&mut commands, batch.accounts, ImportCommand::Accounts);
        self.finish("accounts", accounts.len(), commands)
    }

    pub fn emit_organization(&self, organization: &RawOrganization) -> Emission {
        let batch = self.walk_organizations(std::slice::from_ref(organization));
        let mut commands = Vec::new();
        if let Some(root) = batch.organizations.into_iter().next() {
            push_nonempty(&mut commands, batch.accounts, ImportCommand::Accounts);
            commands.push(ImportCommand::Organization(root));
        }
        self.finish("organization", 1, commands)
    }

    /// Member accounts precede the organizations listing them.
    pub fn emit_organizations(&self, organizations: &[RawOrganization]) -> Emission {
        let batch = self.walk_organizations(organizations);
        let mut commands = Vec::new();
        push_nonempty(&mut commands, batch.accounts, ImportCommand::Accounts);
        push_nonempty(&mut commands, batch.organizations, ImportCommand::Organizations);
        self.finish("organizations", organizations.len(), commands)
    }

    pub fn emit_job(&self, job: &RawJob) -> Emission {
        let commands = self
            .collect_flat(std::slice::from_ref(job))
            .into_iter()
            .map(ImportCommand::Job)
            .collect();
        self.finish("job", 1, commands)
    }

    pub fn emit_jobs(&self, jobs: &[RawJob]) -> Emission {
        let mut commands = Vec::new();
        push_nonempty(&mut commands, self.collect_flat(jobs), ImportCommand::Jobs);
        self.finish("jobs", jobs.len(), commands)
    }

    pub fn emit_job_application(&self, application: &RawJobApplication) -> Emission {
        let commands = self
            .collect_flat(std::slice::from_ref(application))
            .into_iter()
            .map(ImportCommand::JobApplication)
            .collect();
        self.finish("job_application", 1, commands)
    }

    pub fn emit_job_applications(&self, applications: &[RawJobApplication]) -> Emission {
        let mut commands = Vec::new();
        push_nonempty(
            &mut commands,
            self.collect_flat(applications),
            ImportCommand::JobApplications,
        );
        self.finish("job_applications", applications.len(), commands)
    }

    fn walk_accounts(&self, accounts: &[RawAccount]) -> NormalizedBatch {
        let mut walker = GraphWalker::new(self.config.dedup_strategy);
        walker.walk_accounts(accounts);
        walker.finish(self.lookup, self.config)
    }

    fn walk_organizations(&self, organizations: &[RawOrganization]) -> NormalizedBatch {
        let mut walker = GraphWalker::new(self.config.dedup_strategy);
        walker.walk_organizations(organizations);
        walker.finish(self.lookup, self.config)
    }

    /// Dedup and normalize for types without embedded fan-out.
    fn collect_flat<R>(&self, raws: &[R]) -> Vec<R::Canonical>
    where
        R: Normalize + crate::collector::Merge + Clone,
    {
        let mut collector = UniqueCollector::new(self.config.dedup_strategy);
        for raw in raws {
            collector.push(raw.clone());
        }
        normalize_all(collector.into_vec(), self.lookup, self.config)
    }

    fn finish(&self, source: &str, roots: usize, commands: Vec<ImportCommand>) -> Emission {
        let emission = Emission::new(commands);
        info!(
            "event=emit module=emitter status=ok batch_id={} source={} roots={} commands={} entities={}",
            emission.batch_id,
            source,
            roots,
            emission.commands.len(),
            emission.counts().values().sum::<usize>()
        );
        emission
    }
}

fn push_nonempty<T>(
    commands: &mut Vec<ImportCommand>,
    items: Vec<T>,
    wrap: fn(Vec<T>) -> ImportCommand,
) {
    if !items.is_empty() {
        commands.push(wrap(items));
    }
}
