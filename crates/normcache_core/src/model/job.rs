//! Job postings and applications.
//!
//! Neither shape embeds other entities; references are plain ids.

use crate::model::id::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: EntityId,
    pub title: String,
    pub status: Option<String>,
    pub job_type: Option<String>,
    pub job_category: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub deadline: Option<String>,
    pub organization_name: Option<String>,
    pub organization_logo: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: EntityId,
    pub job_id: Option<EntityId>,
    pub account_id: Option<EntityId>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
