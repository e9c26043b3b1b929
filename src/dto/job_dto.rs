use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::job::{Job, JobStatus};
use crate::services::job_service::JobPage;
use crate::utils::validation::not_blank;

/// Body of create and update requests. Updates replace every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct JobPayload {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub position: String,
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub company: String,
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub location: String,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub search: Option<String>,
    /// A status name, or `all` for no status filter.
    pub status: Option<String>,
    /// Kept as raw text so malformed numbers reach the service, which
    /// answers them with an empty page.
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: Uuid,
    pub position: String,
    pub company: String,
    pub location: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobPageResponse {
    pub jobs: Vec<JobResponse>,
    pub count: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        Self {
            id: value.id,
            position: value.position,
            company: value.company,
            location: value.location,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<JobPage> for JobPageResponse {
    fn from(value: JobPage) -> Self {
        Self {
            jobs: value.jobs.into_iter().map(Into::into).collect(),
            count: value.count,
            page: value.page,
            total_pages: value.total_pages,
        }
    }
}
