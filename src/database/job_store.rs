use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::job_dto::JobPayload;
use crate::error::Result;
use crate::models::job::{Job, JobStatus};

/// Predicate for listing and counting jobs. Always scoped to one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFilter {
    pub owner_id: String,
    pub search: Option<String>,
    pub status: Option<JobStatus>,
}

impl JobFilter {
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            search: None,
            status: None,
        }
    }

    /// Empty search terms are ignored.
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn with_status(mut self, status: Option<JobStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn matches(&self, job: &Job) -> bool {
        if job.owner_id != self.owner_id {
            return false;
        }
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                job.position.to_lowercase().contains(&term)
                    || job.company.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Persistence for job records. Every method is scoped to an owner, either
/// through a [`JobFilter`] or an explicit `owner_id` argument.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, owner_id: &str, payload: &JobPayload) -> Result<Job>;

    /// Newest first.
    async fn find_page(&self, filter: &JobFilter, skip: i64, take: i64) -> Result<Vec<Job>>;

    async fn count(&self, filter: &JobFilter) -> Result<i64>;

    async fn find_one(&self, owner_id: &str, id: Uuid) -> Result<Option<Job>>;

    async fn update(&self, owner_id: &str, id: Uuid, payload: &JobPayload)
        -> Result<Option<Job>>;

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<Option<Job>>;

    async fn count_by_status(&self, owner_id: &str) -> Result<Vec<(JobStatus, i64)>>;

    /// Oldest first.
    async fn created_since(&self, owner_id: &str, since: DateTime<Utc>) -> Result<Vec<Job>>;
}
