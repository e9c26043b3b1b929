use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::database::{JobFilter, JobStore};
use crate::dto::job_dto::{JobListQuery, JobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobStats, JobStatus, MonthlyApplications};
use crate::utils::time::{month_label, months_before, now};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const CHART_WINDOW_MONTHS: u32 = 6;

/// Status value meaning "do not filter by status".
const ALL_STATUSES: &str = "all";

#[derive(Debug, Clone, PartialEq)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub count: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl JobPage {
    pub fn empty() -> Self {
        Self {
            jobs: Vec::new(),
            count: 0,
            page: 1,
            total_pages: 0,
        }
    }
}

/// Job records of a single caller. Every operation takes the caller's
/// identity and never touches rows owned by anyone else.
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Returns `None` when the payload is invalid or the insert fails.
    pub async fn create_job(&self, caller: &str, payload: JobPayload) -> Option<Job> {
        match self.try_create(caller, &payload).await {
            Ok(job) => {
                info!(owner_id = caller, job_id = %job.id, "job created");
                Some(job)
            }
            Err(e) => {
                error!(owner_id = caller, error = %e, "failed to create job");
                None
            }
        }
    }

    async fn try_create(&self, caller: &str, payload: &JobPayload) -> Result<Job> {
        payload.validate()?;
        self.store.insert(caller, payload).await
    }

    /// Never fails; errors are logged and reported as an empty page.
    pub async fn list_jobs(&self, caller: &str, query: JobListQuery) -> JobPage {
        match self.try_list(caller, query).await {
            Ok(page) => page,
            Err(e) => {
                error!(owner_id = caller, error = %e, "failed to list jobs");
                JobPage::empty()
            }
        }
    }

    async fn try_list(&self, caller: &str, query: JobListQuery) -> Result<JobPage> {
        let page = parse_number("page", query.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_number("limit", query.limit.as_deref(), DEFAULT_LIMIT)?;
        if page < 1 || limit < 1 {
            return Err(Error::BadRequest(format!(
                "page and limit must be positive (page={}, limit={})",
                page, limit
            )));
        }

        let filter = JobFilter::for_owner(caller)
            .with_search(query.search.as_deref())
            .with_status(parse_status_filter(query.status.as_deref())?);

        let skip = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| Error::BadRequest("page out of range".to_string()))?;
        let jobs = self.store.find_page(&filter, skip, limit).await?;
        let count = self.store.count(&filter).await?;
        let total_pages = if count == 0 { 0 } else { (count - 1) / limit + 1 };

        Ok(JobPage {
            jobs,
            count,
            page,
            total_pages,
        })
    }

    /// Fails with [`Error::NotFound`] when the job is missing, belongs to
    /// another user, or cannot be read.
    pub async fn get_job(&self, caller: &str, id: Uuid) -> Result<Job> {
        match self.store.find_one(caller, id).await {
            Ok(Some(job)) => Ok(job),
            Ok(None) => Err(Error::NotFound(format!("Job {} not found", id))),
            Err(e) => {
                error!(owner_id = caller, job_id = %id, error = %e, "failed to load job");
                Err(Error::NotFound(format!("Job {} not found", id)))
            }
        }
    }

    /// Replaces every editable field. `None` on invalid payload, unknown
    /// job or store failure.
    pub async fn update_job(&self, caller: &str, id: Uuid, payload: JobPayload) -> Option<Job> {
        let result = match payload.validate() {
            Ok(()) => self.store.update(caller, id, &payload).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(Some(job)) => {
                info!(owner_id = caller, job_id = %id, "job updated");
                Some(job)
            }
            Ok(None) => {
                warn!(owner_id = caller, job_id = %id, "job to update not found");
                None
            }
            Err(e) => {
                error!(owner_id = caller, job_id = %id, error = %e, "failed to update job");
                None
            }
        }
    }

    /// Returns the deleted record, or `None` if nothing was deleted.
    pub async fn delete_job(&self, caller: &str, id: Uuid) -> Option<Job> {
        match self.store.delete(caller, id).await {
            Ok(Some(job)) => {
                info!(owner_id = caller, job_id = %id, "job deleted");
                Some(job)
            }
            Ok(None) => {
                warn!(owner_id = caller, job_id = %id, "job to delete not found");
                None
            }
            Err(e) => {
                error!(owner_id = caller, job_id = %id, error = %e, "failed to delete job");
                None
            }
        }
    }

    pub async fn get_stats(&self, caller: &str) -> Result<JobStats> {
        let counts = self.store.count_by_status(caller).await.map_err(|e| {
            error!(owner_id = caller, error = %e, "failed to compute job stats");
            e
        })?;
        Ok(JobStats::from_counts(counts))
    }

    pub async fn get_chart_data(&self, caller: &str) -> Result<Vec<MonthlyApplications>> {
        self.chart_data_at(caller, now()).await
    }

    /// Monthly application counts for the window ending at `at`.
    pub async fn chart_data_at(
        &self,
        caller: &str,
        at: DateTime<Utc>,
    ) -> Result<Vec<MonthlyApplications>> {
        let since = months_before(at, CHART_WINDOW_MONTHS);
        let jobs = self.store.created_since(caller, since).await.map_err(|e| {
            error!(owner_id = caller, error = %e, "failed to load chart data");
            e
        })?;
        Ok(applications_per_month(&jobs))
    }
}

/// Missing or empty values fall back to `default`.
fn parse_number(name: &str, raw: Option<&str>, default: i64) -> Result<i64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<i64>()
            .map_err(|e| Error::BadRequest(format!("invalid {} `{}`: {}", name, value, e))),
    }
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<JobStatus>> {
    match raw {
        None | Some("") | Some(ALL_STATUSES) => Ok(None),
        Some(value) => value.parse::<JobStatus>().map(Some).map_err(Error::BadRequest),
    }
}

/// Buckets jobs by creation month. Buckets appear in the order their month
/// is first seen, so callers must pass jobs oldest first.
pub fn applications_per_month(jobs: &[Job]) -> Vec<MonthlyApplications> {
    jobs.iter()
        .fold(Vec::<MonthlyApplications>::new(), |mut acc, job| {
            let date = month_label(job.created_at);
            match acc.iter_mut().find(|entry| entry.date == date) {
                Some(entry) => entry.count += 1,
                None => acc.push(MonthlyApplications { date, count: 1 }),
            }
            acc
        })
}
