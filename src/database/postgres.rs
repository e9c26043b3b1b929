use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::job_store::{JobFilter, JobStore};
use crate::dto::job_dto::JobPayload;
use crate::error::Result;
use crate::models::job::{Job, JobStatus};

const JOB_COLUMNS: &str =
    "id, owner_id, position, company, location, status, created_at, updated_at";

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so the term is matched literally.
fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    builder
        .push(" WHERE owner_id = ")
        .push_bind(filter.owner_id.clone());

    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        builder
            .push(" AND (position ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, owner_id: &str, payload: &JobPayload) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (owner_id, position, company, location, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(owner_id)
        .bind(&payload.position)
        .bind(&payload.company)
        .bind(&payload.location)
        .bind(payload.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    async fn find_page(&self, filter: &JobFilter, skip: i64, take: i64) -> Result<Vec<Job>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(take)
            .push(" OFFSET ")
            .push_bind(skip);

        tracing::debug!(sql = builder.sql(), "listing jobs");
        let jobs = builder
            .build_query_as::<Job>()
            .fetch_all(&self.pool)
            .await?;

        Ok(jobs)
    }

    async fn count(&self, filter: &JobFilter) -> Result<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn find_one(&self, owner_id: &str, id: Uuid) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1 AND owner_id = $2",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        payload: &JobPayload,
    ) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs
             SET position = $3,
                 company = $4,
                 location = $5,
                 status = $6,
                 updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .bind(&payload.position)
        .bind(&payload.company)
        .bind(&payload.location)
        .bind(payload.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "DELETE FROM jobs WHERE id = $1 AND owner_id = $2 RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn count_by_status(&self, owner_id: &str) -> Result<Vec<(JobStatus, i64)>> {
        let rows = sqlx::query_as::<_, (JobStatus, i64)>(
            r#"
            SELECT status, COUNT(*)
            FROM jobs
            WHERE owner_id = $1
            GROUP BY status
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn created_since(&self, owner_id: &str, since: DateTime<Utc>) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs
             WHERE owner_id = $1 AND created_at >= $2
             ORDER BY created_at ASC, id ASC",
            JOB_COLUMNS
        ))
        .bind(owner_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("acme"), "%acme%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn filter_renders_owner_search_and_status() {
        let filter = JobFilter::for_owner("alice")
            .with_search(Some("acme"))
            .with_status(Some(JobStatus::Interview));
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_filter(&mut builder, &filter);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM jobs WHERE owner_id = $1 AND (position ILIKE $2 OR company ILIKE $3) AND status = $4"
        );
    }

    #[test]
    fn owner_only_filter_has_single_predicate() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_filter(&mut builder, &JobFilter::for_owner("alice"));
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM jobs WHERE owner_id = $1");
    }
}
