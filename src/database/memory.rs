use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::job_store::{JobFilter, JobStore};
use crate::dto::job_dto::JobPayload;
use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::utils::time::now;

#[derive(Debug)]
struct Row {
    seq: u64,
    job: Job,
}

#[derive(Debug, Default)]
struct Table {
    next_seq: u64,
    rows: Vec<Row>,
}

/// In-process job table. Rows created within the same clock tick keep
/// their insertion order, so ordering by creation time stays total.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    table: Mutex<Table>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| Error::Internal("job table lock poisoned".to_string()))
    }

    /// Stores a job with an explicit creation time.
    pub fn insert_at(
        &self,
        owner_id: &str,
        payload: &JobPayload,
        created_at: DateTime<Utc>,
    ) -> Result<Job> {
        let mut table = self.lock()?;
        let job = Job {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            position: payload.position.clone(),
            company: payload.company.clone(),
            location: payload.location.clone(),
            status: payload.status,
            created_at,
            updated_at: created_at,
        };
        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.push(Row {
            seq,
            job: job.clone(),
        });
        Ok(job)
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, owner_id: &str, payload: &JobPayload) -> Result<Job> {
        self.insert_at(owner_id, payload, now())
    }

    async fn find_page(&self, filter: &JobFilter, skip: i64, take: i64) -> Result<Vec<Job>> {
        let table = self.lock()?;
        let mut matching: Vec<&Row> = table
            .rows
            .iter()
            .filter(|row| filter.matches(&row.job))
            .collect();
        matching.sort_by(|a, b| {
            b.job
                .created_at
                .cmp(&a.job.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(matching
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(take.max(0) as usize)
            .map(|row| row.job.clone())
            .collect())
    }

    async fn count(&self, filter: &JobFilter) -> Result<i64> {
        let table = self.lock()?;
        Ok(table.rows.iter().filter(|row| filter.matches(&row.job)).count() as i64)
    }

    async fn find_one(&self, owner_id: &str, id: Uuid) -> Result<Option<Job>> {
        let table = self.lock()?;
        Ok(table
            .rows
            .iter()
            .find(|row| row.job.id == id && row.job.owner_id == owner_id)
            .map(|row| row.job.clone()))
    }

    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        payload: &JobPayload,
    ) -> Result<Option<Job>> {
        let mut table = self.lock()?;
        let Some(row) = table
            .rows
            .iter_mut()
            .find(|row| row.job.id == id && row.job.owner_id == owner_id)
        else {
            return Ok(None);
        };

        row.job.position = payload.position.clone();
        row.job.company = payload.company.clone();
        row.job.location = payload.location.clone();
        row.job.status = payload.status;
        row.job.updated_at = now();
        Ok(Some(row.job.clone()))
    }

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<Option<Job>> {
        let mut table = self.lock()?;
        let position = table
            .rows
            .iter()
            .position(|row| row.job.id == id && row.job.owner_id == owner_id);
        Ok(position.map(|index| table.rows.remove(index).job))
    }

    async fn count_by_status(&self, owner_id: &str) -> Result<Vec<(JobStatus, i64)>> {
        let table = self.lock()?;
        let mut counts: HashMap<JobStatus, i64> = HashMap::new();
        for row in table.rows.iter().filter(|row| row.job.owner_id == owner_id) {
            *counts.entry(row.job.status).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn created_since(&self, owner_id: &str, since: DateTime<Utc>) -> Result<Vec<Job>> {
        let table = self.lock()?;
        let mut matching: Vec<&Row> = table
            .rows
            .iter()
            .filter(|row| row.job.owner_id == owner_id && row.job.created_at >= since)
            .collect();
        matching.sort_by(|a, b| a.job.created_at.cmp(&b.job.created_at).then(a.seq.cmp(&b.seq)));
        Ok(matching.into_iter().map(|row| row.job.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload(position: &str, status: JobStatus) -> JobPayload {
        JobPayload {
            position: position.into(),
            company: "Acme".into(),
            location: "Remote".into(),
            status,
        }
    }

    #[tokio::test]
    async fn same_timestamp_rows_page_newest_insert_first() {
        let store = MemoryJobStore::new();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let first = store.insert_at("alice", &payload("first", JobStatus::Pending), at).unwrap();
        let second = store.insert_at("alice", &payload("second", JobStatus::Pending), at).unwrap();

        let page = store
            .find_page(&JobFilter::for_owner("alice"), 0, 10)
            .await
            .unwrap();
        assert_eq!(page, vec![second, first]);
    }

    #[tokio::test]
    async fn delete_is_owner_scoped() {
        let store = MemoryJobStore::new();
        let job = store.insert("alice", &payload("Engineer", JobStatus::Pending)).await.unwrap();

        assert_eq!(store.delete("bob", job.id).await.unwrap(), None);
        assert_eq!(store.delete("alice", job.id).await.unwrap(), Some(job.clone()));
        assert_eq!(store.find_one("alice", job.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn created_since_is_inclusive_and_ascending() {
        let store = MemoryJobStore::new();
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let boundary = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        store.insert_at("alice", &payload("late", JobStatus::Pending), late).unwrap();
        store.insert_at("alice", &payload("early", JobStatus::Pending), early).unwrap();
        store.insert_at("alice", &payload("edge", JobStatus::Pending), boundary).unwrap();

        let jobs = store.created_since("alice", boundary).await.unwrap();
        let positions: Vec<_> = jobs.iter().map(|j| j.position.as_str()).collect();
        assert_eq!(positions, vec!["edge", "late"]);
    }
}
