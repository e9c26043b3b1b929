use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Interview,
    Declined,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Pending, JobStatus::Interview, JobStatus::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Interview => "interview",
            JobStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown job status: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub owner_id: String,
    pub position: String,
    pub company: String,
    pub location: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Applications counted per status. Every status is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JobStats {
    pub pending: i64,
    pub interview: i64,
    pub declined: i64,
}

impl JobStats {
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (JobStatus, i64)>,
    {
        counts
            .into_iter()
            .fold(Self::default(), |mut stats, (status, count)| {
                match status {
                    JobStatus::Pending => stats.pending = count,
                    JobStatus::Interview => stats.interview = count,
                    JobStatus::Declined => stats.declined = count,
                }
                stats
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyApplications {
    /// Month label such as `Jan 24`.
    pub date: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("interview".parse::<JobStatus>(), Ok(JobStatus::Interview));
        assert!("Interview".parse::<JobStatus>().is_err());
        assert!("all".parse::<JobStatus>().is_err());
    }

    #[test]
    fn stats_fill_missing_statuses_with_zero() {
        let stats = JobStats::from_counts(vec![(JobStatus::Declined, 4)]);
        assert_eq!(
            stats,
            JobStats {
                pending: 0,
                interview: 0,
                declined: 4
            }
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        let value = serde_json::to_value(JobStatus::Pending).unwrap();
        assert_eq!(value, serde_json::json!("pending"));
    }
}
