//! Status read path for polling clients.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cropsight_core::{DomainError, UserId};

use crate::error::JobError;
use crate::store::JobStore;
use crate::types::{Job, JobId, JobKind, JobResult, JobStatus};

/// Client-facing view of a job's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatusView {
    pub id: JobId,
    pub kind: JobKind,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_info: Option<String>,
}

impl From<Job> for JobStatusView {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            kind: job.kind(),
            status: job.status,
            started_at: job.started_at,
            completed_at: job.completed_at,
            result: job.result,
            error_info: job.error_info,
        }
    }
}

/// Read-only reconstruction of job status from the store.
///
/// Pure reads, safe to poll repeatedly and concurrently with executor writes.
/// Reads are not owner-guarded: anyone holding a job id may poll it.
pub struct StatusReporter<S> {
    store: S,
}

impl<S: JobStore> StatusReporter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_status(&self, job_id: JobId) -> Result<JobStatusView, JobError> {
        let job = self
            .store
            .get(job_id)?
            .ok_or(DomainError::NotFound("job"))?;
        Ok(job.into())
    }

    pub fn list_for_owner(&self, owner: UserId) -> Result<Vec<JobStatusView>, JobError> {
        let jobs = self.store.list_by_owner(owner)?;
        Ok(jobs.into_iter().map(JobStatusView::from).collect())
    }
}
