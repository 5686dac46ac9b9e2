//! Owner-guarded job maintenance (update/delete).

use serde::Deserialize;
use tracing::info;

use cropsight_auth::assert_owner;
use cropsight_core::{DomainError, UserId};

use crate::error::JobError;
use crate::store::JobStore;
use crate::types::{Job, JobId, JobResult, JobStatus};

/// Owner-initiated partial update. Only status/result fields are patchable;
/// identity, ownership, and parameters are immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub result: Option<JobResult>,
    pub error_info: Option<String>,
}

/// Update/delete path for job records.
pub struct JobManager<S> {
    store: S,
}

impl<S: JobStore> JobManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Apply an owner patch. Status changes obey the same forward-only
    /// transitions as the executor's; a rejected patch leaves the record
    /// unmodified.
    pub fn update(&self, job_id: JobId, caller: UserId, patch: JobPatch) -> Result<Job, JobError> {
        let mut job = self
            .store
            .get(job_id)?
            .ok_or(DomainError::NotFound("job"))?;
        assert_owner(job.owner_id, caller)?;

        job.apply_patch(patch)?;
        self.store.update(&job)?;
        Ok(job)
    }

    /// Delete a job record.
    ///
    /// A still-running executor invocation for this id is not interrupted; it
    /// finds the record gone at its next write and abandons the outcome.
    pub fn delete(&self, job_id: JobId, caller: UserId) -> Result<(), JobError> {
        let job = self
            .store
            .get(job_id)?
            .ok_or(DomainError::NotFound("job"))?;
        assert_owner(job.owner_id, caller)?;

        self.store.remove(job_id)?;
        info!(job_id = %job_id, "job deleted by owner");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryJobStore;
    use crate::types::{JobParams, TrainingParams};
    use cropsight_core::TrainingDatasetId;

    fn stored_job(store: &InMemoryJobStore, owner: UserId) -> Job {
        let job = Job::new(
            owner,
            JobParams::Training(TrainingParams {
                dataset: TrainingDatasetId::new(),
                model_type: "svm".to_string(),
                hyperparameters: serde_json::json!({}),
            }),
        );
        store.insert(job.clone()).unwrap();
        job
    }

    #[test]
    fn owner_can_advance_status() {
        let store = InMemoryJobStore::arc();
        let owner = UserId::new();
        let job = stored_job(&store, owner);
        let manager = JobManager::new(store.clone());

        let updated = manager
            .update(
                job.id,
                owner,
                JobPatch {
                    status: Some(JobStatus::Running),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, JobStatus::Running);

        let updated = manager
            .update(
                job.id,
                owner,
                JobPatch {
                    status: Some(JobStatus::Completed),
                    result: Some(JobResult::Training {
                        accuracy: 0.91,
                        error_rate: 0.09,
                    }),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, JobStatus::Completed);
        assert!(updated.result.is_some());
    }

    #[test]
    fn backward_transition_is_rejected_and_row_untouched() {
        let store = InMemoryJobStore::arc();
        let owner = UserId::new();
        let mut job = stored_job(&store, owner);
        job.mark_running().unwrap();
        store.update(&job).unwrap();

        let manager = JobManager::new(store.clone());
        let err = manager
            .update(
                job.id,
                owner,
                JobPatch {
                    status: Some(JobStatus::Pending),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, JobError::Domain(DomainError::Conflict(_))));
        assert_eq!(store.get(job.id).unwrap().unwrap(), job);
    }

    #[test]
    fn non_owner_update_is_forbidden_and_row_untouched() {
        let store = InMemoryJobStore::arc();
        let owner = UserId::new();
        let job = stored_job(&store, owner);
        let manager = JobManager::new(store.clone());

        let err = manager
            .update(
                job.id,
                UserId::new(),
                JobPatch {
                    status: Some(JobStatus::Running),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, JobError::Domain(DomainError::Forbidden)));
        assert_eq!(store.get(job.id).unwrap().unwrap(), job);
    }

    #[test]
    fn result_patch_requires_completed_state() {
        let store = InMemoryJobStore::arc();
        let owner = UserId::new();
        let job = stored_job(&store, owner);
        let manager = JobManager::new(store.clone());

        let err = manager
            .update(
                job.id,
                owner,
                JobPatch {
                    result: Some(JobResult::Training {
                        accuracy: 0.8,
                        error_rate: 0.2,
                    }),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(matches!(
            err,
            JobError::Domain(DomainError::Validation(_))
        ));
    }

    #[test]
    fn delete_is_owner_guarded() {
        let store = InMemoryJobStore::arc();
        let owner = UserId::new();
        let job = stored_job(&store, owner);
        let manager = JobManager::new(store.clone());

        let err = manager.delete(job.id, UserId::new()).unwrap_err();
        assert!(matches!(err, JobError::Domain(DomainError::Forbidden)));
        assert!(store.get(job.id).unwrap().is_some());

        manager.delete(job.id, owner).unwrap();
        assert!(store.get(job.id).unwrap().is_none());

        let err = manager.delete(job.id, owner).unwrap_err();
        assert!(matches!(
            err,
            JobError::Domain(DomainError::NotFound(_))
        ));
    }
}
