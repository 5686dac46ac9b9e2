//! Job storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use cropsight_core::UserId;

use super::types::{Job, JobId};

/// Job store abstraction.
///
/// Writers are disciplined by construction: the launcher inserts, the
/// executor advances status/outcome, and the manager applies owner patches.
/// No two components write the same field concurrently, so the store needs no
/// locking beyond single-call atomicity.
pub trait JobStore: Send + Sync {
    /// Persist a new job record.
    fn insert(&self, job: Job) -> Result<(), JobStoreError>;

    /// Fetch a job by id.
    fn get(&self, job_id: JobId) -> Result<Option<Job>, JobStoreError>;

    /// Replace a job record. Fails with `NotFound` if the row is gone.
    fn update(&self, job: &Job) -> Result<(), JobStoreError>;

    /// Delete a job record. Returns whether a row was removed.
    fn remove(&self, job_id: JobId) -> Result<bool, JobStoreError>;

    /// All jobs submitted by `owner`, oldest first.
    fn list_by_owner(&self, owner: UserId) -> Result<Vec<Job>, JobStoreError>;
}

/// Job store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobStoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job already exists: {0}")]
    AlreadyExists(JobId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// In-memory job store (default wiring; tests and single-node deployments).
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored jobs (test introspection).
    pub fn len(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, job: Job) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().unwrap();
        if jobs.contains_key(&job.id) {
            return Err(JobStoreError::AlreadyExists(job.id));
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    fn get(&self, job_id: JobId) -> Result<Option<Job>, JobStoreError> {
        Ok(self.jobs.read().unwrap().get(&job_id).cloned())
    }

    fn update(&self, job: &Job) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().unwrap();
        if !jobs.contains_key(&job.id) {
            return Err(JobStoreError::NotFound(job.id));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    fn remove(&self, job_id: JobId) -> Result<bool, JobStoreError> {
        Ok(self.jobs.write().unwrap().remove(&job_id).is_some())
    }

    fn list_by_owner(&self, owner: UserId) -> Result<Vec<Job>, JobStoreError> {
        let jobs = self.jobs.read().unwrap();
        let mut result: Vec<_> = jobs
            .values()
            .filter(|j| j.owner_id == owner)
            .cloned()
            .collect();
        result.sort_by_key(|j| j.started_at);
        Ok(result)
    }
}

impl<S: JobStore> JobStore for Arc<S> {
    fn insert(&self, job: Job) -> Result<(), JobStoreError> {
        (**self).insert(job)
    }

    fn get(&self, job_id: JobId) -> Result<Option<Job>, JobStoreError> {
        (**self).get(job_id)
    }

    fn update(&self, job: &Job) -> Result<(), JobStoreError> {
        (**self).update(job)
    }

    fn remove(&self, job_id: JobId) -> Result<bool, JobStoreError> {
        (**self).remove(job_id)
    }

    fn list_by_owner(&self, owner: UserId) -> Result<Vec<Job>, JobStoreError> {
        (**self).list_by_owner(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobParams, TrainingParams};
    use cropsight_core::TrainingDatasetId;

    fn job_for(owner: UserId) -> Job {
        Job::new(
            owner,
            JobParams::Training(TrainingParams {
                dataset: TrainingDatasetId::new(),
                model_type: "svm".to_string(),
                hyperparameters: serde_json::json!({}),
            }),
        )
    }

    #[test]
    fn insert_get_update_remove() {
        let store = InMemoryJobStore::new();
        let owner = UserId::new();

        let mut job = job_for(owner);
        let id = job.id;
        store.insert(job.clone()).unwrap();

        assert!(matches!(
            store.insert(job.clone()),
            Err(JobStoreError::AlreadyExists(_))
        ));

        job.mark_running().unwrap();
        store.update(&job).unwrap();
        let fetched = store.get(id).unwrap().unwrap();
        assert_eq!(fetched.status, crate::types::JobStatus::Running);

        assert!(store.remove(id).unwrap());
        assert!(!store.remove(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
    }

    #[test]
    fn update_of_missing_row_reports_not_found() {
        let store = InMemoryJobStore::new();
        let job = job_for(UserId::new());
        assert!(matches!(
            store.update(&job),
            Err(JobStoreError::NotFound(_))
        ));
    }

    #[test]
    fn list_is_scoped_to_owner_and_ordered() {
        let store = InMemoryJobStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let first = job_for(alice);
        let second = job_for(alice);
        store.insert(first.clone()).unwrap();
        store.insert(second.clone()).unwrap();
        store.insert(job_for(bob)).unwrap();

        let listed = store.list_by_owner(alice).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].started_at <= listed[1].started_at);
        assert!(listed.iter().all(|j| j.owner_id == alice));
    }
}
