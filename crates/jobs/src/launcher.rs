//! Job launcher: validate, persist pending, hand off, return.

use std::sync::Arc;

use tracing::info;

use cropsight_auth::assert_owner;
use cropsight_core::{DomainError, UserId};

use crate::directory::InputDirectory;
use crate::error::JobError;
use crate::executor::JobExecutor;
use crate::store::JobStore;
use crate::types::{Job, JobId, JobParams};

/// Entry point for submitting background work.
///
/// `launch` never waits for the executor: it returns as soon as the pending
/// record is durable. Re-launching with identical parameters creates a new,
/// independent job; deduplication is intentionally absent and callers rely
/// on that.
pub struct JobLauncher<S, D> {
    store: S,
    directory: D,
    executor: Arc<JobExecutor<S>>,
}

impl<S, D> JobLauncher<S, D>
where
    S: JobStore + 'static,
    D: InputDirectory,
{
    pub fn new(store: S, directory: D, executor: Arc<JobExecutor<S>>) -> Self {
        Self {
            store,
            directory,
            executor,
        }
    }

    /// Validate the input reference, persist a pending job, and schedule
    /// exactly one executor invocation for it.
    ///
    /// Fails with `NotFound` when the reference does not resolve, `Forbidden`
    /// when the caller does not own the referenced entity, and `Validation`
    /// when an analysis input has no backing file. No job record exists after
    /// a failed launch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(&self, owner_id: UserId, params: JobParams) -> Result<JobId, JobError> {
        let input = self.directory.resolve(&params.input_ref())?;
        assert_owner(input.owner_id, owner_id)?;

        if matches!(params, JobParams::Analysis(_)) && input.data_path.is_none() {
            return Err(DomainError::validation(
                "referenced data product has no attached file",
            )
            .into());
        }

        let job = Job::new(owner_id, params);
        let job_id = job.id;
        let kind = job.kind();
        self.store.insert(job)?;

        self.executor.spawn(job_id, input);
        info!(job_id = %job_id, kind = %kind, owner_id = %owner_id, "job launched");

        Ok(job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    use chrono::NaiveDate;
    use cropsight_core::{DataProductId, DomainResult, TrainingDatasetId};

    use crate::directory::{InputRef, ResolvedInput};
    use crate::executor::ExecutorConfig;
    use crate::script::RecordingScriptRunner;
    use crate::store::InMemoryJobStore;
    use crate::trainer::{ModelTrainer, TrainError, TrainingMetrics, TrainingSpec};
    use crate::types::{AnalysisParams, AnalysisRequest, JobStatus, TrainingParams};

    #[derive(Default)]
    struct StubDirectory {
        entries: HashMap<InputRef, ResolvedInput>,
    }

    impl StubDirectory {
        fn with(mut self, input: InputRef, resolved: ResolvedInput) -> Self {
            self.entries.insert(input, resolved);
            self
        }
    }

    impl InputDirectory for StubDirectory {
        fn resolve(&self, input: &InputRef) -> DomainResult<ResolvedInput> {
            self.entries
                .get(input)
                .cloned()
                .ok_or(DomainError::NotFound("job input"))
        }
    }

    struct SlowTrainer {
        delay: Duration,
    }

    impl ModelTrainer for SlowTrainer {
        fn train(&self, _spec: &TrainingSpec) -> Result<TrainingMetrics, TrainError> {
            std::thread::sleep(self.delay);
            Ok(TrainingMetrics {
                accuracy: 0.8,
                error_rate: 0.2,
            })
        }
    }

    fn rig(
        store: std::sync::Arc<InMemoryJobStore>,
        directory: StubDirectory,
        trainer: std::sync::Arc<dyn ModelTrainer>,
    ) -> JobLauncher<std::sync::Arc<InMemoryJobStore>, StubDirectory> {
        let executor = Arc::new(JobExecutor::new(
            store.clone(),
            trainer,
            std::sync::Arc::new(RecordingScriptRunner::new()),
            ExecutorConfig::default(),
        ));
        JobLauncher::new(store, directory, executor)
    }

    fn training_params(dataset: TrainingDatasetId) -> JobParams {
        JobParams::Training(TrainingParams {
            dataset,
            model_type: "svm".to_string(),
            hyperparameters: serde_json::json!({}),
        })
    }

    fn dataset_input(owner: UserId) -> ResolvedInput {
        ResolvedInput {
            owner_id: owner,
            data_path: Some("/data/train.csv".to_string()),
            data_type: Some("ndvi".to_string()),
        }
    }

    async fn wait_for_terminal(
        store: &InMemoryJobStore,
        id: JobId,
    ) -> crate::types::Job {
        for _ in 0..200 {
            let job = store.get(id).unwrap().unwrap();
            if job.status.is_terminal() {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("job never reached a terminal state");
    }

    #[tokio::test]
    async fn missing_input_fails_without_creating_a_record() {
        let store = InMemoryJobStore::arc();
        let launcher = rig(
            store.clone(),
            StubDirectory::default(),
            std::sync::Arc::new(SlowTrainer {
                delay: Duration::ZERO,
            }),
        );

        let err = launcher
            .launch(UserId::new(), training_params(TrainingDatasetId::new()))
            .unwrap_err();

        assert!(matches!(
            err,
            JobError::Domain(DomainError::NotFound(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn foreign_input_is_forbidden_without_creating_a_record() {
        let dataset = TrainingDatasetId::new();
        let dataset_owner = UserId::new();
        let store = InMemoryJobStore::arc();
        let launcher = rig(
            store.clone(),
            StubDirectory::default().with(
                InputRef::TrainingDataset(dataset),
                dataset_input(dataset_owner),
            ),
            std::sync::Arc::new(SlowTrainer {
                delay: Duration::ZERO,
            }),
        );

        let err = launcher
            .launch(UserId::new(), training_params(dataset))
            .unwrap_err();

        assert!(matches!(err, JobError::Domain(DomainError::Forbidden)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn launch_returns_before_slow_work_finishes() {
        let dataset = TrainingDatasetId::new();
        let owner = UserId::new();
        let store = InMemoryJobStore::arc();
        let launcher = rig(
            store.clone(),
            StubDirectory::default()
                .with(InputRef::TrainingDataset(dataset), dataset_input(owner)),
            std::sync::Arc::new(SlowTrainer {
                delay: Duration::from_secs(1),
            }),
        );

        let started = Instant::now();
        let id = launcher.launch(owner, training_params(dataset)).unwrap();
        assert!(
            started.elapsed() < Duration::from_millis(500),
            "launch blocked on executor work"
        );

        // The record exists immediately, in a non-terminal state.
        let job = store.get(id).unwrap().unwrap();
        assert!(!job.status.is_terminal());

        let job = wait_for_terminal(&store, id).await;
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn identical_launches_create_independent_jobs() {
        let dataset = TrainingDatasetId::new();
        let owner = UserId::new();
        let store = InMemoryJobStore::arc();
        let launcher = rig(
            store.clone(),
            StubDirectory::default()
                .with(InputRef::TrainingDataset(dataset), dataset_input(owner)),
            std::sync::Arc::new(SlowTrainer {
                delay: Duration::ZERO,
            }),
        );

        let first = launcher.launch(owner, training_params(dataset)).unwrap();
        let second = launcher.launch(owner, training_params(dataset)).unwrap();

        assert_ne!(first, second);
        assert_eq!(wait_for_terminal(&store, first).await.status, JobStatus::Completed);
        assert_eq!(wait_for_terminal(&store, second).await.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn analysis_launch_requires_an_attached_file() {
        let product = DataProductId::new();
        let owner = UserId::new();
        let store = InMemoryJobStore::arc();
        let launcher = rig(
            store.clone(),
            StubDirectory::default().with(
                InputRef::DataProduct(product),
                ResolvedInput {
                    owner_id: owner,
                    data_path: None,
                    data_type: None,
                },
            ),
            std::sync::Arc::new(SlowTrainer {
                delay: Duration::ZERO,
            }),
        );

        let err = launcher
            .launch(
                owner,
                JobParams::Analysis(AnalysisParams {
                    input: product,
                    date_from: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                    date_to: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
                    crop_type: None,
                    request: AnalysisRequest::Inspect,
                }),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            JobError::Domain(DomainError::Validation(_))
        ));
        assert!(store.is_empty());
    }
}
