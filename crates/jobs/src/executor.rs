//! Job executor: runs a job's work outside the request path.
//!
//! One detached task per job, bounded by a semaphore. The task owns every
//! status write after launch; a fault in the work is converted into a
//! `failed` record rather than propagating, so no job is left `running`
//! because of an unhandled error in this module's control flow.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::directory::ResolvedInput;
use crate::script::{ScriptCommand, ScriptRunner};
use crate::store::{JobStore, JobStoreError};
use crate::trainer::{ModelTrainer, TrainingSpec};
use crate::types::{AnalysisParams, AnalysisRequest, Job, JobId, JobParams, JobResult};

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of concurrently executing jobs.
    pub max_concurrent: usize,
    /// Fixed mode string passed to every analysis invocation.
    pub analysis_mode: String,
    /// Crop selector substituted when a job specifies none.
    pub default_crop_type: String,
    /// Directory where generated analysis artifacts are written.
    pub output_dir: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            analysis_mode: "batch".to_string(),
            default_crop_type: "generic".to_string(),
            output_dir: "outputs".to_string(),
        }
    }
}

/// Runs jobs handed off by the launcher.
pub struct JobExecutor<S> {
    store: S,
    trainer: Arc<dyn ModelTrainer>,
    scripts: Arc<dyn ScriptRunner>,
    permits: Arc<Semaphore>,
    config: ExecutorConfig,
}

impl<S: JobStore + 'static> JobExecutor<S> {
    pub fn new(
        store: S,
        trainer: Arc<dyn ModelTrainer>,
        scripts: Arc<dyn ScriptRunner>,
        config: ExecutorConfig,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self {
            store,
            trainer,
            scripts,
            permits,
            config,
        }
    }

    /// Hand off one job to a detached task. Returns immediately.
    ///
    /// Must be called from within a tokio runtime. Exactly one call is made
    /// per successful launch.
    pub fn spawn(self: &Arc<Self>, job_id: JobId, input: ResolvedInput) {
        let executor = Arc::clone(self);
        tokio::spawn(async move {
            let permit = executor.permits.clone().acquire_owned().await;
            if permit.is_err() {
                error!(job_id = %job_id, "executor semaphore closed; job abandoned");
                return;
            }
            executor.execute(job_id, input).await;
        });
    }

    /// Execute one job: pending → running → {completed | failed}.
    ///
    /// If the record (or its running-state write) is gone, e.g. the owner
    /// deleted the job concurrently, the executor logs and exits without
    /// fabricating a terminal record it cannot attribute.
    pub async fn execute(&self, job_id: JobId, input: ResolvedInput) {
        let mut job = match self.store.get(job_id) {
            Ok(Some(job)) => job,
            Ok(None) => {
                warn!(job_id = %job_id, "job record vanished before execution");
                return;
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "could not load job for execution");
                return;
            }
        };

        if let Err(e) = job.mark_running() {
            warn!(job_id = %job_id, error = %e, "job is not pending; skipping execution");
            return;
        }
        match self.store.update(&job) {
            Ok(()) => {}
            Err(JobStoreError::NotFound(_)) => {
                info!(job_id = %job_id, "job deleted before execution started");
                return;
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "could not record running state");
                return;
            }
        }
        debug!(job_id = %job_id, kind = %job.kind(), "job running");

        let outcome = match job.params.clone() {
            JobParams::Analysis(params) => self.run_analysis(&job, &params, &input),
            JobParams::Training(params) => self.run_training(&params, &input).await,
        };

        match outcome {
            Ok(result) => {
                if job.mark_completed(result).is_ok() {
                    self.persist_terminal(&job);
                    info!(job_id = %job_id, "job completed");
                }
            }
            Err(message) => self.record_failure(&mut job, message),
        }
    }

    /// Analysis variant: build the argument list and start the external
    /// process fire-and-forget. Completion here means successful
    /// *submission*; the process outcome is never observed.
    fn run_analysis(
        &self,
        job: &Job,
        params: &AnalysisParams,
        input: &ResolvedInput,
    ) -> Result<JobResult, String> {
        let input_path = input
            .data_path
            .clone()
            .ok_or_else(|| "referenced input has no backing file".to_string())?;

        let (command, output_path) = self.build_analysis_command(job, params, &input_path);
        self.scripts
            .spawn_detached(command)
            .map_err(|e| e.to_string())?;

        Ok(JobResult::Analysis { output_path })
    }

    /// Argument list, in the order the analysis script expects.
    fn build_analysis_command(
        &self,
        job: &Job,
        params: &AnalysisParams,
        input_path: &str,
    ) -> (ScriptCommand, Option<String>) {
        let crop_type = params
            .crop_type
            .clone()
            .unwrap_or_else(|| self.config.default_crop_type.clone());

        let mut args = vec![
            job.owner_id.to_string(),
            job.id.to_string(),
            params.date_from.format("%Y-%m-%d").to_string(),
            params.date_to.format("%Y-%m-%d").to_string(),
            input_path.to_string(),
            self.config.analysis_mode.clone(),
            crop_type,
            params.request.flag().to_string(),
        ];

        let output_path = match params.request {
            AnalysisRequest::Generate => Some(format!(
                "{}/analysis_{}.json",
                self.config.output_dir.trim_end_matches('/'),
                job.id
            )),
            AnalysisRequest::Inspect => None,
        };
        if let Some(path) = &output_path {
            args.push(path.clone());
        }

        (ScriptCommand { args }, output_path)
    }

    /// Training variant: run the trainer on the blocking pool so that faults
    /// (including panics) surface as a joinable error instead of tearing down
    /// this task.
    async fn run_training(
        &self,
        params: &crate::types::TrainingParams,
        input: &ResolvedInput,
    ) -> Result<JobResult, String> {
        let trainer = Arc::clone(&self.trainer);
        let spec = TrainingSpec {
            model_type: params.model_type.clone(),
            hyperparameters: params.hyperparameters.clone(),
            data_type: input
                .data_type
                .clone()
                .unwrap_or_else(|| "unspecified".to_string()),
        };

        let joined = tokio::task::spawn_blocking(move || trainer.train(&spec)).await;
        match joined {
            Ok(Ok(metrics)) => Ok(JobResult::Training {
                accuracy: metrics.accuracy,
                error_rate: metrics.error_rate,
            }),
            Ok(Err(e)) => Err(e.to_string()),
            Err(join_error) => Err(format!("training task aborted: {join_error}")),
        }
    }

    /// Convert a fault into a `failed` record, with one retry of the status
    /// write itself.
    fn record_failure(&self, job: &mut Job, message: String) {
        error!(job_id = %job.id, error = %message, "job failed");
        if job.mark_failed(&message).is_err() {
            warn!(job_id = %job.id, status = %job.status, "job already terminal; dropping failure");
            return;
        }
        self.persist_terminal(job);
    }

    fn persist_terminal(&self, job: &Job) {
        match self.store.update(job) {
            Ok(()) => {}
            Err(JobStoreError::NotFound(_)) => {
                info!(job_id = %job.id, "job deleted during execution; outcome dropped");
            }
            Err(e) => {
                error!(job_id = %job.id, error = %e, "could not persist outcome; retrying once");
                if let Err(e) = self.store.update(job) {
                    error!(
                        job_id = %job.id,
                        error = %e,
                        "terminal state lost; job may appear running forever"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{RecordingScriptRunner, ScriptError};
    use crate::store::InMemoryJobStore;
    use crate::trainer::{TrainError, TrainingMetrics};
    use crate::types::{JobStatus, TrainingParams};
    use chrono::NaiveDate;
    use cropsight_core::{DataProductId, TrainingDatasetId, UserId};

    /// Trainer with a predetermined outcome.
    struct FixedTrainer(Result<TrainingMetrics, TrainError>);

    impl ModelTrainer for FixedTrainer {
        fn train(&self, _spec: &TrainingSpec) -> Result<TrainingMetrics, TrainError> {
            self.0.clone()
        }
    }

    /// Trainer that panics mid-run.
    struct PanickingTrainer;

    impl ModelTrainer for PanickingTrainer {
        fn train(&self, _spec: &TrainingSpec) -> Result<TrainingMetrics, TrainError> {
            panic!("simulated trainer crash");
        }
    }

    fn executor_with(
        store: Arc<InMemoryJobStore>,
        trainer: Arc<dyn ModelTrainer>,
        scripts: Arc<dyn ScriptRunner>,
    ) -> JobExecutor<Arc<InMemoryJobStore>> {
        JobExecutor::new(store, trainer, scripts, ExecutorConfig::default())
    }

    fn training_job(owner: UserId) -> Job {
        Job::new(
            owner,
            JobParams::Training(TrainingParams {
                dataset: TrainingDatasetId::new(),
                model_type: "svm".to_string(),
                hyperparameters: serde_json::json!({"learning_rate": 0.01}),
            }),
        )
    }

    fn analysis_job(owner: UserId, request: AnalysisRequest) -> Job {
        Job::new(
            owner,
            JobParams::Analysis(AnalysisParams {
                input: DataProductId::new(),
                date_from: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
                date_to: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
                crop_type: None,
                request,
            }),
        )
    }

    fn resolved(owner: UserId) -> ResolvedInput {
        ResolvedInput {
            owner_id: owner,
            data_path: Some("/data/products/field7.tif".to_string()),
            data_type: Some("ndvi".to_string()),
        }
    }

    #[tokio::test]
    async fn training_success_reaches_completed_with_metrics() {
        let store = InMemoryJobStore::arc();
        let executor = executor_with(
            store.clone(),
            Arc::new(FixedTrainer(Ok(TrainingMetrics {
                accuracy: 0.88,
                error_rate: 0.12,
            }))),
            Arc::new(RecordingScriptRunner::new()),
        );

        let owner = UserId::new();
        let job = training_job(owner);
        let id = job.id;
        store.insert(job).unwrap();

        executor.execute(id, resolved(owner)).await;

        let job = store.get(id).unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
        assert!(matches!(
            job.result,
            Some(JobResult::Training { accuracy, .. }) if (accuracy - 0.88).abs() < 1e-12
        ));
        assert!(job.error_info.is_none());
    }

    #[tokio::test]
    async fn training_failure_reaches_failed_with_error_info() {
        let store = InMemoryJobStore::arc();
        let executor = executor_with(
            store.clone(),
            Arc::new(FixedTrainer(Err(TrainError::DidNotConverge))),
            Arc::new(RecordingScriptRunner::new()),
        );

        let owner = UserId::new();
        let job = training_job(owner);
        let id = job.id;
        store.insert(job).unwrap();

        executor.execute(id, resolved(owner)).await;

        let job = store.get(id).unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.completed_at.is_some());
        assert!(job.result.is_none());
        assert!(job.error_info.unwrap().contains("did not converge"));
    }

    #[tokio::test]
    async fn trainer_panic_is_converted_to_failed() {
        let store = InMemoryJobStore::arc();
        let executor = executor_with(
            store.clone(),
            Arc::new(PanickingTrainer),
            Arc::new(RecordingScriptRunner::new()),
        );

        let owner = UserId::new();
        let job = training_job(owner);
        let id = job.id;
        store.insert(job).unwrap();

        executor.execute(id, resolved(owner)).await;

        let job = store.get(id).unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error_info.unwrap().contains("aborted"));
    }

    #[tokio::test]
    async fn analysis_submission_builds_expected_args() {
        let store = InMemoryJobStore::arc();
        let scripts = Arc::new(RecordingScriptRunner::new());
        let executor = executor_with(
            store.clone(),
            Arc::new(FixedTrainer(Err(TrainError::DidNotConverge))),
            scripts.clone(),
        );

        let owner = UserId::new();
        let job = analysis_job(owner, AnalysisRequest::Generate);
        let id = job.id;
        store.insert(job).unwrap();

        executor.execute(id, resolved(owner)).await;

        let job = store.get(id).unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);

        let submissions = scripts.submissions();
        assert_eq!(submissions.len(), 1);
        let args = &submissions[0].args;
        assert_eq!(args[0], owner.to_string());
        assert_eq!(args[1], id.to_string());
        assert_eq!(args[2], "2023-04-01");
        assert_eq!(args[3], "2023-06-30");
        assert_eq!(args[4], "/data/products/field7.tif");
        assert_eq!(args[5], "batch");
        assert_eq!(args[6], "generic");
        assert_eq!(args[7], "generate");
        let expected_output = format!("outputs/analysis_{id}.json");
        assert_eq!(args[8], expected_output);
        assert_eq!(
            job.result,
            Some(JobResult::Analysis {
                output_path: Some(expected_output)
            })
        );
    }

    #[tokio::test]
    async fn inspect_requests_omit_the_output_path() {
        let store = InMemoryJobStore::arc();
        let scripts = Arc::new(RecordingScriptRunner::new());
        let executor = executor_with(
            store.clone(),
            Arc::new(FixedTrainer(Err(TrainError::DidNotConverge))),
            scripts.clone(),
        );

        let owner = UserId::new();
        let job = analysis_job(owner, AnalysisRequest::Inspect);
        let id = job.id;
        store.insert(job).unwrap();

        executor.execute(id, resolved(owner)).await;

        let submissions = scripts.submissions();
        assert_eq!(submissions[0].args.len(), 8);
        assert_eq!(submissions[0].args[7], "inspect");
        let job = store.get(id).unwrap().unwrap();
        assert_eq!(
            job.result,
            Some(JobResult::Analysis { output_path: None })
        );
    }

    #[tokio::test]
    async fn spawn_failure_marks_the_job_failed() {
        struct BrokenRunner;
        impl ScriptRunner for BrokenRunner {
            fn spawn_detached(&self, _command: ScriptCommand) -> Result<(), ScriptError> {
                Err(ScriptError::Spawn("interpreter missing".to_string()))
            }
        }

        let store = InMemoryJobStore::arc();
        let executor = executor_with(
            store.clone(),
            Arc::new(FixedTrainer(Err(TrainError::DidNotConverge))),
            Arc::new(BrokenRunner),
        );

        let owner = UserId::new();
        let job = analysis_job(owner, AnalysisRequest::Generate);
        let id = job.id;
        store.insert(job).unwrap();

        executor.execute(id, resolved(owner)).await;

        let job = store.get(id).unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error_info.unwrap().contains("interpreter missing"));
    }

    #[tokio::test]
    async fn vanished_record_is_left_alone() {
        let store = InMemoryJobStore::arc();
        let executor = executor_with(
            store.clone(),
            Arc::new(FixedTrainer(Ok(TrainingMetrics {
                accuracy: 0.8,
                error_rate: 0.2,
            }))),
            Arc::new(RecordingScriptRunner::new()),
        );

        // Simulates a concurrent delete between launch and execution.
        executor.execute(JobId::new(), resolved(UserId::new())).await;

        assert!(store.is_empty());
    }
}
