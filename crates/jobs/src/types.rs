//! Core job types and the lifecycle state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cropsight_core::{DataProductId, DomainError, DomainResult, TrainingDatasetId, UserId};

use crate::directory::InputRef;

/// Unique job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = s
            .parse::<Uuid>()
            .map_err(|e| DomainError::invalid_id(format!("JobId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Job kind, selecting which executor variant applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    /// External analysis script, launched fire-and-forget.
    #[serde(rename = "analysis-script")]
    Analysis,
    /// Model training executed inside the worker task.
    #[serde(rename = "model-training")]
    Training,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Analysis => f.write_str("analysis-script"),
            JobKind::Training => f.write_str("model-training"),
        }
    }
}

/// What the analysis script is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisRequest {
    /// Inspect only; the script produces no output artifact.
    Inspect,
    /// Generate an output artifact at a path computed at execution time.
    Generate,
}

impl AnalysisRequest {
    /// Flag value passed on the script command line.
    pub fn flag(&self) -> &'static str {
        match self {
            AnalysisRequest::Inspect => "inspect",
            AnalysisRequest::Generate => "generate",
        }
    }
}

/// Parameters of an analysis-script job. Immutable after launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// The data product whose file the script reads.
    pub input: DataProductId,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Crop selector; a configured default is substituted when absent.
    pub crop_type: Option<String>,
    pub request: AnalysisRequest,
}

/// Parameters of a model-training job. Immutable after launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// The training dataset the job consumes.
    pub dataset: TrainingDatasetId,
    pub model_type: String,
    /// Opaque hyperparameter payload (e.g. `{"learning_rate": 0.05}`).
    pub hyperparameters: serde_json::Value,
}

/// Job parameters, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum JobParams {
    #[serde(rename = "analysis-script")]
    Analysis(AnalysisParams),
    #[serde(rename = "model-training")]
    Training(TrainingParams),
}

impl JobParams {
    pub fn kind(&self) -> JobKind {
        match self {
            JobParams::Analysis(_) => JobKind::Analysis,
            JobParams::Training(_) => JobKind::Training,
        }
    }

    /// The input reference validated at launch time.
    pub fn input_ref(&self) -> InputRef {
        match self {
            JobParams::Analysis(p) => InputRef::DataProduct(p.input),
            JobParams::Training(p) => InputRef::TrainingDataset(p.dataset),
        }
    }
}

/// Job execution status.
///
/// Transitions are strictly forward: pending → running → completed | failed.
/// There is no edge out of a terminal state and none back into `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    fn can_advance_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of a completed job, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum JobResult {
    Training { accuracy: f64, error_rate: f64 },
    Analysis { output_path: Option<String> },
}

/// A background job record.
///
/// `owner_id` and `params` are fixed at creation. Exactly one of
/// `result`/`error_info` is populated once `status` is terminal; neither is
/// populated before that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub owner_id: UserId,
    pub params: JobParams,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<JobResult>,
    pub error_info: Option<String>,
}

impl Job {
    /// Create a new pending job.
    pub fn new(owner_id: UserId, params: JobParams) -> Self {
        Self {
            id: JobId::new(),
            owner_id,
            params,
            status: JobStatus::Pending,
            started_at: Utc::now(),
            completed_at: None,
            result: None,
            error_info: None,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.params.kind()
    }

    fn advance(&mut self, next: JobStatus) -> DomainResult<()> {
        if !self.status.can_advance_to(next) {
            return Err(DomainError::conflict(format!(
                "illegal job transition {} -> {}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Mark the job as running.
    pub fn mark_running(&mut self) -> DomainResult<()> {
        self.advance(JobStatus::Running)
    }

    /// Mark the job as completed with its result.
    pub fn mark_completed(&mut self, result: JobResult) -> DomainResult<()> {
        self.advance(JobStatus::Completed)?;
        self.completed_at = Some(Utc::now());
        self.result = Some(result);
        Ok(())
    }

    /// Mark the job as failed with diagnostic information.
    pub fn mark_failed(&mut self, error: impl Into<String>) -> DomainResult<()> {
        self.advance(JobStatus::Failed)?;
        self.completed_at = Some(Utc::now());
        self.error_info = Some(error.into());
        Ok(())
    }

    /// Apply an owner-initiated patch (status/result fields only).
    ///
    /// Status changes move through the same forward-only transitions as the
    /// executor's. A rejected patch leaves the job untouched because callers
    /// persist only on success.
    pub fn apply_patch(&mut self, patch: crate::manager::JobPatch) -> DomainResult<()> {
        match patch.status {
            Some(JobStatus::Pending) => {
                return Err(DomainError::conflict("a job cannot return to pending"));
            }
            Some(JobStatus::Running) => self.mark_running()?,
            Some(JobStatus::Completed) => {
                let result = patch
                    .result
                    .ok_or_else(|| DomainError::validation("completed status requires a result"))?;
                self.mark_completed(result)?;
                return Ok(());
            }
            Some(JobStatus::Failed) => {
                let info = patch.error_info.ok_or_else(|| {
                    DomainError::validation("failed status requires error information")
                })?;
                self.mark_failed(info)?;
                return Ok(());
            }
            None => {}
        }

        if let Some(result) = patch.result {
            if self.status != JobStatus::Completed {
                return Err(DomainError::validation(
                    "a result can only be set on a completed job",
                ));
            }
            self.result = Some(result);
        }
        if let Some(info) = patch.error_info {
            if self.status != JobStatus::Failed {
                return Err(DomainError::validation(
                    "error information can only be set on a failed job",
                ));
            }
            self.error_info = Some(info);
        }
        Ok(())
    }
}
