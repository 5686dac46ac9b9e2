//! Postgres-backed job store (`postgres` feature).
//!
//! Mirrors the `JobStore` operations with async methods over a connection
//! pool, for deployments that need job records to survive restarts.

use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

use cropsight_core::UserId;
use cropsight_jobs::{Job, JobId, JobParams, JobResult, JobStatus, JobStoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jobs (
    id UUID PRIMARY KEY,
    owner_id UUID NOT NULL,
    params JSONB NOT NULL,
    status TEXT NOT NULL,
    started_at TIMESTAMPTZ NOT NULL,
    completed_at TIMESTAMPTZ,
    result JSONB,
    error_info TEXT
);
CREATE INDEX IF NOT EXISTS jobs_owner_idx ON jobs (owner_id, started_at);
";

pub struct PostgresJobStore {
    pool: PgPool,
}

impl PostgresJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the jobs table if it does not exist.
    pub async fn migrate(&self) -> Result<(), JobStoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    pub async fn insert(&self, job: &Job) -> Result<(), JobStoreError> {
        let params = serde_json::to_value(&job.params).map_err(storage)?;
        let result = job
            .result
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(storage)?;

        let outcome = sqlx::query(
            "INSERT INTO jobs (id, owner_id, params, status, started_at, completed_at, result, error_info)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(job.id.0)
        .bind(*job.owner_id.as_uuid())
        .bind(params)
        .bind(job.status.to_string())
        .bind(job.started_at)
        .bind(job.completed_at)
        .bind(result)
        .bind(job.error_info.as_deref())
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if outcome.rows_affected() == 0 {
            return Err(JobStoreError::AlreadyExists(job.id));
        }
        Ok(())
    }

    pub async fn get(&self, job_id: JobId) -> Result<Option<Job>, JobStoreError> {
        let row = sqlx::query("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        row.map(row_to_job).transpose()
    }

    pub async fn update(&self, job: &Job) -> Result<(), JobStoreError> {
        let result = job
            .result
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(storage)?;

        let outcome = sqlx::query(
            "UPDATE jobs
             SET status = $2, completed_at = $3, result = $4, error_info = $5
             WHERE id = $1",
        )
        .bind(job.id.0)
        .bind(job.status.to_string())
        .bind(job.completed_at)
        .bind(result)
        .bind(job.error_info.as_deref())
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if outcome.rows_affected() == 0 {
            return Err(JobStoreError::NotFound(job.id));
        }
        Ok(())
    }

    pub async fn remove(&self, job_id: JobId) -> Result<bool, JobStoreError> {
        let outcome = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id.0)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(outcome.rows_affected() > 0)
    }

    pub async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Job>, JobStoreError> {
        let rows = sqlx::query("SELECT * FROM jobs WHERE owner_id = $1 ORDER BY started_at")
            .bind(*owner.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.into_iter().map(row_to_job).collect()
    }
}

fn row_to_job(row: PgRow) -> Result<Job, JobStoreError> {
    let params: serde_json::Value = row.try_get("params").map_err(storage)?;
    let params: JobParams = serde_json::from_value(params).map_err(storage)?;

    let result: Option<serde_json::Value> = row.try_get("result").map_err(storage)?;
    let result: Option<JobResult> = result
        .map(serde_json::from_value)
        .transpose()
        .map_err(storage)?;

    let status: String = row.try_get("status").map_err(storage)?;

    Ok(Job {
        id: JobId::from_uuid(row.try_get::<Uuid, _>("id").map_err(storage)?),
        owner_id: UserId::from_uuid(row.try_get::<Uuid, _>("owner_id").map_err(storage)?),
        params,
        status: status_from_str(&status)?,
        started_at: row.try_get("started_at").map_err(storage)?,
        completed_at: row.try_get("completed_at").map_err(storage)?,
        result,
        error_info: row.try_get("error_info").map_err(storage)?,
    })
}

fn status_from_str(s: &str) -> Result<JobStatus, JobStoreError> {
    match s {
        "pending" => Ok(JobStatus::Pending),
        "running" => Ok(JobStatus::Running),
        "completed" => Ok(JobStatus::Completed),
        "failed" => Ok(JobStatus::Failed),
        other => Err(JobStoreError::Storage(format!("unknown status: {other}"))),
    }
}

fn storage(e: impl std::fmt::Display) -> JobStoreError {
    JobStoreError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropsight_core::TrainingDatasetId;
    use cropsight_jobs::TrainingParams;

    #[tokio::test]
    #[ignore = "requires a running Postgres (set DATABASE_URL)"]
    async fn round_trip_against_real_database() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let pool = PgPool::connect(&url).await.unwrap();
        let store = PostgresJobStore::new(pool);
        store.migrate().await.unwrap();

        let owner = UserId::new();
        let mut job = Job::new(
            owner,
            JobParams::Training(TrainingParams {
                dataset: TrainingDatasetId::new(),
                model_type: "svm".to_string(),
                hyperparameters: serde_json::json!({"learning_rate": 0.01}),
            }),
        );
        store.insert(&job).await.unwrap();

        job.mark_running().unwrap();
        job.mark_completed(JobResult::Training {
            accuracy: 0.9,
            error_rate: 0.1,
        })
        .unwrap();
        store.update(&job).await.unwrap();

        let fetched = store.get(job.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, JobStatus::Completed);
        assert_eq!(fetched.result, job.result);

        assert_eq!(store.list_by_owner(owner).await.unwrap().len(), 1);
        assert!(store.remove(job.id).await.unwrap());
        assert!(store.get(job.id).await.unwrap().is_none());
    }
}
