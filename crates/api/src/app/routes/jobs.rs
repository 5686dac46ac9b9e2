use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use cropsight_jobs::{
    AnalysisParams, AnalysisRequest, JobId, JobParams, JobPatch, TrainingParams,
};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_jobs))
        .route("/training", post(launch_training))
        .route("/analysis", post(launch_analysis))
        .route(
            "/:id",
            get(get_status).put(update_job).delete(delete_job),
        )
}

/// POST /jobs/training: launch a model-training job.
///
/// Returns 202 with the job id as soon as the pending record is durable; the
/// training itself runs detached and is observed by polling.
pub async fn launch_training(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<crate::app::dto::LaunchTrainingRequest>,
) -> axum::response::Response {
    let params = JobParams::Training(TrainingParams {
        dataset: body.training_dataset_id,
        model_type: body.model_type,
        hyperparameters: body.hyperparameters,
    });

    match services.launcher.launch(user.user_id(), params) {
        Ok(job_id) => accepted(job_id),
        Err(e) => errors::job_error_to_response(e),
    }
}

/// POST /jobs/analysis: launch an external analysis script.
pub async fn launch_analysis(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<crate::app::dto::LaunchAnalysisRequest>,
) -> axum::response::Response {
    let params = JobParams::Analysis(AnalysisParams {
        input: body.data_product_id,
        date_from: body.date_from,
        date_to: body.date_to,
        crop_type: body.crop_type,
        request: body.request.unwrap_or(AnalysisRequest::Inspect),
    });

    match services.launcher.launch(user.user_id(), params) {
        Ok(job_id) => accepted(job_id),
        Err(e) => errors::job_error_to_response(e),
    }
}

/// GET /jobs: jobs submitted by the caller, oldest first.
pub async fn list_jobs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    match services.reporter.list_for_owner(user.user_id()) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::job_error_to_response(e),
    }
}

/// GET /jobs/:id: poll a job's status. Not owner-guarded: anyone holding a
/// job id may poll it.
pub async fn get_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id: JobId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid job id"),
    };
    match services.reporter.get_status(job_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::job_error_to_response(e),
    }
}

/// PUT /jobs/:id: owner-guarded patch of status/result fields.
pub async fn update_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> axum::response::Response {
    let job_id: JobId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid job id"),
    };
    match services.manager.update(job_id, user.user_id(), patch) {
        Ok(job) => (
            StatusCode::OK,
            Json(cropsight_jobs::JobStatusView::from(job)),
        )
            .into_response(),
        Err(e) => errors::job_error_to_response(e),
    }
}

/// DELETE /jobs/:id: owner-guarded delete.
pub async fn delete_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id: JobId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid job id"),
    };
    match services.manager.delete(job_id, user.user_id()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::job_error_to_response(e),
    }
}

fn accepted(job_id: JobId) -> axum::response::Response {
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "job_id": job_id.to_string(),
            "status": "pending",
        })),
    )
        .into_response()
}
