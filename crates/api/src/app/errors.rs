use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use cropsight_core::DomainError;
use cropsight_jobs::JobError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(resource) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{resource} not found"),
        ),
        DomainError::Forbidden => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "caller does not own this resource",
        ),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn job_error_to_response(err: JobError) -> axum::response::Response {
    match err {
        JobError::Domain(e) => domain_error_to_response(e),
        JobError::Store(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            e.to_string(),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
