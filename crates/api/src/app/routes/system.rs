use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use crate::context::CurrentUser;

/// GET /health
pub async fn health() -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}

/// GET /whoami
pub async fn whoami(Extension(user): Extension<CurrentUser>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "user_id": user.user_id().to_string(),
        })),
    )
        .into_response()
}
