use axum::{Router, routing::get};

pub mod catalog;
pub mod datasets;
pub mod jobs;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .merge(users::router())
        .nest("/catalog", catalog::router())
        .merge(datasets::router())
        .nest("/jobs", jobs::router())
}
