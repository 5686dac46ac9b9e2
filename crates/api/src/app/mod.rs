//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: infrastructure wiring (repositories, job subsystem)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use cropsight_auth::Hs256Jwt;
use cropsight_infra::Settings;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(settings: Settings) -> Router {
    let jwt = Arc::new(Hs256Jwt::new(settings.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt: jwt.clone() };

    let services = Arc::new(services::AppServices::build(settings, jwt));

    // Registration and login are reachable without a token.
    let public = routes::users::public_router().layer(Extension(services.clone()));

    // Everything else requires an authenticated caller.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new())
}
