use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Duration;

use cropsight_auth::{ProfilePatch, UserAccount, assert_owner};
use cropsight_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

/// Routes reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
}

/// Authenticated user routes.
pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
}

/// POST /users
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let account = match UserAccount::register(
        body.username,
        body.email,
        &body.password,
        body.phone_number,
    ) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.users.insert(account.clone()) {
        return errors::domain_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::user_to_json(&account))).into_response()
}

/// POST /users/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let account = services.users.find_by_email(&body.email);

    // One rejection path for both unknown accounts and bad passwords.
    let authenticated = account
        .as_ref()
        .is_some_and(|a| a.authenticate(&body.password));
    let Some(account) = account.filter(|_| authenticated) else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "email or password is incorrect",
        );
    };

    let ttl = Duration::minutes(services.settings.token_ttl_minutes);
    let token = match services.jwt.mint(account.id, ttl) {
        Ok(t) => t,
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                e.to_string(),
            );
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "access_token": token,
            "token_type": "bearer",
            "user": dto::user_to_json(&account),
        })),
    )
        .into_response()
}

/// GET /users
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items: Vec<_> = services
        .users
        .list()
        .iter()
        .map(dto::user_to_json)
        .collect();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// GET /users/:id
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };
    match services.users.get(user_id) {
        Ok(account) => (StatusCode::OK, Json(dto::user_to_json(&account))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// PUT /users/:id: users may only modify their own profile.
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> axum::response::Response {
    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };
    if let Err(e) = assert_owner(user_id, user.user_id()) {
        return errors::domain_error_to_response(e);
    }

    let mut account = match services.users.get(user_id) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = account.apply(patch) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.users.update(&account) {
        return errors::domain_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::user_to_json(&account))).into_response()
}

/// DELETE /users/:id: users may only delete their own account.
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };
    if let Err(e) = assert_owner(user_id, user.user_id()) {
        return errors::domain_error_to_response(e);
    }
    match services.users.remove(user_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
