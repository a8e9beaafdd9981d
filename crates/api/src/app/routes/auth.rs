//! Registration, login, and current-identity routes.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use toolcrib_core::DomainError;

use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

/// `POST /api/auth/register` (public).
///
/// The bootstrap path: unauthenticated, and any role may be requested. "First
/// write wins" on the unique-name index is the only gate, which is how the
/// very first admin is created on a fresh install.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    // Password hashing is deliberately slow; keep it off the dispatch path.
    let directory = services.directory.clone();
    let result = tokio::task::spawn_blocking(move || {
        directory.register(&body.name, &body.password, body.role)
    })
    .await
    .unwrap_or_else(|e| Err(DomainError::internal(format!("hashing task failed: {e}"))));

    let record = match result {
        Ok(record) => record,
        Err(e) => return errors::domain_to_response(e),
    };

    let token = match services.tokens.issue(record.id, &record.name, record.role) {
        Ok(token) => token,
        Err(e) => return errors::domain_to_response(e),
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "token": token,
            "user": dto::identity_to_json(&record),
        })),
    )
        .into_response()
}

/// `POST /api/auth/login` (public).
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let directory = services.directory.clone();
    let result = tokio::task::spawn_blocking(move || {
        directory.authenticate(&body.name, &body.password)
    })
    .await
    .unwrap_or_else(|e| Err(DomainError::internal(format!("verify task failed: {e}"))));

    let record = match result {
        Ok(record) => record,
        Err(e) => return errors::domain_to_response(e),
    };

    let token = match services.tokens.issue(record.id, &record.name, record.role) {
        Ok(token) => token,
        Err(e) => return errors::domain_to_response(e),
    };

    Json(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "user": dto::identity_to_json(&record),
    }))
    .into_response()
}

/// `GET /api/auth/me` (protected).
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    let record = match services.directory.resolve(ctx.actor().id) {
        Ok(Some(record)) => record,
        Ok(None) => return errors::unauthorized("User not found."),
        Err(e) => return errors::domain_to_response(e),
    };

    Json(json!({
        "success": true,
        "user": dto::identity_to_json(&record),
    }))
    .into_response()
}
