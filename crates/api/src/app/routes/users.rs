//! User management routes (admin and user-admin territory).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tokio::task::spawn_blocking;

use toolcrib_core::UserId;
use toolcrib_infra::UserPatch;

use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(delete_user))
}

fn parse_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid user id"))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    match services.directory.list(ctx.actor()) {
        Ok(users) => Json(json!({
            "success": true,
            "count": users.len(),
            "users": users.iter().map(dto::user_to_json).collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn get_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.directory.get(ctx.actor(), id) {
        Ok(user) => Json(json!({"success": true, "user": dto::user_to_json(&user)})).into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    let actor = ctx.actor().clone();
    // Password hashing is CPU-bound; keep it off the async workers.
    let created = spawn_blocking(move || {
        services
            .directory
            .create(&actor, &body.name, &body.password, body.role)
    })
    .await;

    match created {
        Ok(Ok(user)) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "User created successfully",
                "user": dto::user_to_json(&user),
            })),
        )
            .into_response(),
        Ok(Err(e)) => errors::domain_to_response(e),
        Err(e) => {
            tracing::error!(error = %e, "user create task panicked");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
        }
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let actor = ctx.actor().clone();
    let patch = UserPatch {
        name: body.name,
        role: body.role,
        is_active: body.is_active,
        password: body.password,
    };
    // May rehash a password, so run it off the async workers too.
    let updated = spawn_blocking(move || services.directory.update(&actor, id, patch)).await;

    match updated {
        Ok(Ok(user)) => Json(json!({
            "success": true,
            "message": "User updated successfully",
            "user": dto::user_to_json(&user),
        }))
        .into_response(),
        Ok(Err(e)) => errors::domain_to_response(e),
        Err(e) => {
            tracing::error!(error = %e, "user update task panicked");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
        }
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.directory.delete(ctx.actor(), id) {
        Ok(()) => Json(json!({
            "success": true,
            "message": "User deleted successfully",
        }))
        .into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}
