//! Ledger reads plus the check-out/check-in movements.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use toolcrib_core::{ItemId, UserId};
use toolcrib_infra::{LedgerFilter, registry};
use toolcrib_inventory::TransactionAction;

use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list))
        .route("/recent", get(recent))
        .route("/item/:itemId", get(item_history))
        .route("/checkout", post(check_out))
        .route("/checkin", post(check_in))
}

fn records_response(records: Vec<toolcrib_inventory::TransactionRecord>) -> axum::response::Response {
    Json(json!({
        "success": true,
        "count": records.len(),
        "transactions": records.iter().map(dto::transaction_to_json).collect::<Vec<_>>(),
    }))
    .into_response()
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Query(query): Query<dto::TransactionListQuery>,
) -> axum::response::Response {
    let action = match query.action.as_deref() {
        Some("CheckOut") => Some(TransactionAction::CheckOut),
        Some("CheckIn") => Some(TransactionAction::CheckIn),
        Some(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "action must be CheckOut or CheckIn",
            );
        }
        None => None,
    };
    let item = match query.item_id.as_deref() {
        Some(raw) => match raw.parse::<ItemId>() {
            Ok(id) => Some(id),
            Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid item id"),
        },
        None => None,
    };
    let user = match query.user_id.as_deref() {
        Some(raw) => match raw.parse::<UserId>() {
            Ok(id) => Some(id),
            Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid user id"),
        },
        None => None,
    };

    let filter = LedgerFilter {
        action,
        item,
        user,
        since: query.start_date,
        until: query.end_date,
        limit: None,
    };
    match services.ledger.list(ctx.actor(), &filter) {
        Ok(records) => records_response(records),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn recent(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    match services.ledger.recent(ctx.actor()) {
        Ok(records) => records_response(records),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn item_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(item_id): Path<String>,
) -> axum::response::Response {
    let item = match item_id.parse::<ItemId>() {
        Ok(id) => id,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid item id"),
    };
    match services.ledger.item_history(ctx.actor(), item) {
        Ok(records) => records_response(records),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn check_out(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::CheckoutRequest>,
) -> axum::response::Response {
    let request = registry::CheckoutRequest {
        checkout_person: body.checkout_person,
        project_name: body.project_name,
        notes: body.notes,
    };
    match services.registry.check_out(ctx.actor(), &body.code, request) {
        Ok((item, record)) => Json(json!({
            "success": true,
            "message": "Item checked out successfully",
            "item": dto::item_to_json(&item),
            "transaction": dto::transaction_to_json(&record),
        }))
        .into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn check_in(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::CheckinRequest>,
) -> axum::response::Response {
    let request = registry::CheckinRequest { notes: body.notes };
    match services.registry.check_in(ctx.actor(), &body.code, request) {
        Ok((item, record)) => Json(json!({
            "success": true,
            "message": "Item checked in successfully",
            "item": dto::item_to_json(&item),
            "transaction": dto::transaction_to_json(&record),
        }))
        .into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}
