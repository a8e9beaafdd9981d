//! Item registry routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use toolcrib_core::ItemId;
use toolcrib_inventory::{ItemCode, ItemDraft, ItemPatch};
use toolcrib_infra::ItemFilter;

use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/stats", get(stats))
        .route("/", get(list).post(create))
        .route("/code/:code", get(get_by_code))
        .route("/:id", get(get_by_id).put(update).delete(delete_item))
}

fn parse_id(raw: &str) -> Result<ItemId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid item id"))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Query(query): Query<dto::ItemListQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref() {
        Some(raw) => match dto::parse_status(raw) {
            Ok(status) => Some(status),
            Err(resp) => return resp,
        },
        None => None,
    };
    let filter = ItemFilter {
        status,
        // "All" is the UI's "no category filter" sentinel.
        category: query.category.filter(|c| c != "All"),
        search: query.search,
    };

    let items = match services.registry.list(ctx.actor(), &filter) {
        Ok(items) => items,
        Err(e) => return errors::domain_to_response(e),
    };

    Json(json!({
        "success": true,
        "count": items.len(),
        "items": items.iter().map(dto::item_to_json).collect::<Vec<_>>(),
    }))
    .into_response()
}

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    let stats = match services.registry.stats(ctx.actor()) {
        Ok(stats) => stats,
        Err(e) => return errors::domain_to_response(e),
    };

    Json(json!({
        "success": true,
        "stats": {
            "totalItems": stats.counts.total,
            "insideItems": stats.counts.inside,
            "outsideItems": stats.counts.outside,
            "recentTransactions": stats
                .recent_transactions
                .iter()
                .map(dto::transaction_to_json)
                .collect::<Vec<_>>(),
            "categoryStats": stats
                .counts
                .by_category
                .iter()
                .map(|(category, count)| json!({"category": category, "count": count}))
                .collect::<Vec<_>>(),
        },
    }))
    .into_response()
}

pub async fn get_by_code(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match services.registry.get_by_code(ctx.actor(), &code) {
        Ok(item) => Json(json!({"success": true, "item": dto::item_to_json(&item)})).into_response(),
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
    match services.registry.get(ctx.actor(), id) {
        Ok(item) => Json(json!({"success": true, "item": dto::item_to_json(&item)})).into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let code = match ItemCode::new(&body.code) {
        Ok(code) => code,
        Err(e) => return errors::domain_to_response(e),
    };
    let draft = ItemDraft {
        name: body.name,
        code,
        category: body.category,
        description: body.description,
        location: body.location,
        image_url: body.image_url,
    };

    match services.registry.create(ctx.actor(), draft) {
        Ok(item) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Item created successfully",
                "item": dto::item_to_json(&item),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let patch = ItemPatch {
        name: body.name,
        category: body.category,
        description: body.description,
        location: body.location,
        image_url: body.image_url,
    };

    match services.registry.update(ctx.actor(), id, patch) {
        Ok(item) => Json(json!({
            "success": true,
            "message": "Item updated successfully",
            "item": dto::item_to_json(&item),
        }))
        .into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.registry.delete(ctx.actor(), id) {
        Ok(()) => Json(json!({
            "success": true,
            "message": "Item deleted successfully",
        }))
        .into_response(),
        Err(e) => errors::domain_to_response(e),
    }
}
