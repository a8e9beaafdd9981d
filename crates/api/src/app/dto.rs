use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use toolcrib_auth::{Role, UserRecord};
use toolcrib_inventory::{Item, ItemState, ItemStatus, TransactionRecord};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub code: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub code: String,
    pub notes: Option<String>,
    pub checkout_person: Option<String>,
    pub project_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub code: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListQuery {
    pub action: Option<String>,
    pub item_id: Option<String>,
    pub user_id: Option<String>,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Parse an optional `Inside`/`Outside` query value.
pub fn parse_status(raw: &str) -> Result<ItemStatus, axum::response::Response> {
    match raw {
        "Inside" => Ok(ItemStatus::Inside),
        "Outside" => Ok(ItemStatus::Outside),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "status must be Inside or Outside",
        )),
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn user_to_json(record: &UserRecord) -> serde_json::Value {
    // UserView is the digest-free projection; serialize it directly.
    serde_json::to_value(record.view()).unwrap_or_else(|_| json!({}))
}

/// Compact identity payload returned by register/login.
pub fn identity_to_json(record: &UserRecord) -> serde_json::Value {
    json!({
        "id": record.id,
        "name": record.name,
        "role": record.role,
    })
}

pub fn item_to_json(item: &Item) -> serde_json::Value {
    // The wire shape flattens the state machine into the historical
    // status/currentUser/checkoutPerson/projectName quartet.
    let (current_user, checkout_person, project_name) = match &item.state {
        ItemState::Inside => (None, None, None),
        ItemState::Outside {
            holder,
            checkout_person,
            project_name,
        } => (
            Some(*holder),
            Some(checkout_person.clone()),
            project_name.clone(),
        ),
    };
    json!({
        "id": item.id,
        "name": item.name,
        "code": item.code.as_str(),
        "category": item.category,
        "status": item.status().to_string(),
        "description": item.description,
        "location": item.location,
        "imageUrl": item.image_url,
        "currentUser": current_user,
        "checkoutPerson": checkout_person,
        "projectName": project_name,
        "lastUpdated": item.last_updated,
        "createdAt": item.created_at,
    })
}

pub fn transaction_to_json(record: &TransactionRecord) -> serde_json::Value {
    json!({
        "id": record.id,
        "item": record.item,
        "user": record.user,
        "action": record.action.to_string(),
        "timestamp": record.timestamp,
        "notes": record.notes,
        "itemCode": record.item_code,
        "itemName": record.item_name,
        "userName": record.user_name,
        "checkoutPerson": record.checkout_person,
        "projectName": record.project_name,
    })
}
