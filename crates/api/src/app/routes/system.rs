//! Liveness probe.

use axum::Json;
use serde_json::json;

/// `GET /api/health` (public). No auth, no stores touched.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "status": "OK",
        "timestamp": chrono::Utc::now(),
    }))
}
