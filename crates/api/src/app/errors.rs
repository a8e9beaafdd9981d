use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use toolcrib_core::DomainError;

/// Build the uniform failure envelope: `{success: false, message}`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn unauthorized(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, message)
}

/// Map the domain taxonomy to HTTP.
///
/// Internal errors are logged in full and genericized for the client.
pub fn domain_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, msg),
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, err.to_string()),
        DomainError::Unauthenticated(msg) => json_error(StatusCode::UNAUTHORIZED, msg),
        DomainError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, msg),
        DomainError::Internal(detail) => {
            tracing::error!("internal error: {detail}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
        }
    }
}
