use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use toolcrib_auth::TokenService;
use toolcrib_infra::UserDirectory;

use crate::app::errors;
use crate::context::ActorContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub directory: Arc<UserDirectory>,
}

/// Bearer-token gate for all protected routes.
///
/// The token only proves identity; the live account is re-resolved on every
/// request so deactivation and deletion take effect immediately.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers())
        .ok_or_else(|| errors::unauthorized("Access denied. No token provided."))?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|e| errors::unauthorized(e.to_string()))?;

    let record = state
        .directory
        .resolve(claims.sub)
        .map_err(errors::domain_to_response)?
        .ok_or_else(|| errors::unauthorized("User not found."))?;

    if !record.is_active {
        return Err(errors::unauthorized("Account has been deactivated."));
    }

    req.extensions_mut().insert(ActorContext::new(record.actor()));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
