//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: service wiring (stores, directory/registry/ledger, tokens)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get, routing::post};
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &Config) -> Router {
    let services = Arc::new(services::build_services(config));
    let auth_state = middleware::AuthState {
        tokens: services.tokens.clone(),
        directory: services.directory.clone(),
    };

    // Protected routes: bearer token required, actor context attached.
    let protected = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .nest("/items", routes::items::router())
        .nest("/transactions", routes::transactions::router())
        .nest("/users", routes::users::router())
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let public = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/health", get(routes::system::health));

    Router::new()
        .nest("/api", public.merge(protected))
        .layer(Extension(services))
        .layer(CorsLayer::permissive())
}
