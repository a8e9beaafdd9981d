//! Startup configuration.
//!
//! Everything the server needs is resolved here once and passed into
//! constructors; no component reads the environment on its own.

use anyhow::Context;

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret for signing bearer tokens.
    pub jwt_secret: String,
    /// Document-store connection string. Required at startup even though the
    /// bundled backend is in-memory; a persistent backend consumes it.
    pub database_url: String,
    pub bind_addr: String,
    /// Bearer token lifetime in hours.
    pub token_ttl_hours: i64,
}

impl Config {
    /// Load from the environment. Missing secret or connection string is a
    /// fatal startup error.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret =
            std::env::var("JWT_SECRET").context("JWT_SECRET is not set; refusing to start")?;
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL is not set; refusing to start")?;
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let token_ttl_hours = match std::env::var("TOKEN_TTL_HOURS") {
            Ok(raw) => raw
                .parse()
                .context("TOKEN_TTL_HOURS must be an integer number of hours")?,
            Err(_) => toolcrib_auth::TokenService::DEFAULT_TTL_HOURS,
        };
        Ok(Self {
            jwt_secret,
            database_url,
            bind_addr,
            token_ttl_hours,
        })
    }
}
