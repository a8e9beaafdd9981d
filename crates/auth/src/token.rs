//! Bearer token issuance and verification (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use toolcrib_core::{DomainError, UserId};

use crate::Role;

/// Signed claim set embedded in every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: UserId,
    pub name: String,
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Token verification failure.
///
/// Expired and malformed tokens are both rejected; the distinction exists only
/// for user-facing messaging and reveals nothing about account existence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired. Please login again.")]
    Expired,

    #[error("Invalid token.")]
    Invalid,
}

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        DomainError::unauthenticated(err.to_string())
    }
}

/// Issues and verifies bearer tokens with a server-held secret.
///
/// The secret and the lifetime are explicit constructor inputs; nothing here
/// reads the environment.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Default token lifetime: 24 hours.
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::hours(Self::DEFAULT_TTL_HOURS))
    }

    /// Sign a claim set for the given identity.
    pub fn issue(&self, user_id: UserId, name: &str, role: Role) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            name: name.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| DomainError::internal(format!("token signing failed: {e}")))
    }

    /// Check signature and expiry; returns the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::with_default_ttl(b"test-secret")
    }

    #[test]
    fn issued_token_round_trips() {
        let svc = service();
        let id = UserId::new();
        let token = svc.issue(id, "Alice", Role::Admin).unwrap();

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = service().issue(UserId::new(), "Bob", Role::Staff).unwrap();
        let other = TokenService::with_default_ttl(b"other-secret");
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(service().verify("not.a.jwt"), Err(TokenError::Invalid));
    }

    #[test]
    fn expired_token_is_distinguished() {
        // Issue a token that expired an hour ago.
        let svc = TokenService::new(b"test-secret", Duration::hours(-1));
        let token = svc.issue(UserId::new(), "Carol", Role::Viewer).unwrap();
        assert_eq!(service().verify(&token), Err(TokenError::Expired));
    }
}
