//! Password hashing and verification (Argon2id, salted).
//!
//! Hashing is deliberately slow; callers on an async path should run it via
//! `spawn_blocking` so it never stalls unrelated request handling.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::Argon2;

use toolcrib_core::DomainError;

/// Hash a plaintext password into a self-describing PHC digest string.
pub fn hash_password(plaintext: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))?;
    Ok(digest.to_string())
}

/// Verify a plaintext password against a stored digest.
///
/// Returns `false` on mismatch and on any malformed digest; verification
/// failures are never surfaced as server errors.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
