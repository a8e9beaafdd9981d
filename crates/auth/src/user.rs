//! User account record.
//!
//! # Invariants
//! - Stored names keep their original casing, trimmed; uniqueness and lookup
//!   are case-insensitive (one record per case-insensitive name).
//! - The password digest is write-only: it never appears in any API output,
//!   which is what [`UserView`] exists for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolcrib_core::UserId;

use crate::{Actor, Role};

/// A stored user account, digest included. Internal to the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub password_digest: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(name: String, password_digest: String, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            name,
            password_digest,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-folded key for uniqueness checks and name lookup.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// The digest-free projection returned by the API.
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            name: self.name.clone(),
            role: self.role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Case-insensitive lookup key for a user name.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Public shape of a user: everything except the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
