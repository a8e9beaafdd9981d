use core::str::FromStr;

use serde::{Deserialize, Serialize};

use toolcrib_core::DomainError;

/// Role of an authenticated actor.
///
/// A tagged variant rather than a free-form string: every permission decision
/// in [`crate::policy`] matches on this enum, so an unknown role cannot slip
/// past the compiler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    /// Manages user accounts but holds no item rights.
    #[serde(rename = "user-admin")]
    UserAdmin,
    #[default]
    #[serde(rename = "staff")]
    Staff,
    /// Read-only access to items and transactions.
    #[serde(rename = "viewer")]
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::UserAdmin => "user-admin",
            Role::Staff => "staff",
            Role::Viewer => "viewer",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user-admin" => Ok(Role::UserAdmin),
            "staff" => Ok(Role::Staff),
            "viewer" => Ok(Role::Viewer),
            other => Err(DomainError::validation(format!(
                "role must be one of: admin, user-admin, staff, viewer (got '{other}')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::UserAdmin, Role::Staff, Role::Viewer] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn default_role_is_staff() {
        assert_eq!(Role::default(), Role::Staff);
    }
}
