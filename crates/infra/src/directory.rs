//! User directory: account lifecycle behind the role policy.

use std::sync::Arc;

use chrono::Utc;

use toolcrib_core::{DomainError, DomainResult, UserId};
use toolcrib_auth::{Action, Actor, Role, UserRecord, hash_password, policy, verify_password};

use crate::store::{StoreError, UserStore};

/// Generic login failure: unknown user and wrong password are
/// indistinguishable to prevent account enumeration.
const BAD_CREDENTIALS: &str = "Login credentials incorrect. Please try again.";

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => DomainError::conflict(msg),
            StoreError::NotFound => DomainError::internal("document vanished mid-operation"),
            StoreError::Rejected(domain) => domain,
            StoreError::Backend(msg) => DomainError::internal(msg),
        }
    }
}

/// Fields a privileged update may touch. `password` is re-hashed when present.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

/// Case-insensitive-unique user records; all mutations consult the policy.
pub struct UserDirectory {
    store: Arc<dyn UserStore>,
}

impl UserDirectory {
    pub const MIN_PASSWORD_LEN: usize = 6;

    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    fn validate_credentials_input(name: &str, password: &str) -> DomainResult<String> {
        let name = name.trim();
        if name.is_empty() || password.is_empty() {
            return Err(DomainError::validation("Name and password are required"));
        }
        if password.len() < Self::MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters",
                Self::MIN_PASSWORD_LEN
            )));
        }
        Ok(name.to_string())
    }

    /// Public registration: the bootstrap path. No actor, no role gate; the
    /// first write on a name wins, and any role may be requested. This is how
    /// the very first admin comes to exist.
    pub fn register(&self, name: &str, password: &str, role: Option<Role>) -> DomainResult<UserRecord> {
        let name = Self::validate_credentials_input(name, password)?;
        let role = role.unwrap_or_default();
        if matches!(role, Role::Admin | Role::UserAdmin) {
            tracing::warn!(%name, %role, "privileged role minted via open registration");
        }

        let record = UserRecord::new(name, hash_password(password)?, role, Utc::now());
        self.store.insert(record.clone())?;
        tracing::info!(user = %record.id, role = %record.role, "user registered");
        Ok(record)
    }

    /// Privileged creation by an admin or user-admin.
    pub fn create(
        &self,
        actor: &Actor,
        name: &str,
        password: &str,
        role: Option<Role>,
    ) -> DomainResult<UserRecord> {
        let role = role.unwrap_or_default();
        policy::check_user_create(actor.role, role).map_err(|d| DomainError::forbidden(d.to_string()))?;

        let name = Self::validate_credentials_input(name, password)?;
        let record = UserRecord::new(name, hash_password(password)?, role, Utc::now());
        self.store.insert(record.clone())?;
        tracing::info!(user = %record.id, role = %record.role, actor = %actor.id, "user created");
        Ok(record)
    }

    /// Verify a name/password pair.
    ///
    /// Every failure before the active check returns the same generic message.
    /// The password is checked before the active flag so a deactivated-account
    /// response never leaks whether a password was correct for some name.
    pub fn authenticate(&self, name: &str, password: &str) -> DomainResult<UserRecord> {
        let name = name.trim();
        if name.is_empty() || password.is_empty() {
            return Err(DomainError::validation(
                "Please enter both username and password",
            ));
        }

        let Some(record) = self.store.find_by_name(name)? else {
            return Err(DomainError::unauthenticated(BAD_CREDENTIALS));
        };
        if !verify_password(password, &record.password_digest) {
            return Err(DomainError::unauthenticated(BAD_CREDENTIALS));
        }
        if !record.is_active {
            return Err(DomainError::unauthenticated(
                "Your account has been deactivated. Please contact administrator.",
            ));
        }
        Ok(record)
    }

    /// Resolve an id without a policy gate; used by the auth middleware to
    /// turn verified claims back into a live account.
    pub fn resolve(&self, id: UserId) -> DomainResult<Option<UserRecord>> {
        Ok(self.store.get(id)?)
    }

    pub fn list(&self, actor: &Actor) -> DomainResult<Vec<UserRecord>> {
        policy::check(actor.role, Action::ManageUsers)
            .map_err(|d| DomainError::forbidden(d.to_string()))?;
        Ok(self.store.list()?)
    }

    pub fn get(&self, actor: &Actor, id: UserId) -> DomainResult<UserRecord> {
        policy::check(actor.role, Action::ManageUsers)
            .map_err(|d| DomainError::forbidden(d.to_string()))?;
        self.store.get(id)?.ok_or(DomainError::not_found("User"))
    }

    /// Privileged update. Cross-admin edit rules and self-role preservation
    /// are resolved by the policy before anything is written.
    pub fn update(&self, actor: &Actor, id: UserId, patch: UserPatch) -> DomainResult<UserRecord> {
        policy::check(actor.role, Action::ManageUsers)
            .map_err(|d| DomainError::forbidden(d.to_string()))?;
        let Some(mut record) = self.store.get(id)? else {
            return Err(DomainError::not_found("User"));
        };

        let effective_role = policy::check_user_update(actor, record.id, record.role, patch.role)
            .map_err(|d| DomainError::forbidden(d.to_string()))?;

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation("Name is required"));
            }
            record.name = name;
        }
        if let Some(role) = effective_role {
            record.role = role;
        }
        if let Some(is_active) = patch.is_active {
            record.is_active = is_active;
        }
        if let Some(password) = patch.password {
            if password.len() < Self::MIN_PASSWORD_LEN {
                return Err(DomainError::validation(format!(
                    "Password must be at least {} characters",
                    Self::MIN_PASSWORD_LEN
                )));
            }
            record.password_digest = hash_password(&password)?;
        }
        record.updated_at = Utc::now();

        self.store.update(record.clone())?;
        tracing::info!(user = %record.id, actor = %actor.id, "user updated");
        Ok(record)
    }

    pub fn delete(&self, actor: &Actor, id: UserId) -> DomainResult<()> {
        let Some(record) = self.store.get(id)? else {
            return Err(DomainError::not_found("User"));
        };
        policy::check_user_delete(actor, record.id, record.role)
            .map_err(|d| DomainError::forbidden(d.to_string()))?;

        self.store.delete(id)?;
        tracing::info!(user = %id, actor = %actor.id, "user deleted");
        Ok(())
    }
}
