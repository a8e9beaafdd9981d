//! Centralized role-based access policy.
//!
//! Every mutating operation in the user directory and the item registry
//! consults these functions; no endpoint carries its own role conditionals.
//! The functions are pure: (actor, target, action) in, allow/deny out.
//!
//! - No IO
//! - No panics
//! - No business logic beyond the permission table

use thiserror::Error;

use toolcrib_core::UserId;

use crate::Role;

/// The authenticated identity performing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

/// Target-independent actions covered by the permission table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    CreateItem,
    EditItem,
    DeleteItem,
    /// Check-out and check-in state transitions.
    CheckInOut,
    ViewItems,
    ViewTransactions,
    /// List/read user accounts.
    ManageUsers,
}

/// Reason a request was denied. Messages match the user-facing wording.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Denial {
    #[error("Access denied. Admin privileges required.")]
    AdminRequired,

    #[error("Access denied. User management privileges required.")]
    UserManagementRequired,

    #[error("Access denied. You do not have permission to modify data.")]
    ModifyDenied,

    #[error("Cannot create user-admin users. Use the register endpoint for initial setup.")]
    MintUserAdmin,

    #[error("User admins cannot promote users to user-admin role")]
    PromoteUserAdmin,

    #[error("Cannot edit another admin account")]
    EditOtherAdmin,

    #[error("User admins cannot edit other user-admin accounts")]
    EditOtherUserAdmin,

    #[error("User admins cannot manage admin accounts")]
    UserAdminOnAdmin,

    #[error("Cannot delete user-admin accounts")]
    DeleteUserAdmin,

    #[error("Cannot delete another admin account")]
    DeleteOtherAdmin,

    #[error("Cannot delete your own account")]
    DeleteSelf,
}

/// The permission table for target-independent actions.
pub fn allows(role: Role, action: Action) -> bool {
    use Action::*;
    use Role::*;

    match action {
        CreateItem | DeleteItem => matches!(role, Admin),
        EditItem | CheckInOut => matches!(role, Admin | Staff),
        ViewItems | ViewTransactions => true,
        ManageUsers => matches!(role, Admin | UserAdmin),
    }
}

/// Check a target-independent action against the table.
pub fn check(role: Role, action: Action) -> Result<(), Denial> {
    if allows(role, action) {
        return Ok(());
    }
    Err(match action {
        Action::CreateItem | Action::DeleteItem => {
            if role == Role::UserAdmin {
                Denial::ModifyDenied
            } else {
                Denial::AdminRequired
            }
        }
        Action::EditItem | Action::CheckInOut => Denial::ModifyDenied,
        Action::ManageUsers => Denial::UserManagementRequired,
        // View actions are allowed for every role.
        Action::ViewItems | Action::ViewTransactions => Denial::UserManagementRequired,
    })
}

/// Authorize creating a user through the privileged path.
///
/// The user-admin role is only mintable by the unauthenticated registration
/// path; the privileged path refuses it for every actor.
pub fn check_user_create(actor_role: Role, requested: Role) -> Result<(), Denial> {
    check(actor_role, Action::ManageUsers)?;
    if requested == Role::UserAdmin {
        return Err(Denial::MintUserAdmin);
    }
    if actor_role == Role::UserAdmin && requested == Role::Admin {
        return Err(Denial::UserAdminOnAdmin);
    }
    Ok(())
}

/// Authorize updating a user record and resolve the role that may actually be
/// persisted.
///
/// Returns the effective role change: `None` means "leave the stored role
/// untouched". When a privileged actor edits their own record the stored role
/// is force-preserved regardless of the requested value.
pub fn check_user_update(
    actor: &Actor,
    target_id: UserId,
    target_role: Role,
    requested_role: Option<Role>,
) -> Result<Option<Role>, Denial> {
    check(actor.role, Action::ManageUsers)?;

    let editing_self = actor.id == target_id;

    if actor.role == Role::UserAdmin && target_role == Role::Admin {
        return Err(Denial::UserAdminOnAdmin);
    }
    if actor.role == Role::UserAdmin && target_role == Role::UserAdmin && !editing_self {
        return Err(Denial::EditOtherUserAdmin);
    }
    if target_role == Role::Admin && !editing_self {
        return Err(Denial::EditOtherAdmin);
    }
    // Nobody promotes an existing account to user-admin through the API.
    if requested_role == Some(Role::UserAdmin) && target_role != Role::UserAdmin {
        return Err(Denial::PromoteUserAdmin);
    }

    // Self-edit of a privileged account keeps its role (no accidental
    // self-demotion).
    if editing_self && matches!(target_role, Role::Admin | Role::UserAdmin) {
        return Ok(Some(target_role));
    }

    Ok(requested_role)
}

/// Authorize deleting a user.
///
/// User-admin accounts are permanently undeletable, nobody deletes their own
/// account, and admin accounts cannot be deleted by anyone else.
pub fn check_user_delete(actor: &Actor, target_id: UserId, target_role: Role) -> Result<(), Denial> {
    check(actor.role, Action::ManageUsers)?;

    if target_role == Role::UserAdmin {
        return Err(Denial::DeleteUserAdmin);
    }
    if actor.id == target_id {
        return Err(Denial::DeleteSelf);
    }
    if target_role == Role::Admin {
        return Err(Denial::DeleteOtherAdmin);
    }
    Ok(())
}
