//! `toolcrib-auth` — credentials, tokens, and the role policy (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod password;
pub mod policy;
pub mod roles;
pub mod token;
pub mod user;

pub use password::{hash_password, verify_password};
pub use policy::{Action, Actor, Denial, check, check_user_create, check_user_delete, check_user_update};
pub use roles::Role;
pub use token::{Claims, TokenError, TokenService};
pub use user::{UserRecord, UserView};
