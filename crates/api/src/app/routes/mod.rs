pub mod auth;
pub mod items;
pub mod system;
pub mod transactions;
pub mod users;
