//! Infrastructure layer: document stores and the services built on them.
//!
//! The stores are traits so the backend stays swappable; the in-memory
//! implementation ships as the default and is what the tests exercise.

pub mod directory;
pub mod ledger;
pub mod registry;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use directory::{UserDirectory, UserPatch};
pub use ledger::{LedgerFilter, TransactionLedger};
pub use registry::{CheckinRequest, CheckoutRequest, DashboardStats, ItemFilter, ItemRegistry};
pub use store::{ItemStore, LedgerStore, StoreError, UserStore};
pub use store::memory::{MemoryItemStore, MemoryLedgerStore, MemoryUserStore};
