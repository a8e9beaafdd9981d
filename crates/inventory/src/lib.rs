//! `toolcrib-inventory` — item and ledger domain types.
//!
//! Pure domain: state transitions are expressed here, persistence applies them
//! atomically.

pub mod item;
pub mod transaction;

pub use item::{Item, ItemCode, ItemDraft, ItemPatch, ItemState, ItemStatus};
pub use transaction::{TransactionAction, TransactionRecord};
