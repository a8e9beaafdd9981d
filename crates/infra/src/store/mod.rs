//! Document-store abstractions.
//!
//! Uniqueness (case-insensitive user name, normalized item code) and the
//! conditional status transition are store responsibilities: enforcing them
//! inside a single store operation closes the race between an existence check
//! and the subsequent write.

use chrono::{DateTime, Utc};

use toolcrib_core::{DomainError, ItemId, UserId};
use toolcrib_auth::UserRecord;
use toolcrib_inventory::{Item, ItemCode, ItemStatus, TransactionRecord};

pub mod memory;

/// Storage-level failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique-index violation (case-insensitive name or normalized code).
    #[error("{0}")]
    Duplicate(String),

    #[error("document not found")]
    NotFound,

    /// A conditional transition was rejected by the predicate it ran under.
    #[error(transparent)]
    Rejected(DomainError),

    /// Backend failure (connectivity, corruption). Detail stays in logs.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// User records with a case-insensitive unique index on `name`.
pub trait UserStore: Send + Sync {
    /// Insert; fails with [`StoreError::Duplicate`] if the case-folded name
    /// already exists.
    fn insert(&self, record: UserRecord) -> Result<(), StoreError>;

    fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>, StoreError>;

    fn list(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Replace an existing record; re-checks the name index against every
    /// other record.
    fn update(&self, record: UserRecord) -> Result<(), StoreError>;

    fn delete(&self, id: UserId) -> Result<(), StoreError>;
}

/// Filters for item listing.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub status: Option<ItemStatus>,
    pub category: Option<String>,
    /// Case-insensitive substring over name, code, and description.
    pub search: Option<String>,
}

/// Aggregate counts for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCounts {
    pub total: u64,
    pub inside: u64,
    pub outside: u64,
    /// (category, count), sorted by category.
    pub by_category: Vec<(String, u64)>,
}

/// Item records with a unique index on the normalized code.
pub trait ItemStore: Send + Sync {
    fn insert(&self, item: Item) -> Result<(), StoreError>;

    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    fn get_by_code(&self, code: &ItemCode) -> Result<Option<Item>, StoreError>;

    /// Matching items, most recently updated first.
    fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, StoreError>;

    fn counts(&self) -> Result<ItemCounts, StoreError>;

    /// Replace an existing record (metadata edits).
    fn update(&self, item: Item) -> Result<(), StoreError>;

    fn delete(&self, id: ItemId) -> Result<(), StoreError>;

    /// Atomically apply a state transition to the item with this code.
    ///
    /// The closure runs while the store holds exclusive access to the
    /// document: its precondition (Inside/Outside) is re-validated against
    /// the value the write will replace, so two racing check-outs cannot both
    /// succeed. A closure error aborts the write and surfaces as
    /// [`StoreError::Rejected`].
    fn transition(
        &self,
        code: &ItemCode,
        apply: &mut dyn FnMut(&Item) -> Result<Item, DomainError>,
    ) -> Result<Item, StoreError>;
}

/// Filters for ledger reads.
#[derive(Debug, Clone, Default)]
pub struct LedgerQuery {
    pub action: Option<toolcrib_inventory::TransactionAction>,
    pub item: Option<ItemId>,
    pub user: Option<UserId>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Append-only transaction log.
pub trait LedgerStore: Send + Sync {
    fn append(&self, record: TransactionRecord) -> Result<(), StoreError>;

    /// Matching records, newest first.
    fn query(&self, query: &LedgerQuery) -> Result<Vec<TransactionRecord>, StoreError>;
}
