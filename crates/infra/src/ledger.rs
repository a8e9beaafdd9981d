//! Transaction ledger reads.
//!
//! Append paths live in [`crate::registry`]; everything here is read-only.

use std::sync::Arc;

use chrono::{Duration, Utc};

use toolcrib_core::{DomainError, DomainResult, ItemId};
use toolcrib_auth::{Action, Actor, policy};
use toolcrib_inventory::TransactionRecord;

use crate::store::{LedgerQuery, LedgerStore};

pub use crate::store::LedgerQuery as LedgerFilter;

/// Read-side of the append-only audit log.
pub struct TransactionLedger {
    store: Arc<dyn LedgerStore>,
}

impl TransactionLedger {
    /// "Recent" view: last 24 hours, capped at 50 records.
    const RECENT_WINDOW_HOURS: i64 = 24;
    const RECENT_LIMIT: usize = 50;

    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    fn gate(actor: &Actor) -> DomainResult<()> {
        policy::check(actor.role, Action::ViewTransactions)
            .map_err(|d| DomainError::forbidden(d.to_string()))
    }

    /// Filtered listing, newest first.
    pub fn list(&self, actor: &Actor, filter: &LedgerFilter) -> DomainResult<Vec<TransactionRecord>> {
        Self::gate(actor)?;
        Ok(self.store.query(filter)?)
    }

    /// Fixed last-24-hours window, newest first, capped at 50.
    pub fn recent(&self, actor: &Actor) -> DomainResult<Vec<TransactionRecord>> {
        Self::gate(actor)?;
        let since = Utc::now() - Duration::hours(Self::RECENT_WINDOW_HOURS);
        Ok(self.store.query(&LedgerQuery {
            since: Some(since),
            limit: Some(Self::RECENT_LIMIT),
            ..Default::default()
        })?)
    }

    /// Full movement history of one item, newest first.
    pub fn item_history(&self, actor: &Actor, item: ItemId) -> DomainResult<Vec<TransactionRecord>> {
        Self::gate(actor)?;
        Ok(self.store.query(&LedgerQuery {
            item: Some(item),
            ..Default::default()
        })?)
    }
}
