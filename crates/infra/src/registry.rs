//! Item registry: item lifecycle and the check-in/check-out transitions.

use std::sync::Arc;

use chrono::Utc;

use toolcrib_core::{DomainError, DomainResult, ItemId};
use toolcrib_auth::{Action, Actor, policy};
use toolcrib_inventory::{
    Item, ItemCode, ItemDraft, ItemPatch, ItemStatus, TransactionRecord,
};

use crate::store::{ItemCounts, ItemQuery, ItemStore, LedgerQuery, LedgerStore, StoreError};

pub use crate::store::ItemQuery as ItemFilter;

/// Caller-supplied detail for a check-out.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    /// Defaults to the actor's own name.
    pub checkout_person: Option<String>,
    pub project_name: Option<String>,
    pub notes: Option<String>,
}

/// Caller-supplied detail for a check-in.
#[derive(Debug, Clone, Default)]
pub struct CheckinRequest {
    pub notes: Option<String>,
}

/// Dashboard aggregate.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub counts: ItemCounts,
    /// The 10 most recent ledger entries, newest first.
    pub recent_transactions: Vec<TransactionRecord>,
}

/// Item records keyed by unique code, with the transactional audit log.
pub struct ItemRegistry {
    items: Arc<dyn ItemStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl ItemRegistry {
    const RECENT_STATS_LIMIT: usize = 10;

    pub fn new(items: Arc<dyn ItemStore>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { items, ledger }
    }

    fn gate(actor: &Actor, action: Action) -> DomainResult<()> {
        policy::check(actor.role, action).map_err(|d| DomainError::forbidden(d.to_string()))
    }

    pub fn list(&self, actor: &Actor, filter: &ItemFilter) -> DomainResult<Vec<Item>> {
        Self::gate(actor, Action::ViewItems)?;
        Ok(self.items.query(filter)?)
    }

    pub fn get(&self, actor: &Actor, id: ItemId) -> DomainResult<Item> {
        Self::gate(actor, Action::ViewItems)?;
        self.items.get(id)?.ok_or(DomainError::not_found("Item"))
    }

    pub fn get_by_code(&self, actor: &Actor, code: &str) -> DomainResult<Item> {
        Self::gate(actor, Action::ViewItems)?;
        let code = ItemCode::new(code)?;
        self.items
            .get_by_code(&code)?
            .ok_or(DomainError::not_found("Item"))
    }

    pub fn create(&self, actor: &Actor, draft: ItemDraft) -> DomainResult<Item> {
        Self::gate(actor, Action::CreateItem)?;
        let item = Item::create(draft, Utc::now())?;
        self.items.insert(item.clone())?;
        tracing::info!(item = %item.id, code = %item.code, actor = %actor.id, "item created");
        Ok(item)
    }

    /// Metadata-only edit; the state machine is untouched.
    pub fn update(&self, actor: &Actor, id: ItemId, patch: ItemPatch) -> DomainResult<Item> {
        Self::gate(actor, Action::EditItem)?;
        let Some(current) = self.items.get(id)? else {
            return Err(DomainError::not_found("Item"));
        };
        let updated = current.patched(patch, Utc::now())?;
        self.items.update(updated.clone())?;
        tracing::info!(item = %updated.id, actor = %actor.id, "item updated");
        Ok(updated)
    }

    pub fn delete(&self, actor: &Actor, id: ItemId) -> DomainResult<()> {
        Self::gate(actor, Action::DeleteItem)?;
        match self.items.delete(id) {
            Ok(()) => {
                tracing::info!(item = %id, actor = %actor.id, "item deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(DomainError::not_found("Item")),
            Err(e) => Err(e.into()),
        }
    }

    pub fn stats(&self, actor: &Actor) -> DomainResult<DashboardStats> {
        Self::gate(actor, Action::ViewItems)?;
        let counts = self.items.counts()?;
        let recent_transactions = self.ledger.query(&LedgerQuery {
            limit: Some(Self::RECENT_STATS_LIMIT),
            ..Default::default()
        })?;
        Ok(DashboardStats {
            counts,
            recent_transactions,
        })
    }

    /// Check an item out by code: the Inside→Outside transition plus its
    /// ledger entry. The state change is a conditional store update, so two
    /// racing check-outs of the same code cannot both succeed.
    pub fn check_out(
        &self,
        actor: &Actor,
        code: &str,
        request: CheckoutRequest,
    ) -> DomainResult<(Item, TransactionRecord)> {
        Self::gate(actor, Action::CheckInOut)?;
        let code = ItemCode::new(code)?;
        let now = Utc::now();
        let checkout_person = request
            .checkout_person
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| actor.name.clone());
        let project_name = request.project_name;

        let item = match self.items.transition(&code, &mut |current| {
            current.checked_out(actor.id, checkout_person.clone(), project_name.clone(), now)
        }) {
            Ok(item) => item,
            Err(StoreError::NotFound) => return Err(DomainError::not_found("Item")),
            Err(e) => return Err(e.into()),
        };

        let record = TransactionRecord::check_out(&item, actor.id, &actor.name, request.notes, now);
        self.append_or_flag(record.clone(), &item)?;
        tracing::info!(item = %item.id, code = %item.code, actor = %actor.id, "item checked out");
        Ok((item, record))
    }

    /// Check an item in by code: Outside→Inside plus its ledger entry.
    pub fn check_in(
        &self,
        actor: &Actor,
        code: &str,
        request: CheckinRequest,
    ) -> DomainResult<(Item, TransactionRecord)> {
        Self::gate(actor, Action::CheckInOut)?;
        let code = ItemCode::new(code)?;
        let now = Utc::now();

        let item = match self
            .items
            .transition(&code, &mut |current| current.checked_in(now))
        {
            Ok(item) => item,
            Err(StoreError::NotFound) => return Err(DomainError::not_found("Item")),
            Err(e) => return Err(e.into()),
        };

        let record = TransactionRecord::check_in(&item, actor.id, &actor.name, request.notes, now);
        self.append_or_flag(record.clone(), &item)?;
        tracing::info!(item = %item.id, code = %item.code, actor = %actor.id, "item checked in");
        Ok((item, record))
    }

    /// Append the ledger entry for an already-applied state change.
    ///
    /// A failure here leaves the item state without its audit record, which is
    /// a reportable inconsistency: it is logged loudly and surfaced as an
    /// internal error rather than dropped.
    fn append_or_flag(&self, record: TransactionRecord, item: &Item) -> DomainResult<()> {
        if let Err(e) = self.ledger.append(record) {
            tracing::error!(
                item = %item.id,
                code = %item.code,
                error = %e,
                "ledger append failed after item state change; state and ledger are inconsistent"
            );
            return Err(DomainError::internal(
                "ledger append failed after state change",
            ));
        }
        Ok(())
    }

    /// Count check-outs without a matching ledger record.
    ///
    /// Reconciliation hook for the append-after-transition gap: every Outside
    /// item must have a CheckOut entry as its latest movement.
    pub fn reconcile_ledger(&self) -> DomainResult<u64> {
        let outside = self.items.query(&ItemQuery {
            status: Some(ItemStatus::Outside),
            ..Default::default()
        })?;
        let mut missing = 0;
        for item in outside {
            let latest = self.ledger.query(&LedgerQuery {
                item: Some(item.id),
                limit: Some(1),
                ..Default::default()
            })?;
            let accounted = latest
                .first()
                .is_some_and(|r| r.action == toolcrib_inventory::TransactionAction::CheckOut);
            if !accounted {
                tracing::error!(item = %item.id, code = %item.code, "outside item has no CheckOut ledger entry");
                missing += 1;
            }
        }
        Ok(missing)
    }
}
