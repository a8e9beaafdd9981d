//! In-memory store backend.
//!
//! Each store keeps its documents and unique indexes behind one `RwLock`, so
//! index checks and writes happen under a single lock acquisition: the
//! in-memory equivalent of a conditional update against an indexed collection.

use std::collections::HashMap;
use std::sync::RwLock;

use toolcrib_core::{DomainError, ItemId, UserId};
use toolcrib_auth::user::{UserRecord, name_key};
use toolcrib_inventory::{Item, ItemCode, ItemStatus, TransactionRecord};

use super::{ItemCounts, ItemQuery, ItemStore, LedgerQuery, LedgerStore, StoreError, UserStore};

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

#[derive(Default)]
struct UserState {
    users: HashMap<UserId, UserRecord>,
    /// case-folded name -> id
    name_index: HashMap<String, UserId>,
}

/// In-memory [`UserStore`] with a case-insensitive name index.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<UserState>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    fn insert(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        let key = record.name_key();
        if state.name_index.contains_key(&key) {
            return Err(StoreError::Duplicate(
                "A user with this name already exists".to_string(),
            ));
        }
        state.name_index.insert(key, record.id);
        state.users.insert(record.id, record);
        Ok(())
    }

    fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let state = self.inner.read().map_err(poisoned)?;
        Ok(state.users.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>, StoreError> {
        let state = self.inner.read().map_err(poisoned)?;
        Ok(state
            .name_index
            .get(&name_key(name))
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let state = self.inner.read().map_err(poisoned)?;
        let mut users: Vec<_> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    fn update(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        let Some(existing) = state.users.get(&record.id).cloned() else {
            return Err(StoreError::NotFound);
        };
        let new_key = record.name_key();
        if let Some(&holder) = state.name_index.get(&new_key) {
            if holder != record.id {
                return Err(StoreError::Duplicate(
                    "A user with this name already exists".to_string(),
                ));
            }
        }
        state.name_index.remove(&existing.name_key());
        state.name_index.insert(new_key, record.id);
        state.users.insert(record.id, record);
        Ok(())
    }

    fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        let Some(existing) = state.users.remove(&id) else {
            return Err(StoreError::NotFound);
        };
        state.name_index.remove(&existing.name_key());
        Ok(())
    }
}

#[derive(Default)]
struct ItemState {
    items: HashMap<ItemId, Item>,
    /// normalized code -> id
    code_index: HashMap<String, ItemId>,
}

/// In-memory [`ItemStore`] with a unique code index.
#[derive(Default)]
pub struct MemoryItemStore {
    inner: RwLock<ItemState>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(item: &Item, query: &ItemQuery) -> bool {
    if let Some(status) = query.status {
        if item.status() != status {
            return false;
        }
    }
    if let Some(category) = &query.category {
        if !item.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let haystacks = [
            item.name.to_lowercase(),
            item.code.as_str().to_lowercase(),
            item.description.clone().unwrap_or_default().to_lowercase(),
        ];
        if !haystacks.iter().any(|h| h.contains(&needle)) {
            return false;
        }
    }
    true
}

impl ItemStore for MemoryItemStore {
    fn insert(&self, item: Item) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        let key = item.code.as_str().to_string();
        if state.code_index.contains_key(&key) {
            return Err(StoreError::Duplicate(
                "Item with this code already exists".to_string(),
            ));
        }
        state.code_index.insert(key, item.id);
        state.items.insert(item.id, item);
        Ok(())
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let state = self.inner.read().map_err(poisoned)?;
        Ok(state.items.get(&id).cloned())
    }

    fn get_by_code(&self, code: &ItemCode) -> Result<Option<Item>, StoreError> {
        let state = self.inner.read().map_err(poisoned)?;
        Ok(state
            .code_index
            .get(code.as_str())
            .and_then(|id| state.items.get(id))
            .cloned())
    }

    fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, StoreError> {
        let state = self.inner.read().map_err(poisoned)?;
        let mut items: Vec<_> = state
            .items
            .values()
            .filter(|item| matches_query(item, query))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(items)
    }

    fn counts(&self) -> Result<ItemCounts, StoreError> {
        let state = self.inner.read().map_err(poisoned)?;
        let mut counts = ItemCounts::default();
        let mut by_category: HashMap<String, u64> = HashMap::new();
        for item in state.items.values() {
            counts.total += 1;
            match item.status() {
                ItemStatus::Inside => counts.inside += 1,
                ItemStatus::Outside => counts.outside += 1,
            }
            *by_category.entry(item.category.clone()).or_default() += 1;
        }
        counts.by_category = by_category.into_iter().collect();
        counts.by_category.sort();
        Ok(counts)
    }

    fn update(&self, item: Item) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        if !state.items.contains_key(&item.id) {
            return Err(StoreError::NotFound);
        }
        // Metadata edits never change the code, so the index stays put.
        state.items.insert(item.id, item);
        Ok(())
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        let Some(existing) = state.items.remove(&id) else {
            return Err(StoreError::NotFound);
        };
        state.code_index.remove(existing.code.as_str());
        Ok(())
    }

    fn transition(
        &self,
        code: &ItemCode,
        apply: &mut dyn FnMut(&Item) -> Result<Item, DomainError>,
    ) -> Result<Item, StoreError> {
        // Write lock held across read, predicate, and write: the compare and
        // the swap are one operation.
        let mut state = self.inner.write().map_err(poisoned)?;
        let Some(&id) = state.code_index.get(code.as_str()) else {
            return Err(StoreError::NotFound);
        };
        let current = state.items.get(&id).ok_or(StoreError::NotFound)?;
        let next = apply(current).map_err(StoreError::Rejected)?;
        state.items.insert(id, next.clone());
        Ok(next)
    }
}

/// In-memory [`LedgerStore`]; an append-only vector.
#[derive(Default)]
pub struct MemoryLedgerStore {
    inner: RwLock<Vec<TransactionRecord>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn append(&self, record: TransactionRecord) -> Result<(), StoreError> {
        let mut records = self.inner.write().map_err(poisoned)?;
        records.push(record);
        Ok(())
    }

    fn query(&self, query: &LedgerQuery) -> Result<Vec<TransactionRecord>, StoreError> {
        let records = self.inner.read().map_err(poisoned)?;
        let mut matched: Vec<_> = records
            .iter()
            .filter(|r| {
                query.action.is_none_or(|a| r.action == a)
                    && query.item.is_none_or(|i| r.item == i)
                    && query.user.is_none_or(|u| r.user == u)
                    && query.since.is_none_or(|s| r.timestamp >= s)
                    && query.until.is_none_or(|u| r.timestamp <= u)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}
