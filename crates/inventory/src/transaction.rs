//! Append-only ledger records for check-in/check-out events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolcrib_core::{ItemId, TransactionId, UserId};

use crate::{Item, ItemState};

/// The two recorded item movements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionAction {
    CheckOut,
    CheckIn,
}

impl core::fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransactionAction::CheckOut => f.write_str("CheckOut"),
            TransactionAction::CheckIn => f.write_str("CheckIn"),
        }
    }
}

/// One immutable ledger entry.
///
/// Item and user names/codes are denormalized at write time so history stays
/// accurate after items or users are renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub item: ItemId,
    /// The actor who performed the action.
    pub user: UserId,
    pub action: TransactionAction,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
    pub item_code: String,
    pub item_name: String,
    pub user_name: String,
    /// Snapshot of the checkout party; only set for `CheckOut`.
    pub checkout_person: Option<String>,
    pub project_name: Option<String>,
}

impl TransactionRecord {
    /// Snapshot a just-completed check-out.
    ///
    /// `item` must already be in the Outside state produced by the transition.
    pub fn check_out(
        item: &Item,
        actor_id: UserId,
        actor_name: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let (checkout_person, project_name) = match &item.state {
            ItemState::Outside {
                checkout_person,
                project_name,
                ..
            } => (Some(checkout_person.clone()), project_name.clone()),
            ItemState::Inside => (None, None),
        };
        Self {
            id: TransactionId::new(),
            item: item.id,
            user: actor_id,
            action: TransactionAction::CheckOut,
            timestamp: now,
            notes,
            item_code: item.code.as_str().to_string(),
            item_name: item.name.clone(),
            user_name: actor_name.to_string(),
            checkout_person,
            project_name,
        }
    }

    /// Snapshot a just-completed check-in.
    pub fn check_in(
        item: &Item,
        actor_id: UserId,
        actor_name: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            item: item.id,
            user: actor_id,
            action: TransactionAction::CheckIn,
            timestamp: now,
            notes,
            item_code: item.code.as_str().to_string(),
            item_name: item.name.clone(),
            user_name: actor_name.to_string(),
            checkout_person: None,
            project_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemCode, ItemDraft};

    #[test]
    fn checkout_record_snapshots_item_and_party() {
        let now = Utc::now();
        let item = Item::create(
            ItemDraft {
                name: "Angle Grinder".into(),
                code: ItemCode::new("ag-9").unwrap(),
                category: None,
                description: None,
                location: None,
                image_url: None,
            },
            now,
        )
        .unwrap();
        let actor = UserId::new();
        let out = item
            .checked_out(actor, "Alice".into(), Some("Fence".into()), now)
            .unwrap();

        let record = TransactionRecord::check_out(&out, actor, "Alice", Some("note".into()), now);
        assert_eq!(record.action, TransactionAction::CheckOut);
        assert_eq!(record.item_code, "AG-9");
        assert_eq!(record.item_name, "Angle Grinder");
        assert_eq!(record.user_name, "Alice");
        assert_eq!(record.checkout_person.as_deref(), Some("Alice"));
        assert_eq!(record.project_name.as_deref(), Some("Fence"));
    }

    #[test]
    fn checkin_record_carries_no_checkout_party() {
        let now = Utc::now();
        let item = Item::create(
            ItemDraft {
                name: "Ladder".into(),
                code: ItemCode::new("L1").unwrap(),
                category: None,
                description: None,
                location: None,
                image_url: None,
            },
            now,
        )
        .unwrap();

        let record = TransactionRecord::check_in(&item, UserId::new(), "Bob", None, now);
        assert_eq!(record.action, TransactionAction::CheckIn);
        assert!(record.checkout_person.is_none());
        assert!(record.project_name.is_none());
    }
}
