//! Tracked items and their two-state location machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolcrib_core::{DomainError, ItemId, UserId};

/// Unique item code, uppercase-normalized and trimmed on construction.
///
/// Codes come from barcode scans and manual entry in mixed case; normalizing
/// once at the boundary keeps every lookup and uniqueness check trivial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(String);

impl ItemCode {
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("Item code is required"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location state of an item.
///
/// Modeled as a sum type so "Inside with a holder" is unrepresentable: the
/// holder, checkout person, and project only exist while the item is out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ItemState {
    Inside,
    Outside {
        /// The actor who performed the check-out.
        holder: UserId,
        /// Free-text name of whoever physically took the item.
        checkout_person: String,
        project_name: Option<String>,
    },
}

/// Flat status discriminant, used for filters and wire output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    Inside,
    Outside,
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ItemStatus::Inside => f.write_str("Inside"),
            ItemStatus::Outside => f.write_str("Outside"),
        }
    }
}

impl ItemState {
    pub fn status(&self) -> ItemStatus {
        match self {
            ItemState::Inside => ItemStatus::Inside,
            ItemState::Outside { .. } => ItemStatus::Outside,
        }
    }
}

/// A physical item tracked by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub code: ItemCode,
    pub category: String,
    pub state: ItemState,
    pub description: Option<String>,
    pub location: String,
    pub image_url: Option<String>,
    /// Refreshed on every mutation, including state transitions.
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating an item.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub name: String,
    pub code: ItemCode,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Metadata-only edit. Status and holder are the transitions' exclusive
/// domain and deliberately absent here.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

impl Item {
    pub const DEFAULT_CATEGORY: &'static str = "General";
    pub const DEFAULT_LOCATION: &'static str = "Workshop";

    pub fn create(draft: ItemDraft, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Item name is required"));
        }
        Ok(Self {
            id: ItemId::new(),
            name,
            code: draft.code,
            category: draft
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| Self::DEFAULT_CATEGORY.to_string()),
            state: ItemState::Inside,
            description: draft.description.map(|d| d.trim().to_string()),
            location: draft
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| Self::DEFAULT_LOCATION.to_string()),
            image_url: draft.image_url,
            last_updated: now,
            created_at: now,
        })
    }

    pub fn status(&self) -> ItemStatus {
        self.state.status()
    }

    /// Apply a metadata edit; never touches the state machine.
    pub fn patched(&self, patch: ItemPatch, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let mut item = self.clone();
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation("Item name is required"));
            }
            item.name = name;
        }
        if let Some(category) = patch.category {
            item.category = category.trim().to_string();
        }
        if let Some(description) = patch.description {
            item.description = Some(description.trim().to_string());
        }
        if let Some(location) = patch.location {
            item.location = location.trim().to_string();
        }
        if let Some(image_url) = patch.image_url {
            item.image_url = Some(image_url);
        }
        item.last_updated = now;
        Ok(item)
    }

    /// Inside → Outside. Conflict if the item is already out.
    pub fn checked_out(
        &self,
        holder: UserId,
        checkout_person: String,
        project_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        match self.state {
            ItemState::Outside { .. } => Err(DomainError::conflict("Item is already checked out")),
            ItemState::Inside => {
                let mut item = self.clone();
                item.state = ItemState::Outside {
                    holder,
                    checkout_person,
                    project_name,
                };
                item.last_updated = now;
                Ok(item)
            }
        }
    }

    /// Outside → Inside. Conflict if the item is already in.
    pub fn checked_in(&self, now: DateTime<Utc>) -> Result<Self, DomainError> {
        match self.state {
            ItemState::Inside => Err(DomainError::conflict("Item is already checked in")),
            ItemState::Outside { .. } => {
                let mut item = self.clone();
                item.state = ItemState::Inside;
                item.last_updated = now;
                Ok(item)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draft(code: &str) -> ItemDraft {
        ItemDraft {
            name: "Cordless Drill".to_string(),
            code: ItemCode::new(code).unwrap(),
            category: None,
            description: None,
            location: None,
            image_url: None,
        }
    }

    #[test]
    fn code_is_uppercased_and_trimmed() {
        assert_eq!(ItemCode::new("  ab-12c ").unwrap().as_str(), "AB-12C");
    }

    #[test]
    fn empty_code_is_rejected() {
        assert!(ItemCode::new("   ").is_err());
    }

    #[test]
    fn new_items_start_inside_with_defaults() {
        let item = Item::create(draft("T100"), Utc::now()).unwrap();
        assert_eq!(item.status(), ItemStatus::Inside);
        assert_eq!(item.category, "General");
        assert_eq!(item.location, "Workshop");
    }

    #[test]
    fn checkout_rejects_already_outside() {
        let now = Utc::now();
        let item = Item::create(draft("T100"), now).unwrap();
        let out = item
            .checked_out(UserId::new(), "Alice".into(), Some("Bench".into()), now)
            .unwrap();
        assert_eq!(out.status(), ItemStatus::Outside);

        let again = out.checked_out(UserId::new(), "Bob".into(), None, now);
        assert!(matches!(again, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn checkin_rejects_already_inside() {
        let item = Item::create(draft("T100"), Utc::now()).unwrap();
        assert!(matches!(item.checked_in(Utc::now()), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn checkout_then_checkin_restores_non_transient_fields() {
        let now = Utc::now();
        let item = Item::create(draft("T100"), now).unwrap();
        let out = item
            .checked_out(UserId::new(), "Alice".into(), Some("Bench".into()), now)
            .unwrap();
        let back = out.checked_in(now).unwrap();

        assert_eq!(back.state, ItemState::Inside);
        assert_eq!(back.name, item.name);
        assert_eq!(back.code, item.code);
        assert_eq!(back.category, item.category);
        assert_eq!(back.location, item.location);
        assert_eq!(back.description, item.description);
    }

    #[test]
    fn patch_never_touches_state() {
        let now = Utc::now();
        let item = Item::create(draft("T100"), now).unwrap();
        let holder = UserId::new();
        let out = item.checked_out(holder, "Alice".into(), None, now).unwrap();

        let patched = out
            .patched(
                ItemPatch {
                    name: Some("Impact Driver".into()),
                    ..Default::default()
                },
                now,
            )
            .unwrap();
        assert_eq!(patched.name, "Impact Driver");
        assert!(matches!(patched.state, ItemState::Outside { holder: h, .. } if h == holder));
    }

    proptest! {
        #[test]
        fn code_normalization_is_idempotent(raw in "\\PC{1,24}") {
            if let Ok(code) = ItemCode::new(&raw) {
                let renormalized = ItemCode::new(code.as_str()).unwrap();
                prop_assert_eq!(code, renormalized);
            }
        }
    }
}
