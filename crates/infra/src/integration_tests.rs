//! Integration tests across directory, registry, and ledger.
//!
//! Verifies:
//! - check-out/check-in mutate the item and append to the ledger together
//! - the conditional transition admits exactly one winner under contention
//! - the per-role gates hold end to end

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use toolcrib_core::DomainError;
    use toolcrib_auth::{Actor, Role};
    use toolcrib_inventory::{ItemCode, ItemDraft, ItemStatus, TransactionAction};

    use crate::directory::UserDirectory;
    use crate::ledger::TransactionLedger;
    use crate::registry::{CheckinRequest, CheckoutRequest, ItemFilter, ItemRegistry};
    use crate::store::memory::{MemoryItemStore, MemoryLedgerStore, MemoryUserStore};

    struct Fixture {
        directory: UserDirectory,
        registry: Arc<ItemRegistry>,
        ledger: TransactionLedger,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MemoryUserStore::new());
        let items = Arc::new(MemoryItemStore::new());
        let log = Arc::new(MemoryLedgerStore::new());
        Fixture {
            directory: UserDirectory::new(users),
            registry: Arc::new(ItemRegistry::new(items, log.clone())),
            ledger: TransactionLedger::new(log),
        }
    }

    fn admin(fx: &Fixture) -> Actor {
        fx.directory
            .register("Root", "rootpass", Some(Role::Admin))
            .unwrap()
            .actor()
    }

    fn draft(code: &str, category: &str) -> ItemDraft {
        ItemDraft {
            name: format!("Tool {code}"),
            code: ItemCode::new(code).unwrap(),
            category: Some(category.to_string()),
            description: None,
            location: None,
            image_url: None,
        }
    }

    #[test]
    fn checkout_mutates_item_and_appends_ledger() {
        let fx = fixture();
        let actor = admin(&fx);
        fx.registry.create(&actor, draft("DRL-1", "Power")).unwrap();

        let (item, record) = fx
            .registry
            .check_out(
                &actor,
                "drl-1",
                CheckoutRequest {
                    checkout_person: None,
                    project_name: Some("Bench".into()),
                    notes: Some("fetched for repair".into()),
                },
            )
            .unwrap();

        assert_eq!(item.status(), ItemStatus::Outside);
        assert_eq!(record.action, TransactionAction::CheckOut);
        // checkout person defaults to the actor's name
        assert_eq!(record.checkout_person.as_deref(), Some("Root"));
        assert_eq!(record.project_name.as_deref(), Some("Bench"));

        let history = fx.ledger.item_history(&actor, item.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item_code, "DRL-1");
    }

    #[test]
    fn checkin_clears_holder_and_appends() {
        let fx = fixture();
        let actor = admin(&fx);
        fx.registry.create(&actor, draft("DRL-1", "Power")).unwrap();
        fx.registry
            .check_out(&actor, "DRL-1", CheckoutRequest::default())
            .unwrap();

        let (item, record) = fx
            .registry
            .check_in(&actor, "DRL-1", CheckinRequest::default())
            .unwrap();
        assert_eq!(item.status(), ItemStatus::Inside);
        assert_eq!(record.action, TransactionAction::CheckIn);
        assert!(record.checkout_person.is_none());

        let history = fx.ledger.item_history(&actor, item.id).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn double_checkout_is_a_conflict() {
        let fx = fixture();
        let actor = admin(&fx);
        fx.registry.create(&actor, draft("DRL-1", "Power")).unwrap();
        fx.registry
            .check_out(&actor, "DRL-1", CheckoutRequest::default())
            .unwrap();

        let err = fx
            .registry
            .check_out(&actor, "DRL-1", CheckoutRequest::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        // The losing attempt must not add a ledger entry.
        let all = fx.ledger.list(&actor, &Default::default()).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn concurrent_checkouts_admit_exactly_one_winner() {
        let fx = fixture();
        let actor = admin(&fx);
        fx.registry.create(&actor, draft("DRL-1", "Power")).unwrap();

        const CONTENDERS: usize = 16;
        let registry = fx.registry.clone();
        let successes = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..CONTENDERS)
                .map(|_| {
                    let registry = registry.clone();
                    let actor = actor.clone();
                    scope.spawn(move || {
                        registry
                            .check_out(&actor, "DRL-1", CheckoutRequest::default())
                            .is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(successes, 1);
        let all = fx.ledger.list(&actor, &Default::default()).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn checkout_of_unknown_code_is_not_found() {
        let fx = fixture();
        let actor = admin(&fx);
        let err = fx
            .registry
            .check_out(&actor, "ABC123", CheckoutRequest::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn viewer_and_user_admin_cannot_touch_items() {
        let fx = fixture();
        let actor = admin(&fx);
        fx.registry.create(&actor, draft("DRL-1", "Power")).unwrap();

        let viewer = fx
            .directory
            .register("Vera", "password1", Some(Role::Viewer))
            .unwrap()
            .actor();
        let user_admin = fx
            .directory
            .register("Uma", "password1", Some(Role::UserAdmin))
            .unwrap()
            .actor();

        for blocked in [&viewer, &user_admin] {
            let err = fx
                .registry
                .check_out(blocked, "DRL-1", CheckoutRequest::default())
                .unwrap_err();
            assert!(matches!(err, DomainError::Forbidden(_)));
        }
        // but both may view
        assert!(fx.registry.list(&viewer, &ItemFilter::default()).is_ok());
        assert!(fx.ledger.list(&user_admin, &Default::default()).is_ok());
    }

    #[test]
    fn stats_counts_and_recent_transactions() {
        let fx = fixture();
        let actor = admin(&fx);
        for (code, category) in [
            ("A1", "Power"),
            ("A2", "Power"),
            ("A3", "Hand"),
            ("B1", "Hand"),
            ("B2", "Hand"),
        ] {
            fx.registry.create(&actor, draft(code, category)).unwrap();
        }
        fx.registry
            .check_out(&actor, "A1", CheckoutRequest::default())
            .unwrap();
        fx.registry
            .check_out(&actor, "B1", CheckoutRequest::default())
            .unwrap();

        let stats = fx.registry.stats(&actor).unwrap();
        assert_eq!(stats.counts.total, 5);
        assert_eq!(stats.counts.inside, 3);
        assert_eq!(stats.counts.outside, 2);
        assert_eq!(
            stats.counts.by_category,
            vec![("Hand".to_string(), 3), ("Power".to_string(), 2)]
        );
        assert_eq!(stats.recent_transactions.len(), 2);
    }

    #[test]
    fn search_filters_items() {
        let fx = fixture();
        let actor = admin(&fx);
        fx.registry
            .create(
                &actor,
                ItemDraft {
                    name: "Cordless Drill".into(),
                    code: ItemCode::new("DRL-1").unwrap(),
                    category: Some("Power".into()),
                    description: Some("18V brushless".into()),
                    location: None,
                    image_url: None,
                },
            )
            .unwrap();
        fx.registry.create(&actor, draft("SAW-1", "Power")).unwrap();

        let hits = fx
            .registry
            .list(
                &actor,
                &ItemFilter {
                    search: Some("brushless".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code.as_str(), "DRL-1");

        let by_status = fx
            .registry
            .list(
                &actor,
                &ItemFilter {
                    status: Some(ItemStatus::Inside),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(by_status.len(), 2);
    }

    #[test]
    fn reconcile_reports_zero_on_consistent_stores() {
        let fx = fixture();
        let actor = admin(&fx);
        fx.registry.create(&actor, draft("DRL-1", "Power")).unwrap();
        fx.registry
            .check_out(&actor, "DRL-1", CheckoutRequest::default())
            .unwrap();
        assert_eq!(fx.registry.reconcile_ledger().unwrap(), 0);
    }

    #[test]
    fn duplicate_item_code_any_casing_conflicts() {
        let fx = fixture();
        let actor = admin(&fx);
        fx.registry.create(&actor, draft("DRL-1", "Power")).unwrap();
        let err = fx
            .registry
            .create(
                &actor,
                ItemDraft {
                    name: "Other".into(),
                    code: ItemCode::new("drl-1").unwrap(),
                    category: None,
                    description: None,
                    location: None,
                    image_url: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
