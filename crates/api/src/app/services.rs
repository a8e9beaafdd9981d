//! Service wiring: stores and the services built on them.

use std::sync::Arc;

use toolcrib_auth::TokenService;
use toolcrib_infra::{
    ItemRegistry, MemoryItemStore, MemoryLedgerStore, MemoryUserStore, TransactionLedger,
    UserDirectory,
};

use crate::config::Config;

pub struct AppServices {
    pub directory: Arc<UserDirectory>,
    pub registry: Arc<ItemRegistry>,
    pub ledger: Arc<TransactionLedger>,
    pub tokens: Arc<TokenService>,
}

pub fn build_services(config: &Config) -> AppServices {
    // The bundled backend keeps documents in memory behind the store traits;
    // the connection string is the seam for a persistent document store.
    tracing::info!(
        store = %config.database_url,
        "using in-memory document store"
    );

    let users = Arc::new(MemoryUserStore::new());
    let items = Arc::new(MemoryItemStore::new());
    let log = Arc::new(MemoryLedgerStore::new());

    AppServices {
        directory: Arc::new(UserDirectory::new(users)),
        registry: Arc::new(ItemRegistry::new(items, log.clone())),
        ledger: Arc::new(TransactionLedger::new(log)),
        tokens: Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::hours(config.token_ttl_hours),
        )),
    }
}
