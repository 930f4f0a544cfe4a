use std::sync::Arc;

use crate::account::AccountRepository;
use crate::config::AppConfig;
use crate::internal_transfer::{LedgerEngine, TransferRepository, TransferService};
use crate::user_auth::{TokenAuthority, UserAuthService};

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountRepository>,
    pub user_auth: Arc<UserAuthService>,
    pub transfers: Arc<TransferService>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        accounts: Arc<dyn AccountRepository>,
        user_auth: Arc<UserAuthService>,
        transfers: Arc<TransferService>,
    ) -> Self {
        Self {
            config,
            accounts,
            user_auth,
            transfers,
        }
    }
}

impl AppState {
    /// Wire services over the given stores
    pub fn assemble(
        config: AppConfig,
        accounts: Arc<dyn AccountRepository>,
        ledger: Arc<dyn TransferRepository>,
    ) -> Self {
        let tokens = Arc::new(TokenAuthority::new(config.token.clone()));
        let user_auth = Arc::new(UserAuthService::new(
            accounts.clone(),
            tokens,
            config.ledger.initial_balance,
        ));
        let engine = Arc::new(LedgerEngine::new(ledger));
        let transfers = Arc::new(TransferService::new(engine));
        Self::new(Arc::new(config), accounts, user_auth, transfers)
    }
}
