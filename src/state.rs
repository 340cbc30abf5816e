use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, AuthService, DefaultImportService, EventService, ImportService,
    SeaOrmAccountService, SeaOrmAuthService, SeaOrmEventService, TokenService,
};

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub tokens: Arc<TokenService>,

    pub auth_service: Arc<dyn AuthService>,

    pub account_service: Arc<dyn AccountService>,

    pub import_service: Arc<dyn ImportService>,

    pub event_service: Arc<dyn EventService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        let tokens = Arc::new(TokenService::new(config.auth.jwt_secret.clone()));

        let auth_service =
            Arc::new(SeaOrmAuthService::new(store.clone(), tokens.clone())) as Arc<dyn AuthService>;
        let account_service =
            Arc::new(SeaOrmAccountService::new(store.clone())) as Arc<dyn AccountService>;
        let import_service =
            Arc::new(DefaultImportService::new(store.clone())) as Arc<dyn ImportService>;
        let event_service =
            Arc::new(SeaOrmEventService::new(store.clone())) as Arc<dyn EventService>;

        Ok(Self {
            config,
            store,
            tokens,
            auth_service,
            account_service,
            import_service,
            event_service,
        })
    }
}
