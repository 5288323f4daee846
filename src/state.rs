use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::AppConfig;
use crate::database::Store;
use crate::payment::PaymentGateway;

/// Shared handles injected into every handler. Built once at startup;
/// the store is closed by the server on shutdown.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenIssuer,
    pub payments: Arc<dyn PaymentGateway>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            tokens: TokenIssuer::new(&config.security.jwt_secret),
            store,
            payments,
            config: Arc::new(config),
        }
    }
}
