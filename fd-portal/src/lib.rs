pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;
pub mod startup;
pub mod utils;

use crate::config::Settings;
use services::{
    AccountClient, AuthClient, CalculatorClient, ProductClient, ProfileClient, SessionClient,
};
use session::{FileStorage, KeyValueStorage, MemoryStorage, PendingCalculationStore, SessionStore};
use std::sync::Arc;

/// Shared application state: one session client and the typed clients that
/// issue their requests through it.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionClient,
    pub products: Arc<ProductClient>,
    pub calculator: Arc<CalculatorClient>,
    pub accounts: Arc<AccountClient>,
    pub profiles: Arc<ProfileClient>,
    pub pending: Arc<PendingCalculationStore>,
}

impl AppState {
    /// Session keys go to the configured file, or to memory when no path
    /// is set. Pending calculations always live in memory.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStorage> = match &settings.session.storage_path {
            Some(path) => Arc::new(FileStorage::open(path.clone())?),
            None => Arc::new(MemoryStorage::new()),
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("fd-portal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::new(settings, http, storage, Arc::new(MemoryStorage::new())))
    }

    pub fn new(
        settings: &Settings,
        http: reqwest::Client,
        session_storage: Arc<dyn KeyValueStorage>,
        pending_storage: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let auth = AuthClient::new(http, settings.auth_service.clone());
        let session = SessionClient::new(
            auth,
            SessionStore::new(session_storage),
            settings.session.refresh_interval(),
        );

        Self {
            products: Arc::new(ProductClient::new(
                session.clone(),
                settings.product_service.clone(),
            )),
            calculator: Arc::new(CalculatorClient::new(
                session.clone(),
                settings.calculator_service.clone(),
            )),
            accounts: Arc::new(AccountClient::new(
                session.clone(),
                settings.account_service.clone(),
            )),
            profiles: Arc::new(ProfileClient::new(
                session.clone(),
                settings.profile_service.clone(),
            )),
            pending: Arc::new(PendingCalculationStore::new(
                pending_storage,
                settings.session.pending_calculation_ttl(),
            )),
            session,
        }
    }
}
