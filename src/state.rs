//! Shared application state for all routes.

use crate::config::ProviderSelection;
use crate::store::DataStore;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    /// Active provider. Written only by the provider switch endpoint.
    pub providers: Arc<RwLock<ProviderSelection>>,
    pub legacy_list_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, providers: ProviderSelection) -> Self {
        AppState {
            store,
            providers: Arc::new(RwLock::new(providers)),
            legacy_list_errors: false,
        }
    }

    pub fn with_legacy_list_errors(mut self, enabled: bool) -> Self {
        self.legacy_list_errors = enabled;
        self
    }
}
