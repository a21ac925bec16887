//! Pollos API: configuration-driven HTTP facade over a hosted relational store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{ProviderConfig, ProviderRegistry, ProviderSelection, Settings, StoreBackend, DEFAULT_PROVIDER};
pub use error::{AppError, ConfigError, StoreError};
pub use routes::{app, common_routes, config_routes, record_routes};
pub use state::AppState;
pub use store::{connect_store, DataStore, PgStore, Record, RestStore, TableRef};
