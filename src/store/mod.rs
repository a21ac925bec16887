//! Backing store clients. Handlers only see the [`DataStore`] trait; the concrete
//! client is chosen once at startup from [`StoreBackend`].

pub mod postgres;
pub mod rest;

use crate::config::{Settings, StoreBackend};
use crate::error::{ConfigError, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

pub use postgres::PgStore;
pub use rest::RestStore;

/// One untyped row as exchanged with the store.
pub type Record = Map<String, Value>;

/// Table to address, with the schema of the provider active when the request arrived.
/// `None` leaves the schema to the client's default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        TableRef {
            schema: None,
            name: name.into(),
        }
    }

    pub fn in_schema(mut self, schema: Option<&str>) -> Self {
        self.schema = schema.map(str::to_string);
        self
    }
}

#[async_trait]
pub trait DataStore: Send + Sync {
    /// Every row of `table`, in the order the store returns them.
    async fn select_all(&self, table: &TableRef) -> Result<Vec<Value>, StoreError>;

    /// Insert `record` unchanged; returns what the store reports as inserted.
    async fn insert(&self, table: &TableRef, record: &Record) -> Result<Value, StoreError>;

    /// Cheap reachability check against `table`.
    async fn ping(&self, table: &TableRef) -> Result<(), StoreError>;
}

/// Build the client selected by `settings`. Failures abort startup.
pub async fn connect_store(settings: &Settings) -> Result<Arc<dyn DataStore>, ConfigError> {
    let store: Arc<dyn DataStore> = match &settings.backend {
        StoreBackend::Rest => Arc::new(RestStore::new(
            &settings.supabase_url,
            &settings.supabase_key,
            settings.request_timeout,
        )?),
        StoreBackend::Postgres { database_url } => {
            Arc::new(PgStore::connect(database_url, settings.request_timeout).await?)
        }
    };
    tracing::info!(backend = settings.backend.name(), "store client ready");
    Ok(store)
}
