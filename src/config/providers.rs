//! Static provider table and the active provider selection.

use crate::error::ConfigError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "supabase";

/// Attribute key that holds the table name inside every provider record.
pub const TABLE_NAME_KEY: &str = "table_name";

/// Connection attributes of one provider. Attribute sets differ per provider
/// (some carry `schema`, some `database`), so they are kept as an open map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderConfig {
    pub provider_id: String,
    pub table_name: String,
    /// All attributes, `table_name` included.
    pub attributes: BTreeMap<String, String>,
}

impl ProviderConfig {
    /// `extra` holds the provider-specific attributes; `table_name` is added to them.
    pub fn new(provider_id: impl Into<String>, table_name: impl Into<String>, extra: &[(&str, &str)]) -> Self {
        let table_name = table_name.into();
        let mut attributes: BTreeMap<String, String> = extra
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        attributes.insert(TABLE_NAME_KEY.to_string(), table_name.clone());
        ProviderConfig {
            provider_id: provider_id.into(),
            table_name,
            attributes,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn schema(&self) -> Option<&str> {
        self.attribute("schema")
    }
}

/// Read-only lookup of provider id -> attributes.
#[derive(Clone, Debug)]
pub struct ProviderRegistry {
    by_id: BTreeMap<String, ProviderConfig>,
}

impl ProviderRegistry {
    /// The built-in table: supabase, postgresql and mysql.
    pub fn builtin() -> Self {
        Self::from_configs([
            ProviderConfig::new("supabase", "database-build-8p0tx0q2wyg11r76", &[("schema", "public")]),
            ProviderConfig::new("postgresql", "pollos_chanchos", &[("schema", "public")]),
            ProviderConfig::new("mysql", "pollos_chanchos", &[("database", "pollos_db")]),
        ])
    }

    pub fn from_configs(configs: impl IntoIterator<Item = ProviderConfig>) -> Self {
        ProviderRegistry {
            by_id: configs
                .into_iter()
                .map(|c| (c.provider_id.clone(), c))
                .collect(),
        }
    }

    pub fn get_config(&self, provider_id: &str) -> Result<&ProviderConfig, ConfigError> {
        self.by_id
            .get(provider_id)
            .ok_or_else(|| ConfigError::UnknownProvider(provider_id.to_string()))
    }

    pub fn get_table_name(&self, provider_id: &str) -> Result<&str, ConfigError> {
        self.get_config(provider_id).map(|c| c.table_name.as_str())
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.by_id.contains_key(provider_id)
    }

    /// Providers in id order.
    pub fn configs(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.by_id.values()
    }
}

/// Registry plus the provider currently in use.
#[derive(Clone, Debug)]
pub struct ProviderSelection {
    registry: ProviderRegistry,
    active: String,
}

impl ProviderSelection {
    /// Fails if `active` is not a key of the registry.
    pub fn new(registry: ProviderRegistry, active: &str) -> Result<Self, ConfigError> {
        registry.get_config(active)?;
        Ok(ProviderSelection {
            registry,
            active: active.to_string(),
        })
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn active_id(&self) -> &str {
        &self.active
    }

    pub fn get_config(&self) -> Result<&ProviderConfig, ConfigError> {
        self.registry.get_config(&self.active)
    }

    pub fn get_table_name(&self) -> Result<&str, ConfigError> {
        self.registry.get_table_name(&self.active)
    }

    /// Make `provider_id` the active provider. Unknown ids leave the selection unchanged.
    pub fn switch_to(&mut self, provider_id: &str) -> Result<&ProviderConfig, ConfigError> {
        if !self.registry.contains(provider_id) {
            return Err(ConfigError::UnknownProvider(provider_id.to_string()));
        }
        self.active = provider_id.to_string();
        self.registry.get_config(provider_id)
    }
}
