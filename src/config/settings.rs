//! Process settings read from the environment (a `.env` file is loaded by the binary).

use crate::config::providers::DEFAULT_PROVIDER;
use crate::error::ConfigError;
use std::net::SocketAddr;
use std::time::Duration;

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_KEY: &str = "SUPABASE_KEY";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Which client talks to the backing store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgREST endpoint of the Supabase project.
    Rest,
    /// Direct PostgreSQL connection.
    Postgres { database_url: String },
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Rest => "rest",
            StoreBackend::Postgres { .. } => "postgres",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_key: String,
    pub backend: StoreBackend,
    pub provider: String,
    pub bind_addr: SocketAddr,
    /// Report list failures as 200 with `{"error", "mensaje"}` instead of 400.
    pub legacy_list_errors: bool,
    pub request_timeout: Duration,
    pub body_limit: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as absent.
    /// `SUPABASE_URL` and `SUPABASE_KEY` are required whatever the backend.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::MissingEnv(key));

        let supabase_url = required(SUPABASE_URL)?;
        let supabase_key = required(SUPABASE_KEY)?;

        let backend_kind = get("STORE_BACKEND").map(|v| v.to_ascii_lowercase());
        let backend = match backend_kind.as_deref() {
            None | Some("rest") | Some("supabase") => StoreBackend::Rest,
            Some("postgres") | Some("postgresql") => StoreBackend::Postgres {
                database_url: required("DATABASE_URL")?,
            },
            Some(other) => {
                return Err(ConfigError::InvalidEnv {
                    name: "STORE_BACKEND",
                    reason: format!("{} (expected rest or postgres)", other),
                })
            }
        };

        let provider = get("DB_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnv {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let legacy_list_errors = match get("LEGACY_LIST_ERRORS") {
            None => false,
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::InvalidEnv {
                name: "LEGACY_LIST_ERRORS",
                reason: format!("{} (expected true or false)", v),
            })?,
        };

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(v) => Duration::from_secs(v.parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
                name: "REQUEST_TIMEOUT_SECS",
                reason: format!("{} is not a number of seconds", v),
            })?),
        };

        let body_limit = match get("BODY_LIMIT_BYTES") {
            None => DEFAULT_BODY_LIMIT,
            Some(v) => v.parse::<usize>().map_err(|_| ConfigError::InvalidEnv {
                name: "BODY_LIMIT_BYTES",
                reason: format!("{} is not a byte count", v),
            })?,
        };

        Ok(Settings {
            supabase_url,
            supabase_key,
            backend,
            provider,
            bind_addr,
            legacy_list_errors,
            request_timeout,
            body_limit,
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
