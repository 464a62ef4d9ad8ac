//! Configuration loading and representation.
//!
//! Everything comes from environment variables; `from_lookup` takes any
//! `name -> value` function so tests don't touch the process environment.

use std::net::SocketAddr;

use catalog_observability::LogFormat;
use thiserror::Error;

pub const ENV_BIND_ADDR: &str = "CATALOG_BIND_ADDR";
pub const ENV_USE_PERSISTENT_STORES: &str = "USE_PERSISTENT_STORES";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{var} must be set when {because}")]
    Missing {
        var: &'static str,
        because: &'static str,
    },
}

/// Connection settings for the Postgres store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Which storage adapter backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    Postgres(DatabaseConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(ENV_BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| invalid(ENV_BIND_ADDR, e))?;

        let log_format = match lookup(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| invalid(ENV_LOG_FORMAT, e))?,
            None => LogFormat::default(),
        };

        let use_persistent = match lookup(ENV_USE_PERSISTENT_STORES) {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .map_err(|e| invalid(ENV_USE_PERSISTENT_STORES, e))?,
            None => false,
        };

        let storage = if use_persistent {
            let url = lookup(ENV_DATABASE_URL)
                .filter(|u| !u.trim().is_empty())
                .ok_or(ConfigError::Missing {
                    var: ENV_DATABASE_URL,
                    because: "USE_PERSISTENT_STORES=true",
                })?;

            let max_connections = match lookup(ENV_DATABASE_MAX_CONNECTIONS) {
                Some(raw) => match raw.trim().parse::<u32>() {
                    Ok(0) => return Err(invalid(ENV_DATABASE_MAX_CONNECTIONS, "must be at least 1")),
                    Ok(n) => n,
                    Err(e) => return Err(invalid(ENV_DATABASE_MAX_CONNECTIONS, e)),
                },
                None => DEFAULT_MAX_CONNECTIONS,
            };

            StorageBackend::Postgres(DatabaseConfig {
                url,
                max_connections,
            })
        } else {
            StorageBackend::InMemory
        };

        Ok(Self {
            bind_addr,
            storage,
            log_format,
        })
    }
}

fn invalid(var: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.to_string(),
    }
}
