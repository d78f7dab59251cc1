//! Server configuration, read from the environment.
//!
//! Everything has a default except `AUTH_SECRET`: tokens signed with a
//! guessable secret are forgeable, so there is no fallback for it.

use std::net::SocketAddr;
use std::time::Duration;

/// Why configuration loading failed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {name} is not set")]
    MissingVar { name: &'static str },

    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to. `BIND_ADDR`, default
    /// `127.0.0.1:3000`.
    pub bind_addr: SocketAddr,
    /// SQLite database URL. `DATABASE_URL`; when unset the ledger lives
    /// in memory and is lost on restart.
    pub database_url: Option<String>,
    /// Path to the train catalog file. `CATALOG_PATH`, default
    /// `data/trains.json`.
    pub catalog_path: String,
    /// Secret the token signatures are keyed on. `AUTH_SECRET`, required.
    pub auth_secret: String,
    /// Longest a booking request waits for its critical section.
    /// `MAX_KEY_WAIT_MS`, default 5000.
    pub max_key_wait: Duration,
    /// Issued token lifetime. `AUTH_TOKEN_TTL_SECS`, default 86400.
    pub auth_token_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidVar {
                    name: "BIND_ADDR",
                    reason: e.to_string(),
                }
            })?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let auth_secret = lookup("AUTH_SECRET").ok_or(ConfigError::MissingVar {
            name: "AUTH_SECRET",
        })?;
        if auth_secret.is_empty() {
            return Err(ConfigError::InvalidVar {
                name: "AUTH_SECRET",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            database_url: lookup("DATABASE_URL"),
            catalog_path: lookup("CATALOG_PATH").unwrap_or_else(|| "data/trains.json".to_string()),
            auth_secret,
            max_key_wait: Duration::from_millis(parse_or(&lookup, "MAX_KEY_WAIT_MS", 5000)?),
            auth_token_ttl: Duration::from_secs(parse_or(&lookup, "AUTH_TOKEN_TTL_SECS", 86_400)?),
        })
    }
}

fn parse_or(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            name,
            reason: format!("{raw:?} is not a non-negative integer"),
        }),
        None => Ok(default),
    }
}
