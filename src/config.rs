//! Runtime configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Every setting has a default so the server starts with no setup.

use crate::cart::state::DEFAULT_IDENTITY_HEADER;
use axum::http::HeaderName;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SERVER_PORT '{value}': {reason}")]
    InvalidPort { value: String, reason: String },

    #[error("invalid IDENTITY_HEADER '{0}'")]
    InvalidHeader(String),

    #[error("invalid SEED_CATALOG '{0}': expected true or false")]
    InvalidFlag(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Header the upstream authentication layer fills with the caller email
    pub identity_header: HeaderName,
    /// Load the demo product catalog at start-up
    pub seed_catalog: bool,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let server_port = match lookup("SERVER_PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::InvalidPort {
                reason: e.to_string(),
                value,
            })?,
            None => 8000,
        };

        let identity_header = match lookup("IDENTITY_HEADER") {
            Some(value) => HeaderName::try_from(value.to_ascii_lowercase())
                .map_err(|_| ConfigError::InvalidHeader(value))?,
            None => HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
        };

        let seed_catalog = match lookup("SEED_CATALOG") {
            Some(value) => value
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidFlag(value))?,
            None => true,
        };

        tracing::debug!(%server_host, server_port, %identity_header, seed_catalog, "configuration loaded");

        Ok(Self {
            server_host,
            server_port,
            identity_header,
            seed_catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.server_host, "0.0.0.0");
        assert_eq!(cfg.server_port, 8000);
        assert_eq!(cfg.identity_header.as_str(), "x-user-email");
        assert!(cfg.seed_catalog);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "9090"),
            ("IDENTITY_HEADER", "X-Forwarded-User"),
            ("SEED_CATALOG", "false"),
        ])
        .unwrap();
        assert_eq!(cfg.server_host, "127.0.0.1");
        assert_eq!(cfg.server_port, 9090);
        assert_eq!(cfg.identity_header.as_str(), "x-forwarded-user");
        assert!(!cfg.seed_catalog);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("SERVER_PORT", "eighty")]),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            config(&[("IDENTITY_HEADER", "bad header")]),
            Err(ConfigError::InvalidHeader(_))
        ));
        assert!(matches!(
            config(&[("SEED_CATALOG", "sometimes")]),
            Err(ConfigError::InvalidFlag(_))
        ));
    }
}
