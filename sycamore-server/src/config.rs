//! Server configuration loaded from environment variables.
//!
//! The binary loads a `.env` file from the working directory into the
//! process environment before this module reads it.
//!
//! # Environment Variables
//!
//! All optional:
//! - `DATABASE_URL` - Store connection string (default: mongodb://localhost:27017)
//! - `DATABASE_NAME` - Database name (default: appdb)
//! - `STORE_BACKEND` - `mongodb` or `memory` (default: mongodb)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8000)
//! - `INVALID_RECORD_POLICY` - `skip` or `fail` for stored records that fail
//!   their schema on read (default: skip)
//! - `RUST_LOG` - Tracing filter, read by the subscriber rather than here

use std::{
    env,
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
};

use thiserror::Error;
use tracing::info;

use crate::repository::RevalidationPolicy;

pub const DEFAULT_DATABASE_URL: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE_NAME: &str = "appdb";
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which storage backend the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Mongodb,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            "memory" => Ok(Self::Memory),
            other => Err(format!("expected \"mongodb\" or \"memory\", got \"{other}\"")),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mongodb => f.write_str("mongodb"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Store connection string
    pub database_url: String,
    pub database_name: String,
    pub store_backend: StoreKind,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    pub invalid_record_policy: RevalidationPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            store_backend: StoreKind::default(),
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            invalid_record_policy: RevalidationPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` when a variable is set to a value
    /// that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!(
            store_backend = %config.store_backend,
            database = %config.database_name,
            addr = %config.socket_addr(),
            invalid_record_policy = %config.invalid_record_policy,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Build a configuration from any key lookup, applying defaults for
    /// unset or blank keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            database_url: value("DATABASE_URL").unwrap_or(defaults.database_url),
            database_name: value("DATABASE_NAME").unwrap_or(defaults.database_name),
            store_backend: parse_var("STORE_BACKEND", value("STORE_BACKEND"))?
                .unwrap_or(defaults.store_backend),
            host: parse_var("HOST", value("HOST"))?.unwrap_or(defaults.host),
            port: parse_var("PORT", value("PORT"))?.unwrap_or(defaults.port),
            invalid_record_policy: parse_var("INVALID_RECORD_POLICY", value("INVALID_RECORD_POLICY"))?
                .unwrap_or(defaults.invalid_record_policy),
        })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(key: &str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.map(|raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();

        assert_eq!(config.database_url, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "appdb");
        assert_eq!(config.store_backend, StoreKind::Mongodb);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.invalid_record_policy, RevalidationPolicy::Skip);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("DATABASE_NAME", "  "), ("PORT", "")]).unwrap();

        assert_eq!(config.database_name, "appdb");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DATABASE_URL", "mongodb://db:27017"),
            ("DATABASE_NAME", "sycamore"),
            ("STORE_BACKEND", "Memory"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("INVALID_RECORD_POLICY", "fail"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "mongodb://db:27017");
        assert_eq!(config.database_name, "sycamore");
        assert_eq!(config.store_backend, StoreKind::Memory);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.invalid_record_policy, RevalidationPolicy::Fail);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "PORT"));

        let err = load(&[("STORE_BACKEND", "postgres")]).unwrap_err();
        assert!(err.to_string().contains("STORE_BACKEND"));
    }
}
