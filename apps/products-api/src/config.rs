//! Configuration for Products API

use core_config::{app_info, env_or_default, env_parse, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use database::mongodb::MongoConfig;
use domain_products::RepositoryTimeouts;
use std::time::Duration;

pub use core_config::Environment;

/// Which repository backs the products routes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreConfig {
    Mongo(MongoConfig),
    /// Process-local store; contents are lost on restart
    Memory,
}

impl FromEnv for StoreConfig {
    /// `PRODUCTS_STORE`: `mongodb` (default) or `memory`. MongoDB settings are
    /// only read, and only required, for the `mongodb` store.
    fn from_env() -> Result<Self, ConfigError> {
        match env_or_default("PRODUCTS_STORE", "mongodb").trim() {
            "mongodb" | "mongo" => Ok(Self::Mongo(MongoConfig::from_env()?)),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue {
                key: "PRODUCTS_STORE".to_string(),
                details: format!("expected 'mongodb' or 'memory', got '{}'", other),
            }),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub timeouts: RepositoryTimeouts,
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = RepositoryTimeouts::default();
        let timeouts = RepositoryTimeouts::new(
            timeout_secs("PRODUCTS_LONG_TIMEOUT_SECS", defaults.long)?,
            timeout_secs("PRODUCTS_SHORT_TIMEOUT_SECS", defaults.short)?,
        );

        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            store: StoreConfig::from_env()?,
            timeouts,
            shutdown_timeout: Duration::from_secs(env_parse("SHUTDOWN_TIMEOUT_SECS", 30u64)?),
        })
    }
}

/// Whole-second deadline; zero would fail every store call
fn timeout_secs(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    match env_parse(key, default.as_secs())? {
        0 => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            details: "timeout must be at least 1 second".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}
