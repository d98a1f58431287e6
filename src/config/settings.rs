//! Application settings loading from config.toml
//!
//! Settings come from three layers, later ones winning: built-in defaults, the
//! TOML file, and environment variables (`INVENTORY_STORE`, `INVENTORY_API_URL`,
//! `DATABASE_URL`). A missing config file is not an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{path::Path, str::FromStr, time::Duration};

/// Default base URL of the remote product service.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Where products are read from and written to
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            store: StoreConfig::default(),
        }
    }
}

/// Which [`ProductStore`](crate::store::ProductStore) implementation to use
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// The remote REST service
    #[default]
    Http,
    /// A local `SQLite` file
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::Config {
                message: format!("Unknown store backend '{other}' (expected 'http' or 'sqlite')"),
            }),
        }
    }
}

/// Connection settings for the product store
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Which store implementation to connect
    pub backend: StoreBackend,
    /// Base URL the `productos` endpoints hang off
    pub base_url: String,
    /// `SeaORM` connection string for the sqlite backend
    pub database_url: String,
    /// Per-request timeout handed to the HTTP client; none when absent
    pub request_timeout_secs: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Http,
            base_url: DEFAULT_API_URL.to_string(),
            database_url: super::database::DEFAULT_DATABASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl StoreConfig {
    /// The configured timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl AppConfig {
    /// Applies environment overrides using the given lookup.
    ///
    /// # Errors
    /// Returns an error if `INVENTORY_STORE` names an unknown backend.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("INVENTORY_STORE") {
            self.store.backend = backend.parse()?;
        }
        if let Some(url) = lookup("INVENTORY_API_URL") {
            self.store.base_url = url;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.store.database_url = url;
        }
        Ok(())
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    /// Returns an error if `INVENTORY_STORE` names an unknown backend.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }
}

/// Loads settings from a TOML file, falling back to defaults when it does not exist.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The TOML syntax is invalid or a field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("No config file at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}
