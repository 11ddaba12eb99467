//! Application configuration management.
//!
//! Two layers live here: the persisted app config (last used username and
//! optional URL overrides), stored at `~/.config/botmetrics/config.json`,
//! and the resolved `ApiConfig` the HTTP layer is built from. Resolution
//! order is defaults, then config file, then environment variables.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "botmetrics";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Token file name in the cache directory
const TOKEN_FILE: &str = "tokens.json";

/// Default base URL for the dashboard API
const DEFAULT_BASE_URL: &str = "https://api.rpms-tunisie.com";

/// Default path prefix all dashboard endpoints live under
const DEFAULT_PREFIX: &str = "/api/v1";

/// HTTP request timeout in seconds.
/// 30s allows for slow aggregate queries while still failing fast.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub last_username: Option<String>,
    pub base_url: Option<String>,
    pub external_base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Path of the durable token file (see [`crate::auth::TokenStore`]).
    pub fn token_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(TOKEN_FILE))
    }
}

/// Resolved HTTP configuration the session layer is constructed with.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Scheme + host of the dashboard API, no trailing slash required.
    pub base_url: String,
    /// Path prefix all dashboard endpoints live under.
    pub prefix: String,
    /// Base URL for the unauthenticated stats endpoints, if deployed.
    pub external_base_url: Option<String>,
    /// Transport timeout applied to every request.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            external_base_url: None,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Build the effective configuration from defaults, the persisted
    /// config, and environment variables (highest precedence).
    pub fn resolve(config: &Config) -> Self {
        let mut resolved = Self::default();

        if let Some(ref base) = config.base_url {
            resolved.base_url = base.clone();
        }
        if let Some(ref external) = config.external_base_url {
            resolved.external_base_url = Some(external.clone());
        }

        if let Ok(base) = std::env::var("BOTMETRICS_API_BASE_URL") {
            resolved.base_url = base;
        }
        if let Ok(prefix) = std::env::var("BOTMETRICS_API_PREFIX") {
            resolved.prefix = prefix;
        }
        if let Ok(external) = std::env::var("BOTMETRICS_EXTERNAL_API_BASE_URL") {
            resolved.external_base_url = Some(external);
        }
        if let Ok(timeout) = std::env::var("BOTMETRICS_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                resolved.timeout_secs = secs;
            }
        }

        resolved
    }

    /// Full URL for a dashboard endpoint path (expected to start with `/`).
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url.trim_end_matches('/'), self.prefix, path)
    }

    /// Full URL for an external (unauthenticated) endpoint, if configured.
    pub fn external_url(&self, path: &str) -> Option<String> {
        self.external_base_url
            .as_ref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), path))
    }
}
