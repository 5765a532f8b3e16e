//! Layered configuration for the gateway.
//!
//! Values are resolved in order: built-in defaults, an optional TOML file,
//! `TAVILY_GATEWAY_`-prefixed environment variables (`__` separates nested
//! keys), then explicit CLI overrides.
//! The provider credential itself is read from `TAVILY_API_KEY`; its absence
//! is not a load failure - the handler reports it as a configuration error
//! in the response payload instead of crashing the process.

use crate::{Error, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Tavily API key
pub const API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

/// Tavily provider connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key; populated from `TAVILY_API_KEY` when unset
    pub api_key: Option<String>,
    /// Base URL of the Tavily API
    pub endpoint: String,
    /// Request timeout in seconds for the outbound search call
    pub timeout_secs: u64,
    /// User agent sent with provider requests
    pub user_agent: String,
}

/// Default search parameters applied when the event does not supply them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search depth used when the caller supplies none ("basic" or "advanced")
    pub default_search_depth: String,
    /// Result count used when the caller supplies none
    pub default_max_results: u32,
}

/// In-memory response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a cached search result stays fresh
    pub ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.tavily.com".to_string(),
            timeout_secs: 30,
            user_agent: format!(
                "tavily-search-gateway/{} (Agent Search Gateway)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_search_depth: "advanced".to_string(),
            default_max_results: 5,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

/// Explicit overrides collected from CLI flags
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from defaults, the config file, and the environment
    pub fn load() -> Result<Self> {
        Self::load_with_overrides(&ConfigOverrides::default())
    }

    /// Load configuration, applying CLI overrides last
    pub fn load_with_overrides(overrides: &ConfigOverrides) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        let file_path = overrides
            .config_path
            .clone()
            .or_else(Self::default_config_path);
        if let Some(path) = file_path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("TAVILY_GATEWAY")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if config.provider.api_key.is_none() {
            config.provider.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty());
        }

        if let Some(api_key) = &overrides.api_key {
            config.provider.api_key = Some(api_key.clone());
        }
        if let Some(endpoint) = &overrides.endpoint {
            config.provider.endpoint = endpoint.clone();
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            config.provider.timeout_secs = timeout_secs;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// A missing API key is deliberately not a validation failure; the
    /// handler surfaces it as a failure payload per invocation.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.provider.endpoint).map_err(|e| Error::InvalidInput {
            field: "provider.endpoint".to_string(),
            reason: format!("not a valid URL: {e}"),
        })?;

        if self.provider.timeout_secs == 0 {
            return Err(Error::InvalidInput {
                field: "provider.timeout_secs".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        if self.search.default_max_results == 0 {
            return Err(Error::InvalidInput {
                field: "search.default_max_results".to_string(),
                reason: "must return at least one result".to_string(),
            });
        }

        match self.search.default_search_depth.as_str() {
            "basic" | "advanced" => {}
            other => {
                return Err(Error::InvalidInput {
                    field: "search.default_search_depth".to_string(),
                    reason: format!("expected \"basic\" or \"advanced\", got \"{other}\""),
                });
            }
        }

        Ok(())
    }

    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_secs)
    }

    /// Cache TTL as a [`Duration`]
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tavily-search-gateway").join("config.toml"))
    }
}
