//! Site and storage configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};

/// Main configuration structure for Sitemark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Durable file store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Result handoff settings.
    #[serde(default)]
    pub handoff: HandoffConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, shown on the HTML sitemap page.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,
}

/// Durable file store configuration.
///
/// Both fields default to empty; an empty store is reported as
/// unavailable when publishing rather than at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Local directory that holds published files.
    #[serde(default)]
    pub root: String,

    /// Public URL that maps to `root` (e.g., "https://example.com/uploads").
    #[serde(default)]
    pub public_url: String,
}

/// Result handoff configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffConfig {
    /// Directory for stashed generation results.
    #[serde(default = "default_handoff_dir")]
    pub dir: String,

    /// Seconds before a stashed result expires.
    #[serde(default = "default_handoff_ttl_secs")]
    pub ttl_secs: u64,
}

// Default value functions
fn default_handoff_dir() -> String {
    ".sitemark/handoff".to_string()
}

fn default_handoff_ttl_secs() -> u64 {
    60
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            dir: default_handoff_dir(),
            ttl_secs: default_handoff_ttl_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate for more flexibility.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SITEMARK").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        Url::parse(&self.site.base_url).map_err(|e| {
            CoreError::config_with_source("site.base_url must be an absolute URL", e)
        })?;

        // Ensure base_url doesn't have trailing slash
        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Get the site home URL with a trailing slash.
    pub fn home_url(&self) -> String {
        format!("{}/", self.site.base_url.trim_end_matches('/'))
    }
}
