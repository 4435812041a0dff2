//! Monitor configuration
//!
//! Loaded from a TOML file, then patched from environment variables.
//!
//! ```toml
//! [settings]
//! refresh_interval_secs = 10
//!
//! [[server]]
//! id = "ci"
//! url = "https://ci.example.com"
//!
//! [[source]]
//! kind = "jenkins"
//! provider = "ci"
//! id = "team/core"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use statusci_core::config::{AuthenticationConfig, ConfigContext, ServerConfig};

use crate::scheduler::PollSettings;
use crate::source::StatusSource;

/// Upper bound of `age_interval_hours`, ten years
pub const MAX_AGE_INTERVAL_HOURS: u64 = 10 * 365 * 24;

/// Polling and presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base delay between two polls of one source
    pub refresh_interval_secs: u64,

    /// Upper bound of the random delay added to every poll
    pub max_jitter_ms: u64,

    /// Width of one age bucket
    pub age_interval_hours: u64,

    /// Timeout of a single HTTP request
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 10,
            max_jitter_ms: 500,
            age_interval_hours: 24,
            request_timeout_secs: 30,
        }
    }
}

/// Whole monitor configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default, rename = "server")]
    pub servers: Vec<ServerConfig>,

    #[serde(default, rename = "authentication")]
    pub authentications: Vec<AuthenticationConfig>,

    #[serde(default, rename = "source")]
    pub sources: Vec<StatusSource>,
}

impl MonitorConfig {
    /// Parses a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    /// Reads the file at `path` and applies environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides settings from variables
    ///
    /// Recognized variables:
    /// - STATUSCI_REFRESH_INTERVAL (seconds)
    /// - STATUSCI_MAX_JITTER_MS
    ///
    /// Unparsable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secs) = lookup("STATUSCI_REFRESH_INTERVAL").and_then(|s| s.parse::<u64>().ok()) {
            self.settings.refresh_interval_secs = secs;
        }

        if let Some(ms) = lookup("STATUSCI_MAX_JITTER_MS").and_then(|s| s.parse::<u64>().ok()) {
            self.settings.max_jitter_ms = ms;
        }
    }

    /// Validates the configuration
    ///
    /// Sources referring to unknown servers pass; they surface as config
    /// errors on their status at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.settings.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be greater than 0");
        }

        if self.settings.age_interval_hours == 0 {
            anyhow::bail!("age_interval_hours must be greater than 0");
        }

        if self.settings.age_interval_hours > MAX_AGE_INTERVAL_HOURS {
            anyhow::bail!("age_interval_hours must be at most {}", MAX_AGE_INTERVAL_HOURS);
        }

        if self.settings.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        for server in &self.servers {
            if !is_http_url(&server.url) {
                anyhow::bail!("url of server '{}' must start with http:// or https://", server.id);
            }
        }

        for auth in &self.authentications {
            if !is_http_url(&auth.base_url) {
                anyhow::bail!("authentication base_url '{}' must start with http:// or https://", auth.base_url);
            }
        }

        for source in &self.sources {
            if source.id.is_empty() {
                anyhow::bail!("source on provider '{}' has an empty id", source.provider);
            }
        }

        Ok(())
    }

    /// Registers every server and authentication config
    pub fn build_context(&self) -> Result<ConfigContext> {
        let mut ctx = ConfigContext::new();

        for server in &self.servers {
            ctx.register_provider(server.clone())
                .context("Failed to register server config")?;
        }

        for auth in &self.authentications {
            ctx.register_authentication(auth.clone())
                .context("Failed to register authentication config")?;
        }

        Ok(ctx)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            refresh_interval: Duration::from_secs(self.settings.refresh_interval_secs),
            max_jitter: Duration::from_millis(self.settings.max_jitter_ms),
        }
    }

    pub fn age_interval_millis(&self) -> i64 {
        i64::try_from(self.settings.age_interval_hours)
            .unwrap_or(i64::MAX)
            .saturating_mul(60 * 60 * 1000)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
