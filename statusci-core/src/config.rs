//! Provider and authentication configuration
//!
//! Configs are registered once at startup into a [`ConfigContext`], which is
//! then shared read-only with every status source. Registration fails fast on
//! duplicate keys instead of silently overwriting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Connection parameters of a status provider, keyed by `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ServerConfig {
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.username.as_deref(), self.password.as_deref())
    }
}

/// Credentials applying to every URL below `base_url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationConfig {
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Send existing session cookies along with requests
    #[serde(default)]
    pub cors: bool,
}

impl AuthenticationConfig {
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.username.as_deref(), self.password.as_deref())
    }
}

/// Basic auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Builds credentials only if both parts are present and non-empty
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some(Self {
                username: u.to_string(),
                password: p.to_string(),
            }),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Errors raised while registering configs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config for provider '{0}' already exists")]
    DuplicateProvider(String),

    #[error("Authentication config for '{0}' already exists")]
    DuplicateAuthentication(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Registry of provider and authentication configs
#[derive(Debug, Default)]
pub struct ConfigContext {
    providers: HashMap<String, ServerConfig>,
    // Kept in registration order; resolution depends on it for ties
    authentications: Vec<AuthenticationConfig>,
}

impl ConfigContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider config under its id
    pub fn register_provider(&mut self, config: ServerConfig) -> Result<(), ConfigError> {
        if config.id.is_empty() || config.url.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "missing id and/or url for provider '{}'",
                config.id
            )));
        }
        if self.providers.contains_key(&config.id) {
            return Err(ConfigError::DuplicateProvider(config.id));
        }

        tracing::debug!("Registered provider config '{}' ({})", config.id, config.url);
        self.providers.insert(config.id.clone(), config);
        Ok(())
    }

    /// Registers an authentication config under its base URL
    pub fn register_authentication(
        &mut self,
        config: AuthenticationConfig,
    ) -> Result<(), ConfigError> {
        if config.base_url.is_empty() {
            return Err(ConfigError::Invalid("missing base_url".to_string()));
        }
        if self
            .authentications
            .iter()
            .any(|existing| existing.base_url == config.base_url)
        {
            return Err(ConfigError::DuplicateAuthentication(config.base_url));
        }

        tracing::debug!("Registered authentication config for {}", config.base_url);
        self.authentications.push(config);
        Ok(())
    }

    /// Looks up a provider config by id
    pub fn resolve_provider(&self, id: &str) -> Option<&ServerConfig> {
        self.providers.get(id)
    }

    /// Finds the most specific authentication config for `url`
    ///
    /// Among all configs whose base URL is a prefix of `url` the longest one
    /// wins. On equal length the first registered entry is kept.
    pub fn resolve_authentication(&self, url: &str) -> Option<&AuthenticationConfig> {
        let mut result: Option<&AuthenticationConfig> = None;
        for current in &self.authentications {
            if !url.starts_with(&current.base_url) {
                continue;
            }
            if result.is_none_or(|best| best.base_url.len() < current.base_url.len()) {
                result = Some(current);
            }
        }
        result
    }

    /// Credentials to use for a request to `url` on `server`
    ///
    /// A matching authentication config takes precedence over the
    /// credentials of the server config itself.
    pub fn credentials_for(&self, server: &ServerConfig, url: &str) -> Option<Credentials> {
        self.resolve_authentication(url)
            .and_then(AuthenticationConfig::credentials)
            .or_else(|| server.credentials())
    }

    /// Whether requests to `url` should carry session cookies
    pub fn with_credentials(&self, url: &str) -> bool {
        self.resolve_authentication(url).is_some_and(|auth| auth.cors)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn authentication_count(&self) -> usize {
        self.authentications.len()
    }
}
