//! Provider adapters
//!
//! An adapter fetches the resource behind a status source and classifies the
//! answer. One adapter exists per [`ProviderKind`](crate::source::ProviderKind);
//! all of them are stateless apart from shared HTTP clients.

#[cfg(test)]
pub mod fake;
mod jenkins;
mod travis;

pub use jenkins::JenkinsAdapter;
pub use travis::TravisAdapter;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use statusci_client::ProviderClient;
use statusci_core::config::Credentials;
use statusci_core::domain::job::Classified;

use crate::error::ResolveError;

/// Everything an adapter needs to fetch one resource
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Base URL of the server hosting the resource
    pub base_url: String,
    /// Resource id on the server
    pub id: String,
    pub credentials: Option<Credentials>,
    /// Send session cookies along
    pub with_credentials: bool,
}

/// Adapter trait for one provider kind
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// URL of the resource, used to pick authentication
    fn target_url(&self, base_url: &str, id: &str) -> String;

    /// Fetches the resource and classifies the response
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<Classified, ResolveError>;
}

/// Shared HTTP clients
///
/// Requests for authentication configs with `cors` set go through a client
/// with a cookie store.
#[derive(Debug, Clone)]
pub struct HttpClients {
    plain: Client,
    with_cookies: Client,
}

impl HttpClients {
    pub fn new(timeout: Duration) -> Result<Self> {
        let plain = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let with_cookies = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .context("Failed to build cookie-enabled HTTP client")?;

        Ok(Self {
            plain,
            with_cookies,
        })
    }

    /// Provider client for the server in `request`
    pub fn for_request(&self, request: &FetchRequest) -> ProviderClient {
        let http = if request.with_credentials {
            self.with_cookies.clone()
        } else {
            self.plain.clone()
        };
        ProviderClient::with_client(&request.base_url, http).with_credentials(request.credentials.clone())
    }

    /// Provider client without credentials, for URL building
    pub fn for_base_url(&self, base_url: &str) -> ProviderClient {
        ProviderClient::with_client(base_url, self.plain.clone())
    }
}
