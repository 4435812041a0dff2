//! StatusCI HTTP Client
//!
//! A small, type-safe HTTP client for reading build status from CI providers.
//!
//! The same [`ProviderClient`] speaks to every supported provider; endpoint
//! methods are grouped per provider (Jenkins, Travis) in their own modules.
//!
//! # Example
//!
//! ```no_run
//! use statusci_client::ProviderClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ProviderClient::new("https://ci.example.com");
//!
//!     let job = client.read_job("team/core").await?;
//!     println!("Job color: {:?}", job.color);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jenkins;
mod travis;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use statusci_core::config::Credentials;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for a CI provider
///
/// Requests are plain `GET`s against the provider's JSON API. When
/// credentials are set they are sent via HTTP basic auth.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    /// Base URL of the provider (e.g., "https://ci.example.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Optional basic auth credentials
    credentials: Option<Credentials>,
}

impl ProviderClient {
    /// Create a new provider client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the provider (e.g., "https://ci.example.com")
    ///
    /// # Example
    /// ```
    /// use statusci_client::ProviderClient;
    ///
    /// let client = ProviderClient::new("https://ci.example.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new provider client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, cookie stores, etc.
    ///
    /// # Example
    /// ```
    /// use statusci_client::ProviderClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ProviderClient::with_client("https://ci.example.com", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials: None,
        }
    }

    /// Use basic auth credentials for every request
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Get the base URL of the provider
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parse the base URL
    fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }

    /// Append path segments to the base URL, encoding each of them
    fn url_with_segments<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.parsed_base_url()?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Send a `GET` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);

        let mut request = self.client.get(url.clone());
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await?;
        self.handle_response(&url, response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: &Url,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), status_message(status, url)));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON from {}: {}", url, e)))
    }
}

/// Describe an unexpected HTTP status without echoing the body
fn status_message(status: StatusCode, url: &Url) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown status");
    let mut message = format!("Unexpected HTTP status {} ({}) while loading {}", status.as_u16(), reason, url);
    if status == StatusCode::NOT_FOUND {
        message.push_str(". Not found or not authenticated / authorized");
    }
    message
}
