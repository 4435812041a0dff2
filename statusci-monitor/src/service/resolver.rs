//! Status resolver
//!
//! One pass of the pipeline for a single source: config lookup, adapter
//! fetch, normalization. The scheduler calls this on every poll.

use std::collections::HashMap;
use std::sync::Arc;

use statusci_core::config::ConfigContext;
use statusci_core::domain::status::Status;
use statusci_core::normalize::{SourceNames, normalize};
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::provider::{FetchRequest, ProviderAdapter};
use crate::service::clock::Clock;
use crate::source::{ProviderKind, StatusSource};

/// Resolves status sources into fresh statuses
pub struct StatusResolver {
    config: Arc<ConfigContext>,
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
    clock: Arc<dyn Clock>,
}

impl StatusResolver {
    /// Creates a resolver without any adapters
    pub fn new(config: Arc<ConfigContext>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            adapters: HashMap::new(),
            clock,
        }
    }

    /// Registers the adapter for a provider kind
    pub fn with_adapter(mut self, kind: ProviderKind, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(kind, adapter);
        self
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Fetches and normalizes one source
    ///
    /// # Errors
    /// * `Config` - the source's provider is unknown or the source has no id
    /// * `Loading` - a request failed
    /// * `Provider` - the response could not be understood
    pub async fn resolve(&self, source: &StatusSource) -> Result<Status, ResolveError> {
        if source.id.is_empty() {
            return Err(ResolveError::config("Missing id for status source"));
        }

        let server = self
            .config
            .resolve_provider(&source.provider)
            .ok_or_else(|| ResolveError::config(format!("No provider config '{}' found", source.provider)))?;

        let adapter = self
            .adapters
            .get(&source.kind)
            .ok_or_else(|| ResolveError::config(format!("No adapter for provider kind '{}'", source.kind)))?;

        let target = adapter.target_url(&server.url, &source.id);
        let request = FetchRequest {
            base_url: server.url.clone(),
            id: source.id.clone(),
            credentials: self.config.credentials_for(server, &target),
            with_credentials: self.config.with_credentials(&target),
        };

        debug!("Fetching {} from {}", source, target);
        let classified = adapter.fetch(&request).await?;

        let names = SourceNames::new(source.name.as_deref(), &source.id);
        Ok(normalize(classified, &names, self.clock.now_millis()))
    }

    /// Resolves a source, turning any failure into an error placeholder
    pub async fn resolve_or_placeholder(&self, source: &StatusSource, previous: Option<&Status>) -> Status {
        match self.resolve(source).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to resolve {} ({}): {}", source, e.kind(), e);
                let names = SourceNames::new(source.name.as_deref(), &source.id);
                e.into_status(&names, previous)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fake::{FakeAdapter, finished_job};
    use crate::service::clock::FakeClock;
    use chrono::DateTime;
    use statusci_core::config::{AuthenticationConfig, ServerConfig};
    use statusci_core::domain::build::BuildOutcome;
    use statusci_core::domain::job::Classified;
    use statusci_core::domain::status::{ErrorKind, Signal};

    const NOW: i64 = 1_700_000_000_000;

    fn context() -> Arc<ConfigContext> {
        let mut ctx = ConfigContext::new();
        ctx.register_provider(ServerConfig {
            id: "ci".to_string(),
            url: "https://ci.example.com".to_string(),
            username: Some("server-user".to_string()),
            password: Some("pw".to_string()),
        })
        .unwrap();
        ctx.register_authentication(AuthenticationConfig {
            base_url: "https://ci.example.com/job/team-a".to_string(),
            username: Some("team-a".to_string()),
            password: Some("pw".to_string()),
            cors: true,
        })
        .unwrap();
        Arc::new(ctx)
    }

    fn resolver(adapter: Arc<FakeAdapter>) -> StatusResolver {
        let clock = FakeClock::new(DateTime::from_timestamp_millis(NOW).unwrap());
        StatusResolver::new(context(), Arc::new(clock)).with_adapter(ProviderKind::Jenkins, adapter)
    }

    #[tokio::test]
    async fn test_resolves_single_job() {
        let adapter = Arc::new(FakeAdapter::new(|id, _| {
            Ok(finished_job(id, BuildOutcome::Success, NOW - 1000))
        }));
        let resolver = resolver(adapter.clone());

        let source = StatusSource::new(ProviderKind::Jenkins, "ci", "core");
        let status = resolver.resolve(&source).await.unwrap();

        assert_eq!(status.name, "core");
        assert_eq!(status.signal(), Signal::Success);
        assert_eq!(status.time(), Some(NOW - 1000));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_explicit_name_wins() {
        let adapter = Arc::new(FakeAdapter::new(|id, _| {
            Ok(finished_job(id, BuildOutcome::Error, NOW))
        }));
        let resolver = resolver(adapter);

        let source = StatusSource::new(ProviderKind::Jenkins, "ci", "core").with_name("Core Build");
        let status = resolver.resolve(&source).await.unwrap();
        assert_eq!(status.name, "Core Build");
    }

    #[tokio::test]
    async fn test_unknown_provider_is_config_error() {
        let adapter = Arc::new(FakeAdapter::new(|_, _| Ok(Classified::Unrecognized)));
        let resolver = resolver(adapter.clone());

        let source = StatusSource::new(ProviderKind::Jenkins, "nope", "core");
        let err = resolver.resolve(&source).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("nope"));
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_adapter_is_config_error() {
        let adapter = Arc::new(FakeAdapter::new(|_, _| Ok(Classified::Unrecognized)));
        let resolver = resolver(adapter);

        let source = StatusSource::new(ProviderKind::Travis, "ci", "acme/widgets");
        let err = resolver.resolve(&source).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn test_unrecognized_becomes_provider_error_status() {
        let adapter = Arc::new(FakeAdapter::new(|_, _| Ok(Classified::Unrecognized)));
        let resolver = resolver(adapter);

        let source = StatusSource::new(ProviderKind::Jenkins, "ci", "view");
        let status = resolver.resolve_or_placeholder(&source, None).await;
        assert_eq!(status.error_kind(), Some(ErrorKind::Provider));
        assert_eq!(status.name, "view");
    }

    #[tokio::test]
    async fn test_transport_error_becomes_loading_status() {
        let adapter = Arc::new(FakeAdapter::new(|_, _| {
            Err(ResolveError::loading("connection refused"))
        }));
        let resolver = resolver(adapter);

        let source = StatusSource::new(ProviderKind::Jenkins, "ci", "core");
        let status = resolver.resolve_or_placeholder(&source, None).await;
        assert_eq!(status.error_kind(), Some(ErrorKind::Loading));
        assert_eq!(status.error_message(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_credentials_follow_longest_prefix() {
        let adapter = Arc::new(FakeAdapter::new(|id, _| {
            Ok(finished_job(id, BuildOutcome::Success, NOW))
        }));
        let resolver = resolver(adapter.clone());

        resolver
            .resolve(&StatusSource::new(ProviderKind::Jenkins, "ci", "team-a/core"))
            .await
            .unwrap();
        resolver
            .resolve(&StatusSource::new(ProviderKind::Jenkins, "ci", "other"))
            .await
            .unwrap();

        let requests = adapter.requests();
        let team = requests[0].credentials.as_ref().unwrap();
        assert_eq!(team.username, "team-a");
        assert!(requests[0].with_credentials);

        let other = requests[1].credentials.as_ref().unwrap();
        assert_eq!(other.username, "server-user");
        assert!(!requests[1].with_credentials);
    }

    #[tokio::test]
    async fn test_same_response_resolves_identically() {
        let adapter = Arc::new(FakeAdapter::new(|id, _| {
            Ok(finished_job(id, BuildOutcome::Warn, NOW - 5000))
        }));
        let resolver = resolver(adapter);

        let source = StatusSource::new(ProviderKind::Jenkins, "ci", "core");
        let first = resolver.resolve(&source).await.unwrap();
        let second = resolver.resolve(&source).await.unwrap();
        assert_eq!(first, second);
    }
}
