//! Resolution errors
//!
//! Every failure of the fetch-and-normalize pipeline is one of three kinds.
//! They never travel past the scheduler: [`ResolveError::into_status`] turns
//! them into a display-safe error placeholder.

use statusci_client::ClientError;
use statusci_core::domain::status::{ErrorKind, Status};
use statusci_core::normalize::SourceNames;
use thiserror::Error;

/// Best known name/url of the resource that failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origin {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Failure while resolving a status source
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No usable configuration for the source
    #[error("{message}")]
    Config { message: String },

    /// Transport failure or non-success HTTP status
    #[error("{message}")]
    Loading { message: String, origin: Origin },

    /// The provider answered with an unexpected payload
    #[error("{message}")]
    Provider { message: String, origin: Origin },
}

impl ResolveError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self::Loading {
            message: message.into(),
            origin: Origin::default(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            origin: Origin::default(),
        }
    }

    /// Attach what is already known about the failing resource
    pub fn with_origin(mut self, name: Option<String>, url: Option<String>) -> Self {
        match &mut self {
            Self::Config { .. } => {}
            Self::Loading { origin, .. } | Self::Provider { origin, .. } => {
                *origin = Origin { name, url };
            }
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Loading { .. } => ErrorKind::Loading,
            Self::Provider { .. } => ErrorKind::Provider,
        }
    }

    fn origin(&self) -> Option<&Origin> {
        match self {
            Self::Config { .. } => None,
            Self::Loading { origin, .. } | Self::Provider { origin, .. } => Some(origin),
        }
    }

    /// Error placeholder for this failure
    ///
    /// Name: override, then the failing resource, then the previous status,
    /// then the source id. Url: failing resource, then previous status.
    pub fn into_status(self, names: &SourceNames<'_>, previous: Option<&Status>) -> Status {
        let origin = self.origin().cloned().unwrap_or_default();
        let previous_name = previous.map(|status| status.name.as_str());

        let name = names
            .explicit
            .filter(|name| !name.is_empty())
            .or(origin.name.as_deref().filter(|name| !name.is_empty()))
            .or(previous_name.filter(|name| !name.is_empty()))
            .unwrap_or(names.source_id)
            .to_string();
        let url = origin
            .url
            .or_else(|| previous.and_then(|status| status.url.clone()));

        Status::error(name, url, self.kind(), self.to_string())
    }
}

impl From<ClientError> for ResolveError {
    /// Undecodable bodies are a contract violation; everything else is a
    /// loading failure
    fn from(err: ClientError) -> Self {
        if err.is_parse_error() {
            Self::provider(err.to_string())
        } else {
            Self::loading(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_kinds() {
        let err: ResolveError = ClientError::api_error(503, "unavailable").into();
        assert_eq!(err.kind(), ErrorKind::Loading);

        let err: ResolveError = ClientError::ParseError("not json".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Provider);

        let err: ResolveError = ClientError::InvalidUrl("::".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Loading);
    }

    #[test]
    fn test_into_status_prefers_origin() {
        let names = SourceNames::new(None, "team/core");
        let previous = Status::pending("Old", Some("http://old".to_string()));
        let status = ResolveError::loading("build fetch failed")
            .with_origin(Some("Core".to_string()), Some("http://ci/job/core".to_string()))
            .into_status(&names, Some(&previous));

        assert_eq!(status.name, "Core");
        assert_eq!(status.url.as_deref(), Some("http://ci/job/core"));
        assert_eq!(status.error_kind(), Some(ErrorKind::Loading));
        assert_eq!(status.error_message(), Some("build fetch failed"));
    }

    #[test]
    fn test_into_status_falls_back() {
        let previous = Status::pending("Old", Some("http://old".to_string()));

        let status = ResolveError::config("no provider")
            .into_status(&SourceNames::new(None, "core"), Some(&previous));
        assert_eq!(status.name, "Old");
        assert_eq!(status.url.as_deref(), Some("http://old"));
        assert_eq!(status.error_kind(), Some(ErrorKind::Config));

        let status = ResolveError::provider("bad").into_status(&SourceNames::new(None, "core"), None);
        assert_eq!(status.name, "core");
        assert!(status.url.is_none());

        let status = ResolveError::provider("bad")
            .with_origin(Some("Core".to_string()), None)
            .into_status(&SourceNames::new(Some("Mine"), "core"), None);
        assert_eq!(status.name, "Mine");
    }
}
