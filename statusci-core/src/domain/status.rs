//! Canonical status model
//!
//! A [`Status`] is the single shape every provider response is normalized
//! into. Its body is one of four exclusive variants: not yet resolved, a leaf
//! build, a container of children, or an error placeholder.

use serde::{Deserialize, Serialize, Serializer};

/// Normalized outcome of a completed build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Not resolved yet
    #[default]
    Undefined,
    Success,
    Warning,
    Error,
    Unknown,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Undefined => write!(f, "undefined"),
            Signal::Success => write!(f, "success"),
            Signal::Warning => write!(f, "warning"),
            Signal::Error => write!(f, "error"),
            Signal::Unknown => write!(f, "unknown"),
        }
    }
}

/// Origin of a failed resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No provider or authentication config could be resolved
    Config,

    /// Transport failure or non-success HTTP status
    Loading,

    /// Response matched neither a single job nor a multi job
    Provider,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "CONFIG"),
            ErrorKind::Loading => write!(f, "LOADING"),
            ErrorKind::Provider => write!(f, "PROVIDER"),
        }
    }
}

/// Build-specific state of a leaf status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafStatus {
    pub signal: Signal,
    pub computing: bool,
    /// Only present while `computing`
    pub progress: Option<u8>,
    /// Epoch millis of the last run
    pub time: Option<i64>,
    pub health: Option<u8>,
}

/// The exclusive shapes a status can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusBody {
    Pending,
    Leaf(LeafStatus),
    Container(Vec<Status>),
    Error { kind: ErrorKind, message: String },
}

/// Observable state of one status source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub name: String,
    pub url: Option<String>,
    pub loading: bool,
    pub body: StatusBody,
}

impl Status {
    /// Creates an unresolved placeholder
    pub fn pending(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
            loading: false,
            body: StatusBody::Pending,
        }
    }

    /// Creates a leaf status
    ///
    /// `progress` is dropped unless the leaf is computing.
    pub fn leaf(name: impl Into<String>, url: Option<String>, mut leaf: LeafStatus) -> Self {
        if !leaf.computing {
            leaf.progress = None;
        }
        Self {
            name: name.into(),
            url,
            loading: false,
            body: StatusBody::Leaf(leaf),
        }
    }

    /// Creates a container status
    pub fn container(name: impl Into<String>, url: Option<String>, children: Vec<Status>) -> Self {
        Self {
            name: name.into(),
            url,
            loading: false,
            body: StatusBody::Container(children),
        }
    }

    /// Creates an error placeholder
    pub fn error(
        name: impl Into<String>,
        url: Option<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url,
            loading: false,
            body: StatusBody::Error {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.body, StatusBody::Container(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.body, StatusBody::Pending)
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.body {
            StatusBody::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            StatusBody::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    fn as_leaf(&self) -> Option<&LeafStatus> {
        match &self.body {
            StatusBody::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Signal of a leaf; `Undefined` for any other shape
    pub fn signal(&self) -> Signal {
        self.as_leaf().map(|l| l.signal).unwrap_or_default()
    }

    pub fn computing(&self) -> bool {
        self.as_leaf().is_some_and(|l| l.computing)
    }

    pub fn progress(&self) -> Option<u8> {
        self.as_leaf().and_then(|l| l.progress)
    }

    pub fn time(&self) -> Option<i64> {
        self.as_leaf().and_then(|l| l.time)
    }

    pub fn health(&self) -> Option<u8> {
        self.as_leaf().and_then(|l| l.health)
    }

    pub fn children(&self) -> Option<&[Status]> {
        match &self.body {
            StatusBody::Container(children) => Some(children),
            _ => None,
        }
    }

    /// Age bucket between 0 and 5
    ///
    /// Only defined for finished leaves with a known time.
    pub fn age(&self, now_millis: i64, interval_millis: i64) -> Option<u8> {
        if self.computing() {
            return None;
        }
        self.time()
            .map(|time| crate::normalize::age_bucket(time, now_millis, interval_millis))
    }
}

/// Flat wire view of a status
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusRecord<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<&'a str>,
    // Build fields only exist on leaves
    #[serde(skip_serializing_if = "Option::is_none")]
    computing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signal: Option<Signal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    health: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<&'a [Status]>,
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StatusRecord {
            name: &self.name,
            url: self.url.as_deref(),
            loading: self.loading,
            error: self.error_kind(),
            error_message: self.error_message(),
            computing: self.as_leaf().map(|leaf| leaf.computing),
            progress: self.progress(),
            signal: self.as_leaf().map(|leaf| leaf.signal),
            time: self.time(),
            health: self.health(),
            children: self.children(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_leaf() -> LeafStatus {
        LeafStatus {
            signal: Signal::Success,
            computing: false,
            progress: Some(40),
            time: Some(1_000),
            health: Some(80),
        }
    }

    #[test]
    fn test_leaf_drops_progress_when_not_computing() {
        let status = Status::leaf("job", None, finished_leaf());
        assert_eq!(status.progress(), None);
        assert_eq!(status.signal(), Signal::Success);
        assert_eq!(status.health(), Some(80));
        assert!(status.children().is_none());
        assert!(status.error_kind().is_none());
    }

    #[test]
    fn test_error_placeholder_has_no_build_fields() {
        let status = Status::error("job", None, ErrorKind::Loading, "boom");
        assert_eq!(status.error_kind(), Some(ErrorKind::Loading));
        assert_eq!(status.error_message(), Some("boom"));
        assert_eq!(status.signal(), Signal::Undefined);
        assert!(!status.computing());
        assert_eq!(status.time(), None);
        assert!(status.children().is_none());
    }

    #[test]
    fn test_age_only_for_finished_leaves() {
        let hour = 60 * 60 * 1000;
        let status = Status::leaf("job", None, finished_leaf());
        assert_eq!(status.age(1_000 + 3 * hour, hour), Some(3));

        let mut running = finished_leaf();
        running.computing = true;
        let status = Status::leaf("job", None, running);
        assert_eq!(status.age(1_000 + 3 * hour, hour), None);

        let status = Status::container("multi", None, vec![]);
        assert_eq!(status.age(1_000, hour), None);
    }

    #[test]
    fn test_serializes_flat_record() {
        let status = Status::container(
            "multi",
            Some("http://ci/job/multi".to_string()),
            vec![Status::error("child", None, ErrorKind::Provider, "bad shape")],
        );
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["name"], "multi");
        assert_eq!(json["children"][0]["error"], "PROVIDER");
        assert_eq!(json["children"][0]["errorMessage"], "bad shape");
        assert!(json.get("progress").is_none());
    }

    #[test]
    fn test_build_fields_only_serialized_for_leaves() {
        let container = serde_json::to_value(Status::container("multi", None, vec![])).unwrap();
        assert!(container.get("signal").is_none());
        assert!(container.get("computing").is_none());

        let error = serde_json::to_value(Status::error("job", None, ErrorKind::Config, "no config")).unwrap();
        assert!(error.get("signal").is_none());
        assert!(error.get("computing").is_none());

        let pending = serde_json::to_value(Status::pending("job", None)).unwrap();
        assert!(pending.get("signal").is_none());

        let leaf = serde_json::to_value(Status::leaf("job", None, finished_leaf())).unwrap();
        assert_eq!(leaf["signal"], "SUCCESS");
        assert_eq!(leaf["computing"], false);
        assert_eq!(leaf["time"], 1_000);
    }
}
