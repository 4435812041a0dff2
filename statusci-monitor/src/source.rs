//! Status sources
//!
//! A status source names one resource to watch: which provider kind speaks
//! for it, which configured server hosts it and its id on that server.

use serde::{Deserialize, Serialize};

/// Supported provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Jenkins,
    Travis,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Jenkins => write!(f, "jenkins"),
            ProviderKind::Travis => write!(f, "travis"),
        }
    }
}

/// Reference to one watched resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSource {
    pub kind: ProviderKind,
    /// Id of the server config hosting the resource
    pub provider: String,
    /// Resource id on the server, folders separated by `/`
    pub id: String,
    /// Explicit display name
    #[serde(default)]
    pub name: Option<String>,
}

impl StatusSource {
    pub fn new(kind: ProviderKind, provider: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind,
            provider: provider.into(),
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Source of a child job inside this container
    ///
    /// Children inherit kind and provider and never carry a name override.
    pub fn child(&self, child_name: &str) -> Self {
        Self {
            kind: self.kind,
            provider: self.provider.clone(),
            id: format!("{}/{}", self.id.trim_end_matches('/'), child_name),
            name: None,
        }
    }

    /// Name shown before anything is resolved
    pub fn initial_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }
}

impl std::fmt::Display for StatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.provider, self.id)
    }
}
