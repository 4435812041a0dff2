//! Classified job shapes
//!
//! Provider responses are classified into exactly one of these shapes before
//! normalization, so downstream code matches on [`Classified`] instead of
//! probing optional fields.

use serde::{Deserialize, Serialize};

use super::build::BuildOutcome;

/// Result of classifying a provider response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// One buildable unit
    Single(SingleJob),

    /// A grouping of child jobs (folder, multi-branch project)
    Multi(MultiJob),

    /// Neither shape could be recognized
    Unrecognized,
}

/// A single job with its most recent build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleJob {
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub outcome: BuildOutcome,
    /// Whether the job is running right now
    pub computing: bool,
    pub build_count: usize,
    /// Reference used for the second round-trip
    pub last_build_ref: Option<BuildRef>,
    /// Filled in once the last build has been fetched
    pub last_build: Option<BuildDetails>,
    /// Score of the first health report
    pub health: Option<u8>,
}

impl SingleJob {
    /// Attaches the details of the most recent build
    pub fn with_last_build(mut self, build: BuildDetails) -> Self {
        self.last_build = Some(build);
        self
    }
}

/// Reference to a build resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRef {
    pub number: Option<u64>,
    pub url: String,
}

/// Details of a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDetails {
    pub number: Option<u64>,
    pub building: bool,
    /// Start time in epoch millis
    pub timestamp: Option<i64>,
    pub estimated_duration: Option<i64>,
    pub duration: Option<i64>,
}

/// A container of child job references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiJob {
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub children: Vec<ChildRef>,
}

/// Reference to a child job of a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    pub name: String,
    pub url: Option<String>,
    pub color: Option<String>,
}
