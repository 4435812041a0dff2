//! Travis CI repository DTOs

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::build::BuildOutcome;
use crate::domain::job::{BuildDetails, Classified, SingleJob};

/// Response of `<base>/<owner>/<repo>.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryResponse {
    pub id: Option<u64>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub last_build_id: Option<u64>,
    pub last_build_number: Option<String>,
    pub last_build_status: Option<i64>,
    pub last_build_result: Option<i64>,
    pub last_build_duration: Option<i64>,
    pub last_build_started_at: Option<String>,
    pub last_build_finished_at: Option<String>,
    #[serde(default)]
    pub active: bool,
}

fn parse_millis(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.timestamp_millis())
}

impl RepositoryResponse {
    /// Classifies a repository as a single job
    ///
    /// A payload without a slug is not a repository and stays unrecognized.
    pub fn classify(self) -> Classified {
        let Some(slug) = self.slug else {
            return Classified::Unrecognized;
        };

        let started = parse_millis(self.last_build_started_at.as_deref());
        let finished = parse_millis(self.last_build_finished_at.as_deref());
        let computing = started.is_some() && finished.is_none();

        let outcome = match self.last_build_result {
            Some(0) => BuildOutcome::Success,
            Some(_) => BuildOutcome::Error,
            None => BuildOutcome::Unknown,
        };

        let number = self
            .last_build_number
            .as_deref()
            .and_then(|n| n.parse::<u64>().ok());

        let last_build = self.last_build_id.map(|_| BuildDetails {
            number,
            building: computing,
            timestamp: finished.or(started),
            estimated_duration: None,
            duration: self.last_build_duration.map(|secs| secs.saturating_mul(1000)),
        });

        Classified::Single(SingleJob {
            display_name: Some(slug),
            url: None,
            outcome,
            computing,
            build_count: number.unwrap_or(0) as usize,
            last_build_ref: None,
            last_build,
            health: None,
        })
    }
}
