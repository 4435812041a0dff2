//! Status normalization
//!
//! Turns a [`Classified`] provider response into a canonical [`Status`] and
//! derives the presentation values (progress, age) from raw build data.

use crate::domain::job::{BuildDetails, Classified, MultiJob, SingleJob};
use crate::domain::status::{ErrorKind, LeafStatus, Status};

/// Width of one age bucket
pub const DEFAULT_AGE_INTERVAL_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Highest age bucket
pub const MAX_AGE: u8 = 5;

/// Name candidates of a status source
#[derive(Debug, Clone, Copy)]
pub struct SourceNames<'a> {
    /// Explicit display name override
    pub explicit: Option<&'a str>,
    /// Identifier of the source, used as last resort
    pub source_id: &'a str,
}

impl<'a> SourceNames<'a> {
    pub fn new(explicit: Option<&'a str>, source_id: &'a str) -> Self {
        Self {
            explicit,
            source_id,
        }
    }

    /// Override, then provider name, then source id
    pub fn resolve(&self, provider_name: Option<&str>) -> String {
        self.explicit
            .filter(|name| !name.is_empty())
            .or(provider_name.filter(|name| !name.is_empty()))
            .unwrap_or(self.source_id)
            .to_string()
    }
}

/// Normalizes a classified response into a fresh status
pub fn normalize(classified: Classified, names: &SourceNames<'_>, now_millis: i64) -> Status {
    match classified {
        Classified::Single(job) => normalize_single(job, names, now_millis),
        Classified::Multi(job) => normalize_multi(job, names),
        Classified::Unrecognized => Status::error(
            names.resolve(None),
            None,
            ErrorKind::Provider,
            format!(
                "Unrecognized response for '{}': neither a job nor a folder of jobs",
                names.source_id
            ),
        ),
    }
}

fn normalize_single(job: SingleJob, names: &SourceNames<'_>, now_millis: i64) -> Status {
    let build = job.last_build.unwrap_or_default();
    let leaf = LeafStatus {
        signal: job.outcome.signal(),
        computing: job.computing,
        progress: Some(progress_percent(&build, now_millis)),
        time: build.timestamp,
        health: job.health,
    };

    Status::leaf(names.resolve(job.display_name.as_deref()), job.url, leaf)
}

fn normalize_multi(job: MultiJob, names: &SourceNames<'_>) -> Status {
    let children = job
        .children
        .into_iter()
        .map(|child| Status::pending(child.name, child.url))
        .collect();

    Status::container(names.resolve(job.display_name.as_deref()), job.url, children)
}

/// Progress of a build between 0 (just started) and 100 (finished)
///
/// Builds that are not running or lack timing data report 100. Values
/// outside of `[0, 100]` (clock skew, bad estimate) report 0.
pub fn progress_percent(build: &BuildDetails, now_millis: i64) -> u8 {
    let (Some(timestamp), Some(estimated)) = (build.timestamp, build.estimated_duration) else {
        return 100;
    };
    if !build.building || estimated <= 0 {
        return 100;
    }

    let elapsed = (now_millis - timestamp) as f64;
    let percent = (elapsed * 100.0 / estimated as f64).round();
    if !(0.0..=100.0).contains(&percent) {
        return 0;
    }
    percent as u8
}

/// Age bucket of a finished build, clamped to `[0, MAX_AGE]`
pub fn age_bucket(time_millis: i64, now_millis: i64, interval_millis: i64) -> u8 {
    if interval_millis <= 0 {
        return 0;
    }
    let age = ((now_millis - time_millis) as f64 / interval_millis as f64).round();
    age.clamp(0.0, MAX_AGE as f64) as u8
}
