//! Jenkins JSON API DTOs
//!
//! Only the fields needed to classify and normalize a job are modelled.
//! Everything else in the payload is ignored.

use serde::{Deserialize, Serialize};

use crate::domain::build::{BuildOutcome, is_animated};
use crate::domain::job::{BuildDetails, BuildRef, ChildRef, Classified, MultiJob, SingleJob};

/// Response of `<job>/api/json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    /// Present on buildable jobs
    pub builds: Option<Vec<BuildRef>>,
    pub last_build: Option<BuildRef>,
    /// Present on folders and multi-branch projects
    pub jobs: Option<Vec<JobRefResponse>>,
    #[serde(default)]
    pub health_report: Vec<HealthReport>,
}

/// Child entry of a folder job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRefResponse {
    pub name: String,
    pub url: Option<String>,
    pub color: Option<String>,
}

/// One entry of a job's health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub description: Option<String>,
    pub score: Option<i64>,
}

/// Response of `<build>/api/json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResponse {
    pub id: Option<String>,
    pub number: Option<u64>,
    #[serde(default)]
    pub building: bool,
    pub duration: Option<i64>,
    pub estimated_duration: Option<i64>,
    pub timestamp: Option<i64>,
    pub result: Option<String>,
}

impl JobResponse {
    /// Classifies the job by the collections it carries
    ///
    /// `builds` wins over `jobs`; a job with neither is unrecognized.
    pub fn classify(self) -> Classified {
        if let Some(builds) = self.builds {
            let outcome = BuildOutcome::from_color(self.color.as_deref());
            let computing = is_animated(self.color.as_deref());
            let health = self
                .health_report
                .first()
                .and_then(|report| report.score)
                .map(|score| score.clamp(0, 100) as u8);

            return Classified::Single(SingleJob {
                display_name: self.display_name.or(self.name),
                url: self.url,
                outcome,
                computing,
                build_count: builds.len(),
                last_build_ref: self.last_build,
                last_build: None,
                health,
            });
        }

        if let Some(jobs) = self.jobs {
            return Classified::Multi(MultiJob {
                display_name: self.display_name.or(self.name),
                url: self.url,
                children: jobs
                    .into_iter()
                    .map(|job| ChildRef {
                        name: job.name,
                        url: job.url,
                        color: job.color,
                    })
                    .collect(),
            });
        }

        Classified::Unrecognized
    }
}

impl From<BuildResponse> for BuildDetails {
    fn from(build: BuildResponse) -> Self {
        Self {
            number: build.number,
            building: build.building,
            timestamp: build.timestamp,
            estimated_duration: build.estimated_duration,
            duration: build.duration,
        }
    }
}
