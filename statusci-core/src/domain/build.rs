//! Build outcome domain types

use serde::{Deserialize, Serialize};

use super::status::Signal;

/// Marker a provider appends to a color while the job is running
const ANIMATED_MARKER: &str = "_anime";

/// Provider-neutral outcome of the most recent build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildOutcome {
    Success,
    Warn,
    Error,
    NotBuilt,
    Aborted,
    Disabled,
    Unknown,
}

impl BuildOutcome {
    /// Maps a Jenkins ball color to an outcome
    ///
    /// Only the leading part of the color is considered, so `red_anime`
    /// still maps to `Error`.
    pub fn from_color(color: Option<&str>) -> Self {
        let Some(color) = color else {
            return BuildOutcome::Unknown;
        };

        const PREFIXES: [(&str, BuildOutcome); 6] = [
            ("red", BuildOutcome::Error),
            ("yellow", BuildOutcome::Warn),
            ("blue", BuildOutcome::Success),
            ("notbuilt", BuildOutcome::NotBuilt),
            ("aborted", BuildOutcome::Aborted),
            ("disabled", BuildOutcome::Disabled),
        ];

        PREFIXES
            .iter()
            .find(|(prefix, _)| color.starts_with(prefix))
            .map(|(_, outcome)| *outcome)
            .unwrap_or(BuildOutcome::Unknown)
    }

    /// Signal shown for a finished build with this outcome
    pub fn signal(self) -> Signal {
        match self {
            BuildOutcome::Success => Signal::Success,
            BuildOutcome::Warn => Signal::Warning,
            BuildOutcome::Error => Signal::Error,
            BuildOutcome::NotBuilt
            | BuildOutcome::Aborted
            | BuildOutcome::Disabled
            | BuildOutcome::Unknown => Signal::Unknown,
        }
    }
}

/// Whether a color marks a currently running job
pub fn is_animated(color: Option<&str>) -> bool {
    color.is_some_and(|c| c.contains(ANIMATED_MARKER))
}
