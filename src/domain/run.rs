//! Run lifecycle state machine

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Status of a check run.
///
/// A run moves strictly forward: `InProgress -> Submitted -> Reviewed`.
/// No transition returns a run to an earlier state and none skips one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    Submitted,
    Reviewed,
}

impl RunStatus {
    /// Entries can only change while the run is open.
    pub fn editable(self) -> bool {
        matches!(self, RunStatus::InProgress)
    }

    /// Review is allowed once the run has been handed in. A reviewed run
    /// stays reviewable; reviewing again replaces the previous verdict.
    pub fn reviewable(self) -> bool {
        !matches!(self, RunStatus::InProgress)
    }

    pub fn can_transition_to(self, next: RunStatus) -> bool {
        use RunStatus::*;
        matches!(
            (self, next),
            (InProgress, Submitted) | (Submitted, Reviewed) | (Reviewed, Reviewed)
        )
    }

    /// Lenient filter parsing: an unrecognized value means "no filter".
    pub fn parse_filter(raw: Option<&str>) -> Option<RunStatus> {
        raw.and_then(|s| s.parse().ok())
    }
}
