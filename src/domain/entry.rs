//! Entry results and photo evidence inputs

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Outcome recorded for a single checklist item within a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryResult {
    Pass,
    Fail,
    Na,
}

/// Photo evidence attached to an entry upsert.
///
/// The three shapes are mutually exclusive so the upsert branching stays
/// exhaustive: either nothing was sent, fresh bytes were sent, or the
/// caller points at a photo that already has a URL.
#[derive(Debug, Clone)]
pub enum PhotoInput {
    /// No photo in this submission; a photo already on record is kept.
    None,
    /// Fresh upload to persist in the photo store.
    Upload { bytes: Vec<u8>, content_type: String },
    /// Reference to an already-stored photo, either an absolute URL or a
    /// root-relative path.
    ExistingUrl(String),
}

impl PhotoInput {
    pub fn is_none(&self) -> bool {
        matches!(self, PhotoInput::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_string_forms() {
        assert_eq!(EntryResult::Pass.as_ref(), "pass");
        assert_eq!(EntryResult::Na.as_ref(), "na");
        assert_eq!("fail".parse::<EntryResult>().unwrap(), EntryResult::Fail);
        assert!("skip".parse::<EntryResult>().is_err());
    }
}
