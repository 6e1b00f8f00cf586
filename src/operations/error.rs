//! Error taxonomy for core operations
//!
//! Every failure carries a machine-checkable [`ErrorKind`] next to its
//! human-readable message. Infrastructure failures (store, photo I/O) fold
//! into the `Internal` kind and never leak their underlying text to callers.

use crate::infrastructure::photos::PhotoError;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Stable conflict codes surfaced alongside [`CoreError::Conflict`].
pub mod codes {
    /// An item still has recorded entries.
    pub const HAS_ENTRIES: &str = "HAS_ENTRIES";
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{message}")]
    Conflict {
        message: String,
        code: Option<&'static str>,
    },

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Photo(#[from] PhotoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    InvalidInput,
    InvalidState,
    ValidationFailed,
    Conflict,
    Internal,
}

impl CoreError {
    pub fn not_found(entity: &'static str) -> Self {
        CoreError::NotFound { entity }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CoreError::InvalidInput(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        CoreError::InvalidState(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationFailed(message.into())
    }

    pub fn conflict(message: impl Into<String>, code: Option<&'static str>) -> Self {
        CoreError::Conflict {
            message: message.into(),
            code,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Unauthenticated => ErrorKind::Unauthenticated,
            CoreError::Forbidden => ErrorKind::Forbidden,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::InvalidState(_) => ErrorKind::InvalidState,
            CoreError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            CoreError::Conflict { .. } => ErrorKind::Conflict,
            CoreError::Database(_) => ErrorKind::Internal,
            // Bad uploads are the caller's fault; disk trouble is ours.
            CoreError::Photo(PhotoError::UnsupportedContentType(_))
            | CoreError::Photo(PhotoError::TooLarge) => ErrorKind::InvalidInput,
            CoreError::Photo(PhotoError::Io(_)) => ErrorKind::Internal,
        }
    }

    pub fn conflict_code(&self) -> Option<&'static str> {
        match self {
            CoreError::Conflict { code, .. } => *code,
            _ => None,
        }
    }

    /// Message safe to forward to a caller. Internal failures are logged
    /// here and collapsed to a generic message.
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => {
                tracing::error!(error = %self, "internal error");
                "internal error".to_owned()
            }
            _ => self.to_string(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_by_variant() {
        assert_eq!(CoreError::Forbidden.kind(), ErrorKind::Forbidden);
        assert_eq!(CoreError::not_found("run").kind(), ErrorKind::NotFound);
        assert_eq!(
            CoreError::validation("cannot submit an empty run").kind(),
            ErrorKind::ValidationFailed
        );
        assert_eq!(
            CoreError::Database(DbErr::Custom("boom".into())).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            CoreError::Photo(PhotoError::TooLarge).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn internal_errors_never_leak_details() {
        let err = CoreError::Database(DbErr::Custom("connection refused at 10.0.0.3".into()));
        assert_eq!(err.client_message(), "internal error");

        let err = CoreError::not_found("run");
        assert_eq!(err.client_message(), "run not found");
    }

    #[test]
    fn conflict_codes_are_exposed() {
        let err = CoreError::conflict("item already has recorded entries", Some(codes::HAS_ENTRIES));
        assert_eq!(err.conflict_code(), Some("HAS_ENTRIES"));
        assert_eq!(CoreError::Forbidden.conflict_code(), None);
    }
}
