use std::path::PathBuf;

use thiserror::Error;

/// Failure while turning user input (paths, dialog) into a file selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("path does not exist: {}", .0.display())]
    Missing(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single round trip to the inference service.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference service unreachable: {0}")]
    Unreachable(String),

    #[error("inference request timed out")]
    Timeout,

    #[error("inference service returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed inference response: {0}")]
    Malformed(String),

    #[error("inference request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InferenceError::Timeout
        } else if err.is_connect() {
            InferenceError::Unreachable(err.to_string())
        } else if err.is_decode() {
            InferenceError::Malformed(err.to_string())
        } else {
            InferenceError::Request(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("model output was empty after cleaning")]
    EmptyResult,
}

/// Why a single rename pair failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("invalid file name '{0}'")]
    InvalidName(String),

    #[error("target '{}' already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("source '{}' not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("no permission to rename '{}'", .0.display())]
    NoPermission(PathBuf),

    #[error("rename failed: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error("a generate phase is already running")]
    PhaseInProgress,

    #[error("no entry for '{}'", .0.display())]
    UnknownEntry(PathBuf),
}
