use thiserror::Error;

/// Errors surfaced by the navigate-to engine.
///
/// Only `InvalidArgument` ever reaches callers of the public search entry points;
/// the other variants are absorbed at unit boundaries and logged.
#[derive(Debug, Clone, Error)]
pub enum NavigateToError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index build failed for {path}: {message}")]
    IndexBuild { path: String, message: String },

    #[error("Search was cancelled")]
    Cancelled,

    #[error("Remote host error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl NavigateToError {
    /// True for the expected, silently-absorbed cancellation outcome
    pub fn is_cancellation(&self) -> bool {
        matches!(self, NavigateToError::Cancelled)
    }
}

// Cloneable variants carry messages instead of sources so a single failed
// index build can be handed to every caller awaiting it.
impl From<std::io::Error> for NavigateToError {
    fn from(err: std::io::Error) -> Self {
        NavigateToError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for NavigateToError {
    fn from(err: serde_json::Error) -> Self {
        NavigateToError::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavigateToError>;
