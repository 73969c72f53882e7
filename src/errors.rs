use serde::Serialize;
use thiserror::Error;

/// Errors raised by the ambient layers (configuration, snapshots, backends).
#[derive(Error, Debug)]
pub enum GraphScoutError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("snapshot error: {message} (path: {path})")]
    Snapshot { message: String, path: String },

    #[error("vector error: {message}")]
    Vector { message: String },

    #[error("embedding error: {message}")]
    Embedding { message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `GraphScoutError`.
pub type Result<T> = std::result::Result<T, GraphScoutError>;

/// Tagged failure value returned by search operations.
///
/// Search operations never propagate a `GraphScoutError`; backend problems are
/// folded into one of these variants instead.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum SearchFailure {
    #[error("similarity backend is not available; build the vector index first")]
    BackendUnavailable,

    #[error("similarity backend query failed: {message}")]
    BackendQueryFailed { message: String },
}

impl SearchFailure {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BackendUnavailable => "backend_unavailable",
            Self::BackendQueryFailed { .. } => "backend_query_failed",
        }
    }
}

impl From<GraphScoutError> for SearchFailure {
    fn from(err: GraphScoutError) -> Self {
        Self::BackendQueryFailed {
            message: err.to_string(),
        }
    }
}
