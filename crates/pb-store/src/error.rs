use pb_types::PostId;

use crate::traits::Backend;

/// Errors from post store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The identifier does not resolve to any record.
    #[error("post not found: {0}")]
    NotFound(PostId),

    /// The identifier is not well-formed for this backend.
    #[error("invalid post id: {0:?}")]
    InvalidId(String),

    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the operation.
    #[error("database error: {0}")]
    Database(String),

    /// A stored document could not be decoded.
    #[error("corrupt document {key}: {reason}")]
    CorruptDocument { key: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The configured backend was not compiled into this build.
    #[error("store backend {0} is not enabled in this build")]
    BackendDisabled(Backend),
}

impl StoreError {
    /// Returns `true` for failures to reach the backing store at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(err.to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
