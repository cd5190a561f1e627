//! Conversation error taxonomy.

use thiserror::Error;

use crate::upstream::UpstreamError;

/// Result type for conversation operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors produced by the conversation service.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Client fault: missing/empty session identifier, empty message with no
    /// attachment, disallowed MIME type, oversized attachment. The message
    /// is safe to return verbatim.
    #[error("{0}")]
    Validation(String),

    /// Operator fault: missing upstream credential at call time. The cause
    /// is logged, never returned to the caller verbatim.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Dependency fault: the upstream call failed.
    #[error(transparent)]
    Upstream(UpstreamError),
}

impl From<UpstreamError> for ChatError {
    fn from(err: UpstreamError) -> Self {
        match err {
            // A missing credential is an operator problem, not an upstream one.
            UpstreamError::MissingCredential => ChatError::Configuration(err.to_string()),
            other => ChatError::Upstream(other),
        }
    }
}
