//! Upstream client error types.

use thiserror::Error;

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Errors that can occur while calling the upstream completion API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream reported an error (non-success status or an error object
    /// in the response body). Carries the upstream-supplied message, or a
    /// generic fallback when none was present.
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    /// The response parsed but lacks `choices[0].message.content`. Distinct
    /// from transport failures in the error taxonomy.
    #[error("unexpected response shape")]
    UnexpectedShape,

    /// The response body was not valid JSON.
    #[error("failed to parse upstream response: {0}")]
    Parse(String),

    /// Network-level failure (connection refused, timeout, DNS). No retry is
    /// performed here; retry policy belongs to the caller.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// No API credential was configured at call time.
    #[error("upstream API credential is not configured")]
    MissingCredential,
}
