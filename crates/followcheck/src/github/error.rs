//! GitHub API error types.

use thiserror::Error;

use super::types::RateLimitSnapshot;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The requested resource does not exist (terminal, no retry).
    #[error("not found: {0}")]
    NotFound(String),

    /// The credential was rejected by the server, or the endpoint is
    /// forbidden for the current (possibly anonymous) identity.
    #[error("credential rejected or access forbidden")]
    Unauthorized,

    /// The request quota is exhausted. Carries the snapshot so callers can
    /// display the reset time; never auto-retried.
    #[error("rate limit exceeded, resets at {}", .snapshot.reset_at())]
    RateLimited { snapshot: RateLimitSnapshot },

    /// Network-level or response-decoding failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Unexpected HTTP status with the server's message when parseable.
    #[error("GitHub API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The credential does not look like any known token format. Checked
    /// locally, before any network call.
    #[error("credential is not a recognized GitHub token format")]
    InvalidTokenFormat,
}

impl GitHubError {
    /// Check if this error is a rate limit error.
    #[inline]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
