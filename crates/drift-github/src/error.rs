//! GitHub adapter error types.

use drift_core::ports::PortError;
use thiserror::Error;

/// Errors that can occur when talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status without a more specific mapping.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// 401, or 403 without rate-limit headers.
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// 422: the request body was rejected (unknown label, bad assignee, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// 429, or 403 with `x-ratelimit-remaining: 0`.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Failed to interpret a response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<GithubError> for PortError {
    fn from(error: GithubError) -> Self {
        match error {
            GithubError::NotFound(message) => Self::NotFound(message),
            GithubError::Unauthorized { message, .. } => Self::Unauthorized(message),
            GithubError::Validation(message) => Self::Validation(message),
            GithubError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            GithubError::Parse(message) => Self::InvalidResponse(message),
            e @ (GithubError::Http(_) | GithubError::Api { .. }) => Self::Transport(e.to_string()),
        }
    }
}
