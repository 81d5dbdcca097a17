//! Port traits for external collaborators.
//!
//! The pipeline depends only on these traits, never on the GitHub adapter
//! directly. Tests substitute in-memory implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{ArticleFile, Release};
use crate::issue::IssuePayload;

/// Failures reported by a collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortError {
    /// The requested resource does not exist (e.g. repo without releases).
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials were missing or rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The remote asked us to slow down.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The remote rejected the request payload.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Network or transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Read-only listing of wiki articles.
#[async_trait]
pub trait WikiSource: Send + Sync {
    /// Fetch every article file under the configured docs directory.
    async fn list_articles(&self) -> Result<Vec<ArticleFile>, PortError>;
}

/// Latest-release lookup for a repository.
#[async_trait]
pub trait ReleaseLookup: Send + Sync {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, PortError>;
}

/// Notification sink that files issues.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Create an issue and return its URL.
    async fn create_issue(&self, issue: &IssuePayload) -> Result<String, PortError>;
}
