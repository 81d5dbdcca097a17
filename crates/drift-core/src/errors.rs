//! Cross-cutting error types for wikidrift.
//!
//! Domain-specific errors (`DatabaseError`, `GithubError`, `PipelineError`) are
//! defined in their respective crates. Collaborator failures use
//! [`PortError`](crate::ports::PortError).

use thiserror::Error;

/// Errors raised while building or querying the run-scoped dependency graph.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An article referenced a repo that is not part of the graph.
    #[error("Unknown repo id {id} referenced by article {article}")]
    UnknownRepo { article: String, id: usize },

    /// Data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
