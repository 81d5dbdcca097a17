//! Parser error types.

use thiserror::Error;

/// Content errors found while reading an article.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The front-matter block is not valid YAML.
    #[error("invalid front matter: {0}")]
    InvalidYaml(String),

    /// A dependency declaration has an unexpected shape.
    #[error("malformed dependency declaration: {0}")]
    MalformedDependency(String),

    /// A dependency URL does not point at a repository.
    #[error("not a repository URL: {0}")]
    InvalidRepoUrl(String),
}
