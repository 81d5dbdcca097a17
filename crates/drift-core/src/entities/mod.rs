//! Entity structs for the run-scoped dependency graph.
//!
//! Articles, repos and releases are produced fresh on every run and discarded
//! afterwards. Only ledger rows (see `drift-db`) survive across runs.

mod account;
mod article;
mod conflict;
mod graph;
mod release;
mod repo;

pub use account::GithubAccount;
pub use article::{Article, ArticleFile, Dependency};
pub use conflict::{ConflictSummary, DeprecationConflict};
pub use graph::{DependencyGraph, RepoId};
pub use release::Release;
pub use repo::{Repo, repo_key};
