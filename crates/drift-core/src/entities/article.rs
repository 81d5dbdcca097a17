use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GithubAccount, RepoId};

/// A raw wiki file as delivered by the wiki source collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFile {
    /// File name within the docs directory (e.g. `getting-started.md`).
    pub name: String,
    /// Raw file content, front matter included.
    pub content: String,
    /// URL the raw content can be downloaded from.
    pub download_url: String,
    /// Date of the latest commit touching the file.
    pub last_modified: DateTime<Utc>,
}

/// An edge from an article to one of its dependency repos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub repo: RepoId,
    /// Release tag the article explicitly documents, if the declared URL pins one.
    pub pinned_tag: Option<String>,
}

/// A wiki page with its resolved dependencies and contributors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub filename: String,
    pub url: String,
    /// Declared dependencies in front-matter order.
    pub dependencies: Vec<Dependency>,
    /// Contributors in declaration order, without duplicates.
    pub contributors: Vec<GithubAccount>,
    pub last_modified_date: DateTime<Utc>,
}

impl Article {
    /// Usernames of all contributors, in declaration order.
    #[must_use]
    pub fn contributor_usernames(&self) -> Vec<String> {
        self.contributors
            .iter()
            .map(|c| c.username.clone())
            .collect()
    }
}
