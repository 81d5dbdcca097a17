use serde::{Deserialize, Serialize};

use super::Release;

/// A dependency target together with its freshly fetched latest release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub owner: String,
    pub name: String,
    /// Canonical repository URL (`https://github.com/{owner}/{name}`).
    pub url: String,
    pub latest_release: Release,
}

impl Repo {
    /// Identity used to deduplicate lookups within a run: `owner/name`, lowercased.
    #[must_use]
    pub fn key(&self) -> String {
        repo_key(&self.owner, &self.name)
    }
}

/// Build the lookup identity for an `owner/name` pair.
///
/// GitHub treats owner and repository names case-insensitively.
#[must_use]
pub fn repo_key(owner: &str, name: &str) -> String {
    format!("{}/{}", owner.to_lowercase(), name.to_lowercase())
}
