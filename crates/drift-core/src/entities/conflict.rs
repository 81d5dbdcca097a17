use serde::Serialize;

use super::{Article, Repo};
use crate::enums::StalenessReason;
use crate::identity::{conflict_hash, conflict_signature};

/// The fact that an article is stale with respect to one of its dependencies.
///
/// Borrows the article and repo from the run's
/// [`DependencyGraph`](super::DependencyGraph); it is never persisted as-is.
#[derive(Debug, Clone)]
pub struct DeprecationConflict<'g> {
    pub article: &'g Article,
    pub dependency: &'g Repo,
    pub reason: StalenessReason,
    /// Stable identity: digest of filename, lowercased repo name and latest release name.
    pub conflict_hash: String,
    /// Human-readable description, diagnostic only.
    pub conflict_signature: String,
}

impl<'g> DeprecationConflict<'g> {
    #[must_use]
    pub fn new(article: &'g Article, dependency: &'g Repo, reason: StalenessReason) -> Self {
        let release = &dependency.latest_release.name;
        // Repo names are case-insensitive and the graph keeps whichever casing
        // was declared first, so identity uses the lowercased form.
        let repo = dependency.name.to_lowercase();
        Self {
            article,
            dependency,
            reason,
            conflict_hash: conflict_hash(&article.filename, &repo, release),
            conflict_signature: conflict_signature(&article.filename, &repo, release),
        }
    }

    /// Owned, serializable view for output.
    #[must_use]
    pub fn summary(&self) -> ConflictSummary {
        ConflictSummary {
            hash: self.conflict_hash.clone(),
            signature: self.conflict_signature.clone(),
            article: self.article.filename.clone(),
            repo: self.dependency.name.clone(),
            release: self.dependency.latest_release.name.clone(),
            release_url: self.dependency.latest_release.url.clone(),
            reason: self.reason,
        }
    }
}

/// Flat, owned projection of a [`DeprecationConflict`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictSummary {
    pub hash: String,
    pub signature: String,
    pub article: String,
    pub repo: String,
    pub release: String,
    pub release_url: String,
    pub reason: StalenessReason,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entities::Release;

    fn repo(name: &str) -> Repo {
        Repo {
            owner: "airalab".into(),
            name: name.into(),
            url: format!("https://github.com/airalab/{name}"),
            latest_release: Release {
                name: "v2".into(),
                tag: "v2".into(),
                url: "https://github.com/airalab/robonomics/releases/tag/v2".into(),
                publish_date: None,
            },
        }
    }

    #[test]
    fn identity_ignores_repo_name_casing() {
        let article = Article {
            filename: "b.md".into(),
            url: "https://example.org/b.md".into(),
            dependencies: Vec::new(),
            contributors: Vec::new(),
            last_modified_date: Utc::now(),
        };
        let upper = repo("Robonomics");
        let lower = repo("robonomics");

        let a = DeprecationConflict::new(&article, &upper, StalenessReason::PublishedAfterEdit);
        let b = DeprecationConflict::new(&article, &lower, StalenessReason::PublishedAfterEdit);

        assert_eq!(a.conflict_hash, b.conflict_hash);
        assert_eq!(a.conflict_signature, "b.md -> robonomics@v2");
    }
}
