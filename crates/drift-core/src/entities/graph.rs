//! Arena holding one run's articles and repos.
//!
//! Articles refer to repos by [`RepoId`]; conflicts borrow both from the
//! graph, so they cannot outlive the run that produced them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::repo::repo_key;
use super::{Article, Dependency, Repo};
use crate::errors::CoreError;

/// Index of a repo inside a [`DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId(usize);

impl RepoId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    repos: Vec<Repo>,
    articles: Vec<Article>,
    by_key: HashMap<String, RepoId>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a repo, returning the existing id if one with the same
    /// `owner/name` identity is already present.
    pub fn add_repo(&mut self, repo: Repo) -> RepoId {
        let key = repo.key();
        if let Some(id) = self.by_key.get(&key) {
            return *id;
        }
        let id = RepoId(self.repos.len());
        self.repos.push(repo);
        self.by_key.insert(key, id);
        id
    }

    /// Look up a repo id by owner and name.
    #[must_use]
    pub fn repo_id(&self, owner: &str, name: &str) -> Option<RepoId> {
        self.by_key.get(&repo_key(owner, name)).copied()
    }

    /// Append an article. Every dependency must point at a repo already in the graph.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an empty filename and
    /// [`CoreError::UnknownRepo`] for a dangling dependency.
    pub fn add_article(&mut self, article: Article) -> Result<(), CoreError> {
        if article.filename.trim().is_empty() {
            return Err(CoreError::Validation("article filename is empty".into()));
        }
        if let Some(dangling) = article
            .dependencies
            .iter()
            .find(|d| d.repo.index() >= self.repos.len())
        {
            return Err(CoreError::UnknownRepo {
                article: article.filename,
                id: dangling.repo.index(),
            });
        }
        self.articles.push(article);
        Ok(())
    }

    #[must_use]
    pub fn repo(&self, id: RepoId) -> &Repo {
        &self.repos[id.index()]
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    #[must_use]
    pub fn repos(&self) -> &[Repo] {
        &self.repos
    }

    /// Dependencies of `article` paired with their resolved repos, in declaration order.
    pub fn dependencies_of<'g>(
        &'g self,
        article: &'g Article,
    ) -> impl Iterator<Item = (&'g Dependency, &'g Repo)> + 'g {
        article
            .dependencies
            .iter()
            .map(move |dep| (dep, self.repo(dep.repo)))
    }
}
