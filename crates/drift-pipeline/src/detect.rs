//! Conflict Detector.
//!
//! An edge is stale when:
//! - the article pins a release tag and the latest release has another tag, or
//! - nothing is pinned and the latest release was published after the
//!   article's last modification.
//!
//! Releases without a publish date never match the second rule.

use drift_core::entities::{Article, Dependency, DependencyGraph, DeprecationConflict, Repo};
use drift_core::enums::StalenessReason;

/// Why `article`'s dependency on `repo` is stale, or `None` if it is current.
#[must_use]
pub fn is_stale(article: &Article, dependency: &Dependency, repo: &Repo) -> Option<StalenessReason> {
    let latest = &repo.latest_release;
    match &dependency.pinned_tag {
        Some(pinned) => (pinned != &latest.tag).then_some(StalenessReason::PinnedTagOutdated),
        None => latest
            .publish_date
            .filter(|published| *published > article.last_modified_date)
            .map(|_| StalenessReason::PublishedAfterEdit),
    }
}

/// All conflicts in `graph`, ordered by article, then by declaration order
/// within the article.
#[must_use]
pub fn detect_conflicts(graph: &DependencyGraph) -> Vec<DeprecationConflict<'_>> {
    let conflicts: Vec<DeprecationConflict<'_>> = graph
        .articles()
        .iter()
        .flat_map(|article| {
            graph
                .dependencies_of(article)
                .filter_map(move |(dependency, repo)| {
                    is_stale(article, dependency, repo)
                        .map(|reason| DeprecationConflict::new(article, repo, reason))
                })
        })
        .collect();
    tracing::info!(conflicts = conflicts.len(), "detected conflicts");
    conflicts
}
