//! Issue payload rendering.
//!
//! Turns a [`DeprecationConflict`] into the title, body, labels and assignees
//! submitted to the issue tracker. The body always ends with the conflict hash
//! so a filed issue can be traced back to its ledger row.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::entities::DeprecationConflict;

/// Where issues are filed and how they are tagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTarget {
    pub owner: String,
    pub repo: String,
    pub labels: Vec<String>,
    /// Assign the article contributors to the issue.
    pub assign_contributors: bool,
}

/// A fully rendered notification, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
}

impl IssuePayload {
    /// Render the notification for `conflict`.
    #[must_use]
    pub fn for_conflict(conflict: &DeprecationConflict<'_>, target: &IssueTarget) -> Self {
        let assignees = if target.assign_contributors {
            conflict.article.contributor_usernames()
        } else {
            Vec::new()
        };
        Self {
            owner: target.owner.clone(),
            repo: target.repo.clone(),
            title: render_title(conflict),
            body: render_body(conflict),
            labels: target.labels.clone(),
            assignees,
        }
    }
}

fn render_title(conflict: &DeprecationConflict<'_>) -> String {
    format!(
        "Article {} is deprecated due to a release \"{}\" in \"{}\".",
        conflict.article.filename, conflict.dependency.latest_release.name, conflict.dependency.name,
    )
}

fn render_body(conflict: &DeprecationConflict<'_>) -> String {
    let article = conflict.article;
    let repo = conflict.dependency;
    let release = &repo.latest_release;

    let mut body = format!(
        "Article [\"{}\"]({}) has been automatically marked as deprecated due to \
         a recent release [\"{}\"]({}) in [\"{}\"]({}).\n\n",
        article.filename, article.url, release.name, release.url, repo.name, repo.url,
    );
    body.push_str("An action has been requested from the article contributors:\n");
    for contributor in &article.contributors {
        let _ = writeln!(body, "- {}", contributor.handle());
    }
    if article.contributors.is_empty() {
        body.push_str("- (no contributors listed)\n");
    }
    let _ = write!(body, "\nDeprecation reference id: {}", conflict.conflict_hash);
    body
}
