use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a repository's latest release, taken at mapping time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Display name of the release. Falls back to the tag when the release is unnamed.
    pub name: String,
    /// Git tag the release points at.
    pub tag: String,
    /// Canonical URL of the release page.
    pub url: String,
    /// `None` for releases that were never published (drafts).
    pub publish_date: Option<DateTime<Utc>>,
}
