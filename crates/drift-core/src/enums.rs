//! Policy enums for wikidrift.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! so they can be read straight from configuration files and environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// LookupFailurePolicy
// ---------------------------------------------------------------------------

/// What the dependency mapper does when a single release lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailurePolicy {
    /// Log a warning and drop the dependency from every article that declared it.
    #[default]
    Skip,
    /// Fail the mapping stage once every sibling lookup has settled.
    Abort,
}

impl LookupFailurePolicy {
    /// Return the string representation used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for LookupFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StalenessReason
// ---------------------------------------------------------------------------

/// Which rule flagged an article/dependency edge as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalenessReason {
    /// The article pins a release tag that is no longer the latest one.
    PinnedTagOutdated,
    /// The latest release was published after the article was last modified.
    PublishedAfterEdit,
}

impl StalenessReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PinnedTagOutdated => "pinned_tag_outdated",
            Self::PublishedAfterEdit => "published_after_edit",
        }
    }
}

impl fmt::Display for StalenessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_policy_serde_roundtrip() {
        for policy in [LookupFailurePolicy::Skip, LookupFailurePolicy::Abort] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy.as_str()));
            let back: LookupFailurePolicy = serde_json::from_str(&json).unwrap();
            assert_eq!(back, policy);
        }
    }

    #[test]
    fn lookup_policy_defaults_to_skip() {
        assert_eq!(LookupFailurePolicy::default(), LookupFailurePolicy::Skip);
    }

    #[test]
    fn staleness_reason_display() {
        assert_eq!(
            StalenessReason::PinnedTagOutdated.to_string(),
            "pinned_tag_outdated"
        );
        assert_eq!(
            StalenessReason::PublishedAfterEdit.to_string(),
            "published_after_edit"
        );
    }
}
