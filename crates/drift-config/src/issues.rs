//! Issue target configuration.

use drift_core::issue::IssueTarget;
use serde::{Deserialize, Serialize};

fn default_labels() -> Vec<String> {
    vec!["deprecation".to_string()]
}

const fn default_assign_contributors() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssuesConfig {
    /// Owner of the repository issues are filed in.
    #[serde(default)]
    pub owner: String,

    /// Repository issues are filed in.
    #[serde(default)]
    pub repo: String,

    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Assign the article contributors to each issue.
    #[serde(default = "default_assign_contributors")]
    pub assign_contributors: bool,
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            labels: default_labels(),
            assign_contributors: default_assign_contributors(),
        }
    }
}

impl IssuesConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty()
    }

    #[must_use]
    pub fn target(&self) -> IssueTarget {
        IssueTarget {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            labels: self.labels.clone(),
            assign_contributors: self.assign_contributors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_label_deprecation() {
        let config = IssuesConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.labels, vec!["deprecation".to_string()]);
        assert!(config.assign_contributors);
    }

    #[test]
    fn target_copies_fields() {
        let config = IssuesConfig {
            owner: "airalab".into(),
            repo: "robonomics-wiki".into(),
            ..Default::default()
        };
        let target = config.target();
        assert_eq!(target.owner, "airalab");
        assert_eq!(target.repo, "robonomics-wiki");
        assert!(target.assign_contributors);
    }
}
