//! Wiki source location.

use serde::{Deserialize, Serialize};

fn default_docs_dir() -> String {
    "docs/en".to_string()
}

fn default_extension() -> String {
    "md".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WikiConfig {
    /// Owner of the repository hosting the wiki.
    #[serde(default)]
    pub owner: String,

    /// Repository hosting the wiki.
    #[serde(default)]
    pub repo: String,

    /// Directory holding the articles, relative to the repository root.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Only files with this extension are treated as articles.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            docs_dir: default_docs_dir(),
            extension: default_extension(),
        }
    }
}

impl WikiConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty()
    }

    /// Docs directory without leading or trailing slashes.
    #[must_use]
    pub fn docs_path(&self) -> &str {
        self.docs_dir.trim_matches('/')
    }
}
