//! Ledger storage location.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".wikidrift/ledger.db".to_string()
}

/// Where the dedup ledger lives. Parent directories are created when the
/// ledger is opened.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Path to the libSQL database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}
