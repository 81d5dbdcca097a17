//! Pipeline behaviour: failure policy, concurrency caps, dry runs.

use drift_core::enums::LookupFailurePolicy;
use serde::{Deserialize, Serialize};

const fn default_lookup_concurrency() -> usize {
    8
}

const fn default_dispatch_concurrency() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// What to do when a release lookup fails.
    #[serde(default)]
    pub lookup_failure: LookupFailurePolicy,

    /// Maximum in-flight release lookups. `0` means unbounded.
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,

    /// Maximum in-flight issue submissions. `0` means unbounded.
    #[serde(default = "default_dispatch_concurrency")]
    pub dispatch_concurrency: usize,

    /// Detect and register conflicts but never submit issues.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookup_failure: LookupFailurePolicy::default(),
            lookup_concurrency: default_lookup_concurrency(),
            dispatch_concurrency: default_dispatch_concurrency(),
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = PipelineConfig::default();
        assert_eq!(config.lookup_failure, LookupFailurePolicy::Skip);
        assert_eq!(config.lookup_concurrency, 8);
        assert_eq!(config.dispatch_concurrency, 4);
        assert!(!config.dry_run);
    }
}
