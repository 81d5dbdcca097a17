//! Pipeline error types.

use drift_core::errors::CoreError;
use drift_core::ports::PortError;
use drift_db::error::DatabaseError;
use thiserror::Error;

use crate::mapper::LookupFailure;

/// Errors that end a run. Dispatch failures are not among them; they are
/// collected into the run report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The wiki could not be listed.
    #[error("wiki source failed: {0}")]
    Source(#[source] PortError),

    /// Release lookups failed under the abort policy.
    #[error("{} release lookup(s) failed", failures.len())]
    Lookup { failures: Vec<LookupFailure> },

    /// The ledger is unavailable or rejected a write.
    #[error(transparent)]
    Ledger(#[from] DatabaseError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
