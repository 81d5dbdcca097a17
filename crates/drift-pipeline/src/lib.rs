//! # drift-pipeline
//!
//! One wikidrift run, stage by stage:
//!
//! 1. [`mapper`]: list articles, parse front matter, look up the latest
//!    release of every distinct dependency concurrently
//! 2. [`detect`]: walk the dependency graph and emit stale edges as
//!    conflicts, in article then declaration order
//! 3. register every conflict in the ledger (one transaction)
//! 4. [`dispatch`]: file an issue for each pending conflict concurrently,
//!    marking each ledger row done as soon as its issue exists
//!
//! [`run::run_pipeline`] ties the stages together.

pub mod detect;
pub mod dispatch;
pub mod error;
pub mod mapper;
pub mod run;

pub use detect::{detect_conflicts, is_stale};
pub use dispatch::{DispatchFailure, DispatchOutcome, DispatchedIssue, dispatch};
pub use error::PipelineError;
pub use mapper::{LookupFailure, MappedGraph, map_dependencies};
pub use run::{DetectReport, RunContext, RunOptions, RunReport, preview_conflicts, run_pipeline};

use std::sync::Arc;

use tokio::sync::Semaphore;

/// Semaphore for a fan-out stage; a cap of `0` means unbounded.
pub(crate) fn fan_out_limit(cap: usize) -> Arc<Semaphore> {
    let permits = if cap == 0 { Semaphore::MAX_PERMITS } else { cap };
    Arc::new(Semaphore::new(permits))
}
