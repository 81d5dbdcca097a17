//! Run orchestration: map, detect, register, dispatch.

use std::sync::Arc;
use std::time::Instant;

use drift_config::PipelineConfig;
use drift_core::entities::ConflictSummary;
use drift_core::enums::LookupFailurePolicy;
use drift_core::issue::IssueTarget;
use drift_core::ports::{IssueTracker, ReleaseLookup, WikiSource};
use drift_db::Ledger;
use serde::Serialize;

use crate::detect::detect_conflicts;
use crate::dispatch::{DispatchFailure, DispatchOutcome, DispatchedIssue, dispatch, select_pending};
use crate::error::PipelineError;
use crate::mapper::{LookupFailure, map_dependencies};

/// Knobs for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub lookup_failure: LookupFailurePolicy,
    pub lookup_concurrency: usize,
    pub dispatch_concurrency: usize,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for RunOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            lookup_failure: config.lookup_failure,
            lookup_concurrency: config.lookup_concurrency,
            dispatch_concurrency: config.dispatch_concurrency,
            dry_run: config.dry_run,
        }
    }
}

/// Collaborators and state for a run.
pub struct RunContext {
    pub source: Arc<dyn WikiSource>,
    pub lookup: Arc<dyn ReleaseLookup>,
    pub tracker: Arc<dyn IssueTracker>,
    pub ledger: Ledger,
    pub target: IssueTarget,
    pub options: RunOptions,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Conflicts found this run.
    pub detected: usize,
    /// Conflicts registered in the ledger for the first time.
    pub new: usize,
    /// Detected conflicts still awaiting an issue before dispatch.
    pub pending: usize,
    pub dispatched: usize,
    pub failed: usize,
    pub dry_run: bool,
    pub issues: Vec<DispatchedIssue>,
    pub failures: Vec<DispatchFailure>,
    pub lookup_failures: Vec<LookupFailure>,
}

impl RunReport {
    /// No submission failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Conflicts found without touching the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectReport {
    pub conflicts: Vec<ConflictSummary>,
    pub lookup_failures: Vec<LookupFailure>,
}

/// Execute one full run.
///
/// Every detected conflict is registered (one transaction) before any issue
/// is filed. Under `dry_run` the run stops after registration.
///
/// # Errors
///
/// [`PipelineError::Source`] or [`PipelineError::Lookup`] from mapping, and
/// [`PipelineError::Ledger`] when the ledger fails. Failed submissions are
/// reported in [`RunReport::failures`], not as errors.
pub async fn run_pipeline(ctx: &RunContext) -> Result<RunReport, PipelineError> {
    let started = Instant::now();
    let options = ctx.options;

    let mapped = map_dependencies(
        ctx.source.as_ref(),
        Arc::clone(&ctx.lookup),
        options.lookup_failure,
        options.lookup_concurrency,
    )
    .await?;

    let conflicts = detect_conflicts(&mapped.graph);
    let new = ctx.ledger.register_all(&conflicts).await?;
    tracing::info!(new, "registered new conflicts");

    let pending = ctx.ledger.pending_hashes().await?;
    let selected = select_pending(&conflicts, &pending).len();

    let outcome = if options.dry_run {
        tracing::info!(pending = selected, "dry run, no issues filed");
        DispatchOutcome::default()
    } else {
        dispatch(
            &conflicts,
            &pending,
            Arc::clone(&ctx.tracker),
            &ctx.target,
            &ctx.ledger,
            options.dispatch_concurrency,
        )
        .await?
    };

    let report = RunReport {
        detected: conflicts.len(),
        new,
        pending: selected,
        dispatched: outcome.dispatched.len(),
        failed: outcome.failures.len(),
        dry_run: options.dry_run,
        issues: outcome.dispatched,
        failures: outcome.failures,
        lookup_failures: mapped.lookup_failures,
    };
    tracing::info!(
        detected = report.detected,
        new = report.new,
        pending = report.pending,
        dispatched = report.dispatched,
        failed = report.failed,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "run complete"
    );
    Ok(report)
}

/// Map and detect only. Nothing is written and no issue is filed.
///
/// # Errors
///
/// [`PipelineError::Source`] or [`PipelineError::Lookup`] from mapping.
pub async fn preview_conflicts(
    source: &dyn WikiSource,
    lookup: Arc<dyn ReleaseLookup>,
    options: RunOptions,
) -> Result<DetectReport, PipelineError> {
    let mapped = map_dependencies(
        source,
        lookup,
        options.lookup_failure,
        options.lookup_concurrency,
    )
    .await?;
    let conflicts = detect_conflicts(&mapped.graph)
        .iter()
        .map(drift_core::entities::DeprecationConflict::summary)
        .collect();
    Ok(DetectReport {
        conflicts,
        lookup_failures: mapped.lookup_failures,
    })
}
