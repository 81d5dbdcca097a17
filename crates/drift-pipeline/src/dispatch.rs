//! Notification Dispatcher.
//!
//! Files one issue per pending conflict. Submissions run concurrently and
//! independently: a failed submission is recorded and its ledger row stays
//! pending, so the next run offers it again. Each successful submission is
//! marked done in the ledger as soon as it is joined.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use drift_core::entities::DeprecationConflict;
use drift_core::issue::{IssuePayload, IssueTarget};
use drift_core::ports::{IssueTracker, PortError};
use drift_db::Ledger;
use drift_db::error::DatabaseError;
use serde::Serialize;

use crate::error::PipelineError;
use crate::fan_out_limit;

/// An issue that was filed and recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchedIssue {
    pub hash: String,
    pub signature: String,
    pub issue_url: String,
}

/// A submission that failed; the conflict stays pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchFailure {
    pub hash: String,
    pub signature: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub dispatched: Vec<DispatchedIssue>,
    pub failures: Vec<DispatchFailure>,
}

/// Conflicts whose hash is pending, in detection order, one per hash.
#[must_use]
pub fn select_pending<'a, 'g>(
    conflicts: &'a [DeprecationConflict<'g>],
    pending: &HashSet<String>,
) -> Vec<&'a DeprecationConflict<'g>> {
    let mut seen = HashSet::new();
    conflicts
        .iter()
        .filter(|c| pending.contains(&c.conflict_hash))
        .filter(|c| seen.insert(c.conflict_hash.clone()))
        .collect()
}

/// Submit an issue for every pending conflict and record each success.
///
/// Every submission settles before this returns. Results are reported in
/// detection order.
///
/// # Errors
///
/// Returns [`PipelineError::Ledger`] if marking a row done fails. The batch
/// is still drained first, so no submission is abandoned mid-flight; every
/// issue filed but left unmarked is logged at `error` with its URL.
pub async fn dispatch(
    conflicts: &[DeprecationConflict<'_>],
    pending: &HashSet<String>,
    tracker: Arc<dyn IssueTracker>,
    target: &IssueTarget,
    ledger: &Ledger,
    concurrency: usize,
) -> Result<DispatchOutcome, PipelineError> {
    let started = Instant::now();
    let selected = select_pending(conflicts, pending);
    tracing::info!(pending = selected.len(), "conflicts awaiting action");

    let semaphore = fan_out_limit(concurrency);
    let mut set = tokio::task::JoinSet::new();
    for (idx, conflict) in selected.iter().enumerate() {
        let payload = IssuePayload::for_conflict(conflict, target);
        let tracker = Arc::clone(&tracker);
        let sem = Arc::clone(&semaphore);
        set.spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return (idx, Err(PortError::Transport("dispatch limiter closed".into())));
            };
            (idx, tracker.create_issue(&payload).await)
        });
    }

    let mut results: Vec<Option<Result<String, String>>> = vec![None; selected.len()];
    let mut ledger_error: Option<DatabaseError> = None;
    while let Some(res) = set.join_next().await {
        let (idx, result) = match res {
            Ok(joined) => joined,
            Err(e) => {
                tracing::warn!(%e, "issue submission task failed");
                continue;
            }
        };
        let conflict = selected[idx];
        match result {
            Ok(url) => {
                tracing::info!(
                    hash = %conflict.conflict_hash,
                    url = %url,
                    "issue posted"
                );
                if ledger_error.is_none() {
                    if let Err(e) = ledger.mark_done(&conflict.conflict_hash, Some(&url)).await {
                        tracing::error!(
                            hash = %conflict.conflict_hash,
                            url = %url,
                            %e,
                            "issue posted but not marked done"
                        );
                        ledger_error = Some(e);
                    }
                } else {
                    // Stays pending in the ledger and is filed again next run.
                    tracing::error!(
                        hash = %conflict.conflict_hash,
                        url = %url,
                        "issue posted but not marked done: ledger unavailable"
                    );
                }
                results[idx] = Some(Ok(url));
            }
            Err(error) => {
                tracing::warn!(
                    hash = %conflict.conflict_hash,
                    signature = %conflict.conflict_signature,
                    %error,
                    "issue submission failed"
                );
                results[idx] = Some(Err(error.to_string()));
            }
        }
    }

    if let Some(e) = ledger_error {
        return Err(e.into());
    }

    let mut outcome = DispatchOutcome::default();
    for (conflict, result) in selected.iter().zip(results) {
        let hash = conflict.conflict_hash.clone();
        let signature = conflict.conflict_signature.clone();
        match result {
            Some(Ok(issue_url)) => outcome.dispatched.push(DispatchedIssue {
                hash,
                signature,
                issue_url,
            }),
            Some(Err(error)) => outcome.failures.push(DispatchFailure {
                hash,
                signature,
                error,
            }),
            None => outcome.failures.push(DispatchFailure {
                hash,
                signature,
                error: "submission task did not complete".into(),
            }),
        }
    }

    tracing::info!(
        dispatched = outcome.dispatched.len(),
        failed = outcome.failures.len(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "dispatch complete"
    );
    Ok(outcome)
}
