use std::sync::Arc;

use anyhow::{Context, bail};
use drift_pipeline::{RunContext, RunOptions, run_pipeline};

use crate::cli::{GlobalFlags, RunArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `wikidrift run`.
///
/// Prints the run report, then fails (exit code 1) if any submission failed.
pub async fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut options = RunOptions::from(&ctx.config.pipeline);
    options.dry_run |= args.dry_run;
    ctx.config.require_run(options.dry_run)?;

    let client = ctx.github();
    let run_ctx = RunContext {
        source: Arc::new(ctx.wiki(client.clone())),
        lookup: Arc::new(client.clone()),
        tracker: Arc::new(client),
        ledger: ctx.open_ledger().await?,
        target: ctx.config.issues.target(),
        options,
    };

    let report = run_pipeline(&run_ctx).await.context("run aborted")?;
    output(&report, flags.format)?;

    if !report.is_success() {
        bail!(
            "{} issue submission(s) failed; they stay pending for the next run",
            report.failed
        );
    }
    Ok(())
}
