use std::sync::Arc;

use anyhow::Context;
use drift_pipeline::{RunOptions, preview_conflicts};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `wikidrift detect`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.config.require_detect()?;

    let client = ctx.github();
    let wiki = ctx.wiki(client.clone());
    let report = preview_conflicts(
        &wiki,
        Arc::new(client),
        RunOptions::from(&ctx.config.pipeline),
    )
    .await
    .context("detection aborted")?;

    if flags.format == crate::cli::OutputFormat::Table {
        output(&report.conflicts, flags.format)?;
        if !report.lookup_failures.is_empty() {
            output(&report.lookup_failures, flags.format)?;
        }
        return Ok(());
    }
    output(&report, flags.format)
}
