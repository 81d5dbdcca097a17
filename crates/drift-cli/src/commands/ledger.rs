use anyhow::bail;
use serde::Serialize;

use crate::cli::{GlobalFlags, LedgerCommands};
use crate::context::AppContext;
use crate::output::output;

const DEFAULT_LIMIT: u32 = 50;

#[derive(Serialize)]
struct ActionRequiredChange<'a> {
    hash: &'a str,
    action_required: bool,
}

/// Handle `wikidrift ledger`.
pub async fn handle(
    action: &LedgerCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let ledger = ctx.open_ledger().await?;
    let limit = flags.limit_or(DEFAULT_LIMIT);

    match action {
        LedgerCommands::List => output(&ledger.list(limit).await?, flags.format),
        LedgerCommands::Pending => output(&ledger.pending(limit).await?, flags.format),
        LedgerCommands::Stats => output(&ledger.stats().await?, flags.format),
        LedgerCommands::Show { hash } => match ledger.get(hash).await? {
            Some(row) => output(&row, flags.format),
            None => bail!("no conflict with hash {hash}"),
        },
        LedgerCommands::Exclude { hash } => set_action_required(&ledger, hash, false, flags).await,
        LedgerCommands::Include { hash } => set_action_required(&ledger, hash, true, flags).await,
    }
}

async fn set_action_required(
    ledger: &drift_db::Ledger,
    hash: &str,
    required: bool,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if !ledger.set_action_required(hash, required).await? {
        bail!("no conflict with hash {hash}");
    }
    tracing::info!(hash, required, "updated action_required");
    output(
        &ActionRequiredChange {
            hash,
            action_required: required,
        },
        flags.format,
    )
}
