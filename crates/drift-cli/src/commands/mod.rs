mod detect;
mod ledger;
mod run;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => run::handle(&args, ctx, flags).await,
        Commands::Detect => detect::handle(ctx, flags).await,
        Commands::Ledger { action } => ledger::handle(&action, ctx, flags).await,
    }
}
