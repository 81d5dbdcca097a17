use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect stale articles, register them and file issues for pending ones.
    Run(RunArgs),
    /// Show current conflicts without touching the ledger or filing issues.
    Detect,
    /// Inspect or edit the dedup ledger.
    Ledger {
        #[command(subcommand)]
        action: LedgerCommands,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Register conflicts but do not file issues.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Subcommand)]
pub enum LedgerCommands {
    /// List recently registered conflicts.
    List,
    /// List conflicts still awaiting an issue.
    Pending,
    /// Show one conflict by hash.
    Show { hash: String },
    /// Row counts by state.
    Stats,
    /// Stop filing issues for a conflict.
    Exclude { hash: String },
    /// Resume filing issues for a previously excluded conflict.
    Include { hash: String },
}
