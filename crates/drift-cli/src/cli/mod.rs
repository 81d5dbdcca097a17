use clap::Parser;

pub mod commands;
pub mod global;

pub use commands::{Commands, LedgerCommands, RunArgs};
pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `wikidrift` binary.
#[derive(Debug, Parser)]
#[command(
    name = "wikidrift",
    version,
    about = "Flag wiki articles whose dependencies shipped new releases"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max rows for listings
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}
