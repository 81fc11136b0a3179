use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "navpatch",
    about = "Browse a directory tree as if a unified diff had been applied",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with [repository] and [render] tables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every level along a path: listings, then the file body
    Show(ShowArgs),
    /// Print the patched tree outline
    Tree(SourceArgs),
    /// Print per-path addition and deletion counts
    Stats(SourceArgs),
}

/// Where the base tree and the patch come from.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Directory holding the unpatched tree
    pub base: PathBuf,
    /// Unified diff file, or `-` for stdin
    pub patch: String,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(default_value = "/")]
    pub path: String,
}
