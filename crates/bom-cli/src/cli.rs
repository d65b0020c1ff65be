//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Bom - generate search queries for impulsive acoustic events and collect audio samples.
#[derive(Debug, Parser)]
#[command(name = "bom")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.bom/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory holding the prompt, the query log and audio
    #[arg(long, global = true, env = "BOM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// KEY=VALUE credential file (default: ./.env)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the data directory and seed the prompt file
    Init,

    /// Generate a new batch of search queries
    Generate(GenerateArgs),

    /// Show previously suggested queries, most recent first
    Recent(RecentArgs),

    /// List logged query batches
    History(HistoryArgs),

    /// Search for candidate videos
    Search(SearchArgs),

    /// Search and download the first usable candidate
    Acquire(AcquireArgs),

    /// Generate queries, then acquire a sample for each
    Run(RunArgs),
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Model identifier (default from config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Do not include previously suggested queries in the prompt
    #[arg(long)]
    pub no_previous: bool,

    /// Maximum previous queries to include
    #[arg(long)]
    pub recent_limit: Option<usize>,
}

/// Arguments for the recent command.
#[derive(Debug, Parser)]
pub struct RecentArgs {
    /// Maximum number of queries
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// Show only the most recent N batches
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Search query text
    pub query: String,

    /// Maximum number of candidates
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the acquire command.
#[derive(Debug, Parser)]
pub struct AcquireArgs {
    /// Search query text
    pub query: String,

    /// Maximum number of candidates to try
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Model identifier (default from config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum number of candidates to try per query
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Process at most N of the generated queries
    #[arg(long)]
    pub max_queries: Option<usize>,

    /// Do not include previously suggested queries in the prompt
    #[arg(long)]
    pub no_previous: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
