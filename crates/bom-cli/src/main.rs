//! bom - generate impulsive-event search queries and acquire audio samples.

use bom_cli::commands;
use bom_cli::{AppContext, Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> bom_cli::Result<()> {
    let cli = Cli::parse();

    // Log to stderr so command output on stdout stays parseable
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let ctx = AppContext::new(config, cli.data_dir.as_deref(), cli.env_file.as_deref())?;

    match cli.command {
        Command::Init => commands::execute_init(&ctx, &formatter).await?,
        Command::Generate(args) => commands::execute_generate(args, &ctx, &formatter).await?,
        Command::Recent(args) => commands::execute_recent(args, &ctx, &formatter).await?,
        Command::History(args) => commands::execute_history(args, &ctx, &formatter).await?,
        Command::Search(args) => commands::execute_search(args, &ctx, &formatter).await?,
        Command::Acquire(args) => commands::execute_acquire(args, &ctx, &formatter).await?,
        Command::Run(args) => commands::execute_run(args, &ctx, &formatter).await?,
    }

    Ok(())
}
