use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dt_cli::commands::{
    archive, dedup, export, import, list, remove, replay, reset, show, stats, status,
};
use dt_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::Status => status::run(&mut out, &config)?,
        Commands::Replay(args) => {
            let summary = replay::run(&mut out, args, &config)?;
            tracing::debug!(events = summary.events, recorded = summary.recorded, "replay finished");
        }
        Commands::List(args) => list::run(&mut out, args, &config)?,
        Commands::Show(args) => show::run(&mut out, args, &config)?,
        Commands::Stats(args) => stats::run(&mut out, args, &config)?,
        Commands::Export => export::run(&mut out, &config)?,
        Commands::Import(args) => import::run(&mut out, args, &config)?,
        Commands::Dedup => {
            dedup::run(&mut out, &config)?;
        }
        Commands::Remove(args) => remove::run(&mut out, args, &config)?,
        Commands::Reset(args) => reset::run(&mut out, args, &config)?,
        Commands::Archive(args) => archive::run(&mut out, args, &config)?,
    }
    out.flush()?;

    Ok(())
}
