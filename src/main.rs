//! DeltaDsp CLI - Noise Sharpening Filter
//!
//! Command-line interface for the DeltaDsp filter.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use deltadsp::cli::{commands, Cli, Commands};
use deltadsp::Result;

fn main() -> Result<()> {
    // Initialize logger
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    info!("DeltaDsp v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd, cli.verbose),
        None => {
            println!("DeltaDsp v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, verbose: bool) -> Result<()> {
    match cmd {
        Commands::Process {
            input,
            output,
            gain,
            settings,
        } => {
            let settings = commands::load_settings(settings.as_deref(), gain, verbose)?;
            commands::process(&input, &output, settings)
        }
        Commands::Info { input } => commands::show_info(&input),
        Commands::Formats => commands::list_formats(),
    }
}
