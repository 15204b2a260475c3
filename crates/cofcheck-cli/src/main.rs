//! cofcheck CLI - consistency checks for the CURATED-COFs database.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// Exit status for startup and configuration errors.
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = commands::Context::from_cli(&cli).and_then(|ctx| match &cli.command {
        Commands::UniqueDois
        | Commands::UniqueCofIds
        | Commands::UniqueCofNames
        | Commands::DuplicatesMarkedReciprocally
        | Commands::ConsistentPaperIds
        | Commands::MatchCifs => commands::tables::run(&ctx, &cli.command),

        Commands::OverlappingAtoms { files, cutoff } => {
            commands::structures::overlapping_atoms(&ctx, files, *cutoff)
        }

        Commands::UniqueStructures { files, max_atoms } => {
            commands::structures::unique_structures(&ctx, files, *max_atoms)
        }

        Commands::All => commands::suite::run(&ctx),
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
