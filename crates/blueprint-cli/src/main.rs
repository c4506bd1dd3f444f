//! Blueprint CLI
//!
//! Console commands for exporting a live instance's configuration to a
//! schema document and replaying a document onto an instance.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Export {
            state,
            file,
            include,
            exclude,
        } => commands::run_export(&state, &file, include.as_deref(), exclude.as_deref()),
        Commands::Import {
            state,
            file,
            override_file,
            force,
            strict,
            include,
            exclude,
        } => commands::run_import(
            &state,
            &file,
            &override_file,
            force,
            strict,
            include.as_deref(),
            exclude.as_deref(),
        ),
        Commands::Types => commands::run_types(),
    }
}
