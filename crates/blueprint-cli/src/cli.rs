//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Blueprint - sync content-platform configuration with a declarative document
#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export the live configuration to a schema document
    Export {
        /// Live-state snapshot to read
        #[arg(long, default_value = "config/state.yml")]
        state: PathBuf,

        /// Schema document to write
        #[arg(short, long, default_value = "config/schema.yml")]
        file: PathBuf,

        /// Comma-separated data types to export
        #[arg(long)]
        include: Option<String>,

        /// Comma-separated data types to skip
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Import a schema document onto the live configuration
    Import {
        /// Live-state snapshot to read and write back
        #[arg(long, default_value = "config/state.yml")]
        state: PathBuf,

        /// Schema document to import
        #[arg(short, long, default_value = "config/schema.yml")]
        file: PathBuf,

        /// Optional document merged over the schema, its values winning
        #[arg(long, default_value = "config/override.yml")]
        override_file: PathBuf,

        /// Delete live records absent from the document
        #[arg(long)]
        force: bool,

        /// Fail a record when one of its references does not resolve,
        /// instead of skipping the reference with a warning
        #[arg(long)]
        strict: bool,

        /// Comma-separated data types to import
        #[arg(long)]
        include: Option<String>,

        /// Comma-separated data types to skip
        #[arg(long)]
        exclude: Option<String>,
    },

    /// List the known data types in processing order
    Types,
}
