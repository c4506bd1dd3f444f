//! Import command implementation

use std::path::Path;

use colored::Colorize;

use blueprint_core::{
    Document, Error, ImportOptions, Selector, Strictness, SyncEngine, merge_override,
};

use crate::commands::{load_state, save_state};
use crate::error::{CliError, Result};

/// Run the import command
///
/// A missing schema document aborts before any mutation. Records that
/// the host rejects are collected and reported; every successful save or
/// delete stays committed, and the command fails when any record failed.
#[allow(clippy::too_many_arguments)]
pub fn run_import(
    state: &Path,
    file: &Path,
    override_file: &Path,
    force: bool,
    strict: bool,
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<()> {
    if !file.exists() {
        return Err(Error::DocumentNotFound {
            path: file.to_path_buf(),
        }
        .into());
    }

    let mut document: Document = serde_yaml::from_str(&std::fs::read_to_string(file)?)?;
    if override_file.exists() {
        let override_doc: Document =
            serde_yaml::from_str(&std::fs::read_to_string(override_file)?)?;
        merge_override(&mut document, override_doc);
        tracing::info!("Applied overrides from {}", override_file.display());
    }

    let mut host = load_state(state)?;
    if host.is_empty() {
        tracing::info!("State file holds no records, importing into an empty instance");
    }
    let options = ImportOptions {
        force,
        strictness: if strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        },
        selector: Selector::from_lists(include, exclude),
    };

    let engine = SyncEngine::new();
    let report = engine.import(&mut host, &document, &options);

    // Prior successful mutations stay committed even when later records
    // failed, so the state is written back either way.
    save_state(state, &host)?;

    for action in &report.actions {
        println!("{} {}", "->".blue().bold(), action);
    }
    for warning in &report.warnings {
        println!("{} {}", "WARNING".yellow().bold(), warning);
    }
    for failure in &report.failures {
        println!(
            "{} {}: {}",
            "FAILED".red().bold(),
            failure.handle.cyan(),
            failure.reason
        );
    }

    if report.success {
        println!(
            "{} Loaded schema from {}",
            "OK".green().bold(),
            file.display().to_string().cyan()
        );
        Ok(())
    } else {
        Err(CliError::ImportFailed {
            failed: report.failures.len(),
        })
    }
}
