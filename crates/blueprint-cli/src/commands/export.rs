//! Export command implementation

use std::path::Path;

use colored::Colorize;

use blueprint_core::{Selector, SyncEngine};

use crate::commands::load_state;
use crate::error::{CliError, Result};

/// Run the export command
///
/// Reads the live-state snapshot, walks the selected data types, and
/// writes the schema document.
pub fn run_export(
    state: &Path,
    file: &Path,
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<()> {
    if !state.exists() {
        return Err(CliError::user(format!(
            "State file not found: {}",
            state.display()
        )));
    }
    let host = load_state(state)?;
    let selector = Selector::from_lists(include, exclude);

    let engine = SyncEngine::new();
    let result = engine.export(&host, &selector);

    for warning in &result.warnings {
        println!("{} {}", "WARNING".yellow().bold(), warning);
    }

    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file, serde_yaml::to_string(&result.document)?)?;

    println!(
        "{} Exported schema to {}",
        "OK".green().bold(),
        file.display().to_string().cyan()
    );
    Ok(())
}
