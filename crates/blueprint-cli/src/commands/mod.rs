//! Command implementations

mod export;
mod import;
mod types;

pub use export::run_export;
pub use import::run_import;
pub use types::run_types;

use std::path::Path;

use blueprint_core::MemoryHost;

use crate::error::{CliError, Result};

/// Load a live-state snapshot; a missing file is an empty instance.
pub(crate) fn load_state(path: &Path) -> Result<MemoryHost> {
    if !path.exists() {
        return Ok(MemoryHost::new());
    }
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(CliError::from)
}

/// Write a live-state snapshot, creating parent directories as needed.
pub(crate) fn save_state(path: &Path, host: &MemoryHost) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_yaml::to_string(host)?)?;
    Ok(())
}
