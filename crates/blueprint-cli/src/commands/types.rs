//! Types command implementation

use colored::Colorize;

use blueprint_core::SyncEngine;

use crate::error::Result;

/// List the known data types in processing order.
pub fn run_types() -> Result<()> {
    let engine = SyncEngine::new();
    for type_handle in engine.known_types() {
        println!("{}", type_handle.cyan());
    }
    Ok(())
}
