//! CLI error type

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced at the command boundary
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Something the user asked for cannot be done
    #[error("{0}")]
    User(String),

    /// The import finished but the aggregate result has failures
    #[error("Import finished with {failed} failed record(s)")]
    ImportFailed { failed: usize },

    /// Core engine error
    #[error(transparent)]
    Core(#[from] blueprint_core::Error),

    /// YAML parse or serialize error
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }
}
