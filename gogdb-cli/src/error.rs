use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Settings file missing or malformed
    #[error("Config error: {0}")]
    Config(String),

    /// Database open or query failed
    #[error("Database error: {0}")]
    Database(String),

    /// Import aborted
    #[error("Import failed: {0}")]
    Import(#[from] gogdb_import::ImportError),

    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Logger could not be installed
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
