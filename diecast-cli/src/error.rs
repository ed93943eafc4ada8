use thiserror::Error;

use diecast_import::ImportError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// A pass could not start or had to stop
    #[error("{0}")]
    Import(#[from] ImportError),

    /// Settings file error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
