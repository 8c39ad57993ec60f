//! CLI error types.

use kc_import::ImportError;
use kc_storage::StorageError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Import pass aborted.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// State file could not be loaded into the store.
    #[error("state error: {0}")]
    State(#[from] StorageError),

    /// Models were rejected and the pass was not committed.
    #[error("{0} model(s) rejected; nothing committed (use --force to commit the rest)")]
    Rejected(usize),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
