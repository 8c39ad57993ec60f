//! Import error types.
//!
//! Rejected models are not errors; they are collected in the report.
//! [`ImportError`] covers failures that abort a pass.

use std::path::PathBuf;

use kc_storage::{EntityState, StorageError};
use thiserror::Error;

/// Errors that abort an import pass.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Configuration could not be read or bound.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The persistence layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A pending change carried a state the reporter cannot account for.
    #[error("unsupported state {state:?} for pending {entity_type}")]
    UnsupportedState {
        /// Row type of the offending entry.
        entity_type: &'static str,
        /// Offending state.
        state: EntityState,
    },
}

impl ImportError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if the pass failed because of a defect rather than input.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::UnsupportedState { .. })
    }
}

impl From<ImportError> for kc_core::Error {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Storage(e) => Self::Storage(e.to_string()),
            ImportError::Configuration(_) | ImportError::Io { .. } => Self::Config(err.to_string()),
            ImportError::UnsupportedState { .. } => Self::Import(err.to_string()),
        }
    }
}

/// Result type for import operations.
pub type ImportOutcome<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_convert() {
        let err: ImportError = StorageError::duplicate("Client", "identifier", "web").into();
        assert!(matches!(err, ImportError::Storage(_)));
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn unsupported_state_is_contract_violation() {
        let err = ImportError::UnsupportedState {
            entity_type: "Client",
            state: EntityState::Detached,
        };
        assert!(err.is_contract_violation());

        let core: kc_core::Error = err.into();
        assert!(matches!(core, kc_core::Error::Import(_)));
    }
}
