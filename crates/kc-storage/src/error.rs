//! Storage error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by an import store while staging or committing.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A staged update or delete names a row that is neither tracked nor committed.
    #[error("{entity_type} {id} is not tracked or stored")]
    NotFound {
        /// Type of entity (e.g., "Client", "ApiResource").
        entity_type: &'static str,
        /// Entity ID.
        id: Uuid,
    },

    /// A staged insert or commit collides on a unique key.
    #[error("{entity_type} {field} '{value}' is already stored")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Field that caused the conflict.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// Table bookkeeping is inconsistent.
    #[error("storage bookkeeping error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Creates a not found error for an entity.
    #[must_use]
    pub const fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity_type,
            field,
            value: value.into(),
        }
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Checks if this is a duplicate error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error() {
        let id = Uuid::now_v7();
        let err = StorageError::not_found("Client", id);

        assert!(err.is_not_found());
        assert!(!err.is_duplicate());
        assert!(err.to_string().contains("Client"));
    }

    #[test]
    fn duplicate_error() {
        let err = StorageError::duplicate("Client", "identifier", "client-1");

        assert!(err.is_duplicate());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("client-1"));
    }
}
