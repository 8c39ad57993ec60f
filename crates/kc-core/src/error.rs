//! Error handling for Keycloak configuration sync.
//!
//! ## NIST 800-53 Rev5: SI-11 (Error Handling)
//!
//! Error messages are informative for operators without echoing secret
//! material from the imported configuration.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for configuration sync operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence layer error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Import pass aborted on a programming-contract violation.
    #[error("import aborted: {0}")]
    Import(String),

    /// Internal error.
    #[error("internal error")]
    Internal,
}

impl Error {
    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Import(_) | Self::Internal)
    }

    /// Returns whether this error was caused by operator input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
