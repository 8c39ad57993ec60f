//! Sync configuration.
//!
//! Configuration is loaded from environment variables (and an optional
//! `.env` file) with sensible defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default location of the persisted state file.
pub const DEFAULT_STATE_FILE: &str = "kc-state.json";

/// Settings for one configuration sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Configuration files to layer, in order.
    pub sources: Vec<PathBuf>,

    /// Path of the JSON state file backing the store, if set.
    pub state_file: Option<PathBuf>,

    /// Delete persisted entities that are absent from the configuration.
    /// `None` when the variable is unset.
    pub delete_all_others: Option<bool>,

    /// Compute and report deltas without committing. `None` when unset.
    pub verify_only: Option<bool>,

    /// Log filter directive.
    pub log_level: String,
}

impl SyncConfig {
    /// Loads configuration from environment variables.
    ///
    /// Recognised variables: `KC_SYNC_SOURCES` (comma-separated paths),
    /// `KC_SYNC_STATE_FILE`, `KC_SYNC_DELETE_ALL_OTHERS`,
    /// `KC_SYNC_VERIFY_ONLY` and `RUST_LOG`.
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let sources = lookup("KC_SYNC_SOURCES")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        let state_file = lookup("KC_SYNC_STATE_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let delete_all_others = lookup("KC_SYNC_DELETE_ALL_OTHERS").map(|v| parse_flag(&v));
        let verify_only = lookup("KC_SYNC_VERIFY_ONLY").map(|v| parse_flag(&v));

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Self {
            sources,
            state_file,
            delete_all_others,
            verify_only,
            log_level,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            state_file: None,
            delete_all_others: None,
            verify_only: None,
            log_level: "info".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
