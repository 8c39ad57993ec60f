//! Import options.

use kc_core::SyncConfig;
use serde::{Deserialize, Serialize};

/// Options controlling one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    /// Delete persisted entities that are absent from the import set.
    pub delete_all_others: bool,
    /// Compute and report changes but never commit them.
    pub verify_only: bool,
}

impl ImportOptions {
    /// Creates options with everything disabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delete_all_others: false,
            verify_only: false,
        }
    }

    /// Sets whether absent entities are deleted.
    #[must_use]
    pub const fn with_delete_all_others(mut self, enabled: bool) -> Self {
        self.delete_all_others = enabled;
        self
    }

    /// Sets verify-only mode.
    #[must_use]
    pub const fn with_verify_only(mut self, enabled: bool) -> Self {
        self.verify_only = enabled;
        self
    }
}

/// Unset variables leave the flags off.
impl From<&SyncConfig> for ImportOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            delete_all_others: config.delete_all_others.unwrap_or(false),
            verify_only: config.verify_only.unwrap_or(false),
        }
    }
}
