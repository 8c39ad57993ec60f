//! Pending change inspection.
//!
//! A unit of work exposes its staged mutations as a flat list of
//! [`ChangeEntry`] values, one per root row and one per relation row.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a tracked row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    /// Staged for insertion.
    Added,
    /// Loaded and changed.
    Modified,
    /// Staged for deletion.
    Deleted,
    /// Loaded and not changed.
    Unchanged,
    /// Not tracked by the unit of work.
    Detached,
}

impl EntityState {
    /// Returns true if committing would write this row.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Added | Self::Modified | Self::Deleted)
    }
}

/// One tracked row and its lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    /// Row type name (e.g. "Client", "ClientSecret").
    pub entity_type: &'static str,
    /// Surrogate key of the row.
    pub key: Uuid,
    /// Owning root row, for relation rows.
    pub parent: Option<Uuid>,
    /// Logical identifier, for root rows.
    pub identifier: Option<String>,
    /// Lifecycle state.
    pub state: EntityState,
}

impl ChangeEntry {
    /// Creates an entry for a root row.
    #[must_use]
    pub fn root(entity_type: &'static str, key: Uuid, identifier: &str, state: EntityState) -> Self {
        Self {
            entity_type,
            key,
            parent: None,
            identifier: Some(identifier.to_string()),
            state,
        }
    }

    /// Creates an entry for a relation row.
    #[must_use]
    pub const fn relation(
        entity_type: &'static str,
        key: Uuid,
        parent: Uuid,
        state: EntityState,
    ) -> Self {
        Self {
            entity_type,
            key,
            parent: Some(parent),
            identifier: None,
            state,
        }
    }

    /// Returns true if this entry belongs to a relation row.
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        self.parent.is_some()
    }
}
