//! Import store trait.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::change::ChangeEntry;
use crate::entity::Entity;
use crate::error::StorageResult;
use crate::identifier::IdentifierSet;

/// Committed row counts for one entity family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCounts {
    /// Number of root rows.
    pub total: u64,
    /// Number of relation rows per relation type.
    pub relations: BTreeMap<&'static str, u64>,
}

impl EntityCounts {
    /// Returns the committed row count of a relation type.
    #[must_use]
    pub fn relation(&self, name: &str) -> u64 {
        self.relations.get(name).copied().unwrap_or(0)
    }
}

/// A unit of work over the persisted configuration.
///
/// Loaded entities are tracked; staged inserts, updates and deletes stay
/// pending until [`commit`](Self::commit) and are visible through
/// [`pending_changes`](Self::pending_changes) in the meantime.
///
/// A store is used by one pass at a time.
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// Counts committed rows of a family, including its relation rows.
    async fn counts<E: Entity>(&self) -> StorageResult<EntityCounts>;

    /// Loads entities whose identifier is in the set, with relations.
    ///
    /// Returned entities are tracked as unchanged.
    async fn find_by_identifiers<E: Entity>(
        &mut self,
        identifiers: &IdentifierSet,
    ) -> StorageResult<Vec<E>>;

    /// Loads entities whose identifier is not in the set, with relations.
    ///
    /// Returned entities are tracked as unchanged.
    async fn find_excluding<E: Entity>(
        &mut self,
        identifiers: &IdentifierSet,
    ) -> StorageResult<Vec<E>>;

    /// Stages a new entity for insertion.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if the key is already tracked or stored.
    fn stage_insert<E: Entity>(&mut self, entity: E) -> StorageResult<()>;

    /// Stages the new state of a loaded entity.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the entity is neither tracked nor stored.
    fn stage_update<E: Entity>(&mut self, entity: E) -> StorageResult<()>;

    /// Stages an entity for deletion. Relation rows cascade.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the entity is neither tracked nor stored.
    fn stage_delete<E: Entity>(&mut self, entity: &E) -> StorageResult<()>;

    /// Lists every tracked row with its lifecycle state.
    fn pending_changes(&self) -> Vec<ChangeEntry>;

    /// Writes all staged changes as one unit.
    ///
    /// Returns the number of rows written.
    async fn commit(&mut self) -> StorageResult<usize>;

    /// Drops all staged changes.
    fn discard(&mut self);
}
