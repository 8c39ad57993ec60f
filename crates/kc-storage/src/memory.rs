//! In-memory store with change tracking.
//!
//! [`InMemoryDatabase`] holds committed tables shared by every session.
//! [`InMemorySession`] is one unit of work: it tracks loaded entities,
//! stages mutations and applies them atomically on commit.
//!
//! Suitable for tests and for the file-backed CLI; it does not persist
//! anything by itself.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use uuid::Uuid;

use crate::change::{ChangeEntry, EntityState};
use crate::entity::{Entity, RelationDiff};
use crate::error::{StorageError, StorageResult};
use crate::identifier::IdentifierSet;
use crate::store::{EntityCounts, ImportStore};

/// When relation rows of a deleted entity show up as pending changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadeTiming {
    /// Child rows are removed at commit and never listed as pending.
    #[default]
    OnFlush,
    /// Child rows are listed as deleted as soon as the parent is staged.
    Immediate,
}

// ============================================================================
// Committed tables
// ============================================================================

trait ErasedTable: Send + Sync {
    fn clone_table(&self) -> Box<dyn ErasedTable>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Table<E> {
    rows: BTreeMap<Uuid, E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<E: Entity> Table<E> {
    fn check_unique(&self) -> StorageResult<()> {
        let mut seen = IdentifierSet::new();
        for row in self.rows.values() {
            if !seen.insert(row.identifier()) {
                return Err(StorageError::duplicate(
                    E::TYPE_NAME,
                    "identifier",
                    row.identifier(),
                ));
            }
        }
        Ok(())
    }
}

impl<E: Entity> ErasedTable for Table<E> {
    fn clone_table(&self) -> Box<dyn ErasedTable> {
        Box::new(Self {
            rows: self.rows.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Default)]
struct Tables {
    tables: HashMap<TypeId, Box<dyn ErasedTable>>,
}

impl Clone for Tables {
    fn clone(&self) -> Self {
        Self {
            tables: self
                .tables
                .iter()
                .map(|(key, table)| (*key, table.clone_table()))
                .collect(),
        }
    }
}

impl Tables {
    fn table<E: Entity>(&self) -> Option<&Table<E>> {
        self.tables
            .get(&TypeId::of::<E>())
            .and_then(|t| t.as_any().downcast_ref())
    }

    fn table_mut<E: Entity>(&mut self) -> StorageResult<&mut Table<E>> {
        self.tables
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Table::<E>::default()))
            .as_any_mut()
            .downcast_mut()
            .ok_or_else(|| StorageError::Internal(format!("table type mismatch for {}", E::TYPE_NAME)))
    }
}

/// Committed state shared between sessions.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
    cascade: CascadeTiming,
}

impl InMemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets when cascaded relation deletes become visible.
    #[must_use]
    pub const fn with_cascade_timing(mut self, cascade: CascadeTiming) -> Self {
        self.cascade = cascade;
        self
    }

    /// Returns the configured cascade timing.
    #[must_use]
    pub const fn cascade_timing(&self) -> CascadeTiming {
        self.cascade
    }

    /// Opens a new unit of work.
    #[must_use]
    pub fn session(&self) -> InMemorySession {
        InMemorySession {
            db: self.clone(),
            tracked: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts committed rows directly, bypassing change tracking.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if identifiers collide; nothing is
    /// inserted in that case.
    pub fn seed<E: Entity>(&self, rows: impl IntoIterator<Item = E>) -> StorageResult<()> {
        let guard = self.tables.upgradable_read();
        let mut next = (*guard).clone();
        let table = next.table_mut::<E>()?;
        for row in rows {
            table.rows.insert(row.id(), row);
        }
        table.check_unique()?;

        let mut tables = RwLockUpgradableReadGuard::upgrade(guard);
        *tables = next;
        Ok(())
    }

    /// Returns every committed entity of a family.
    #[must_use]
    pub fn export<E: Entity>(&self) -> Vec<E> {
        self.tables
            .read()
            .table::<E>()
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Looks up a committed entity by logical identifier.
    #[must_use]
    pub fn find<E: Entity>(&self, identifier: &str) -> Option<E> {
        let set: IdentifierSet = std::iter::once(identifier).collect();
        self.tables.read().table::<E>().and_then(|t| {
            t.rows
                .values()
                .find(|row| set.contains(row.identifier()))
                .cloned()
        })
    }

    /// Counts committed rows of a family, including relation rows.
    #[must_use]
    pub fn counts<E: Entity>(&self) -> EntityCounts {
        let tables = self.tables.read();
        let Some(table) = tables.table::<E>() else {
            return EntityCounts::default();
        };

        let mut counts = EntityCounts {
            total: table.rows.len() as u64,
            relations: BTreeMap::new(),
        };
        for row in table.rows.values() {
            for (name, count) in row.relation_counts() {
                *counts.relations.entry(name).or_default() += count as u64;
            }
        }
        counts
    }

    fn committed<E: Entity>(&self, id: Uuid) -> Option<E> {
        self.tables
            .read()
            .table::<E>()
            .and_then(|t| t.rows.get(&id).cloned())
    }

    fn select<E: Entity>(&self, keep: impl Fn(&E) -> bool) -> Vec<E> {
        self.tables
            .read()
            .table::<E>()
            .map(|t| t.rows.values().filter(|row| keep(row)).cloned().collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Change tracking
// ============================================================================

trait TrackedSet: Send + Sync {
    fn changes(&self, cascade: CascadeTiming, out: &mut Vec<ChangeEntry>);
    fn apply(&self, tables: &mut Tables) -> StorageResult<()>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TrackedEntry<E> {
    original: Option<E>,
    current: Option<E>,
}

impl<E: Entity> TrackedEntry<E> {
    fn key(&self) -> Option<Uuid> {
        self.current
            .as_ref()
            .or(self.original.as_ref())
            .map(Entity::id)
    }
}

struct Tracked<E> {
    entries: Vec<TrackedEntry<E>>,
}

impl<E> Default for Tracked<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: Entity> Tracked<E> {
    fn position(&self, id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.key() == Some(id))
    }
}

fn relation_entries<E: Entity>(original: Option<&E>, current: Option<&E>, out: &mut Vec<ChangeEntry>) {
    let Some(parent) = current.or(original).map(Entity::id) else {
        return;
    };
    let mut diff = RelationDiff::new(parent);
    E::diff_relations(original, current, &mut diff);
    out.extend(diff.into_entries());
}

impl<E: Entity> TrackedSet for Tracked<E> {
    fn changes(&self, cascade: CascadeTiming, out: &mut Vec<ChangeEntry>) {
        for entry in &self.entries {
            match (&entry.original, &entry.current) {
                (None, Some(current)) => {
                    out.push(ChangeEntry::root(
                        E::TYPE_NAME,
                        current.id(),
                        current.identifier(),
                        EntityState::Added,
                    ));
                    relation_entries(None, Some(current), out);
                }
                (Some(original), None) => {
                    out.push(ChangeEntry::root(
                        E::TYPE_NAME,
                        original.id(),
                        original.identifier(),
                        EntityState::Deleted,
                    ));
                    if cascade == CascadeTiming::Immediate {
                        relation_entries(Some(original), None, out);
                    }
                }
                (Some(original), Some(current)) => {
                    let state = if original.without_relations() == current.without_relations() {
                        EntityState::Unchanged
                    } else {
                        EntityState::Modified
                    };
                    out.push(ChangeEntry::root(
                        E::TYPE_NAME,
                        current.id(),
                        current.identifier(),
                        state,
                    ));
                    relation_entries(Some(original), Some(current), out);
                }
                (None, None) => {}
            }
        }
    }

    fn apply(&self, tables: &mut Tables) -> StorageResult<()> {
        let table = tables.table_mut::<E>()?;
        for entry in &self.entries {
            match (&entry.original, &entry.current) {
                (_, Some(current)) => {
                    table.rows.insert(current.id(), current.clone());
                }
                (Some(original), None) => {
                    table.rows.remove(&original.id());
                }
                (None, None) => {}
            }
        }
        table.check_unique()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One unit of work against an [`InMemoryDatabase`].
pub struct InMemorySession {
    db: InMemoryDatabase,
    tracked: Vec<Box<dyn TrackedSet>>,
    index: HashMap<TypeId, usize>,
}

impl InMemorySession {
    /// Returns the database this session writes to.
    #[must_use]
    pub const fn database(&self) -> &InMemoryDatabase {
        &self.db
    }

    fn tracked_mut<E: Entity>(&mut self) -> StorageResult<&mut Tracked<E>> {
        let slot = match self.index.get(&TypeId::of::<E>()) {
            Some(slot) => *slot,
            None => {
                self.tracked.push(Box::new(Tracked::<E>::default()));
                let slot = self.tracked.len() - 1;
                self.index.insert(TypeId::of::<E>(), slot);
                slot
            }
        };

        self.tracked[slot]
            .as_any_mut()
            .downcast_mut()
            .ok_or_else(|| StorageError::Internal(format!("tracker type mismatch for {}", E::TYPE_NAME)))
    }

    fn load<E: Entity>(&mut self, keep: impl Fn(&E) -> bool) -> StorageResult<Vec<E>> {
        let committed = self.db.select::<E>(keep);
        let tracked = self.tracked_mut::<E>()?;

        let mut loaded = Vec::with_capacity(committed.len());
        for entity in committed {
            match tracked.position(entity.id()) {
                Some(slot) => {
                    if let Some(current) = &tracked.entries[slot].current {
                        loaded.push(current.clone());
                    }
                }
                None => {
                    tracked.entries.push(TrackedEntry {
                        original: Some(entity.clone()),
                        current: Some(entity.clone()),
                    });
                    loaded.push(entity);
                }
            }
        }
        Ok(loaded)
    }
}

#[async_trait]
impl ImportStore for InMemorySession {
    async fn counts<E: Entity>(&self) -> StorageResult<EntityCounts> {
        Ok(self.db.counts::<E>())
    }

    async fn find_by_identifiers<E: Entity>(
        &mut self,
        identifiers: &IdentifierSet,
    ) -> StorageResult<Vec<E>> {
        self.load(|e: &E| identifiers.contains(e.identifier()))
    }

    async fn find_excluding<E: Entity>(
        &mut self,
        identifiers: &IdentifierSet,
    ) -> StorageResult<Vec<E>> {
        self.load(|e: &E| !identifiers.contains(e.identifier()))
    }

    fn stage_insert<E: Entity>(&mut self, entity: E) -> StorageResult<()> {
        let id = entity.id();
        let stored = self.db.committed::<E>(id).is_some();
        let tracked = self.tracked_mut::<E>()?;

        if stored || tracked.position(id).is_some() {
            return Err(StorageError::duplicate(E::TYPE_NAME, "id", id.to_string()));
        }

        tracked.entries.push(TrackedEntry {
            original: None,
            current: Some(entity),
        });
        Ok(())
    }

    fn stage_update<E: Entity>(&mut self, entity: E) -> StorageResult<()> {
        let id = entity.id();
        let committed = self.db.committed::<E>(id);
        let tracked = self.tracked_mut::<E>()?;

        match tracked.position(id) {
            Some(slot) if tracked.entries[slot].current.is_some() => {
                tracked.entries[slot].current = Some(entity);
                Ok(())
            }
            Some(_) => Err(StorageError::not_found(E::TYPE_NAME, id)),
            None => {
                let original = committed.ok_or_else(|| StorageError::not_found(E::TYPE_NAME, id))?;
                tracked.entries.push(TrackedEntry {
                    original: Some(original),
                    current: Some(entity),
                });
                Ok(())
            }
        }
    }

    fn stage_delete<E: Entity>(&mut self, entity: &E) -> StorageResult<()> {
        let id = entity.id();
        let committed = self.db.committed::<E>(id);
        let tracked = self.tracked_mut::<E>()?;

        match tracked.position(id) {
            Some(slot) if tracked.entries[slot].original.is_none() => {
                tracked.entries.remove(slot);
                Ok(())
            }
            Some(slot) => {
                tracked.entries[slot].current = None;
                Ok(())
            }
            None => {
                let original = committed.ok_or_else(|| StorageError::not_found(E::TYPE_NAME, id))?;
                tracked.entries.push(TrackedEntry {
                    original: Some(original),
                    current: None,
                });
                Ok(())
            }
        }
    }

    fn pending_changes(&self) -> Vec<ChangeEntry> {
        let mut out = Vec::new();
        for set in &self.tracked {
            set.changes(self.db.cascade, &mut out);
        }
        out
    }

    async fn commit(&mut self) -> StorageResult<usize> {
        let affected = self
            .pending_changes()
            .iter()
            .filter(|c| c.state.is_pending())
            .count();

        if affected > 0 {
            let guard = self.db.tables.upgradable_read();
            let mut next = (*guard).clone();
            for set in &self.tracked {
                set.apply(&mut next)?;
            }
            let mut tables = RwLockUpgradableReadGuard::upgrade(guard);
            *tables = next;
        }

        self.discard();
        tracing::debug!(affected, "in-memory session committed");
        Ok(affected)
    }

    fn discard(&mut self) {
        self.tracked.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Row;

    #[derive(Debug, Clone, PartialEq)]
    struct Alias {
        id: Uuid,
        value: String,
    }

    impl Row for Alias {
        const TYPE_NAME: &'static str = "WidgetAlias";

        fn row_id(&self) -> Uuid {
            self.id
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        id: Uuid,
        name: String,
        color: String,
        aliases: Vec<Alias>,
    }

    impl Widget {
        fn new(name: &str, aliases: &[&str]) -> Self {
            Self {
                id: Uuid::now_v7(),
                name: name.to_string(),
                color: "red".to_string(),
                aliases: aliases
                    .iter()
                    .map(|value| Alias {
                        id: Uuid::now_v7(),
                        value: (*value).to_string(),
                    })
                    .collect(),
            }
        }
    }

    impl Entity for Widget {
        const TYPE_NAME: &'static str = "Widget";

        fn id(&self) -> Uuid {
            self.id
        }

        fn identifier(&self) -> &str {
            &self.name
        }

        fn without_relations(&self) -> Self {
            Self {
                aliases: Vec::new(),
                ..self.clone()
            }
        }

        fn diff_relations(original: Option<&Self>, current: Option<&Self>, diff: &mut RelationDiff) {
            diff.compare(original, current, |w| w.aliases.as_slice());
        }
    }

    fn names(set: &[&str]) -> IdentifierSet {
        set.iter().copied().collect()
    }

    fn pending(session: &InMemorySession) -> Vec<(&'static str, EntityState)> {
        session
            .pending_changes()
            .into_iter()
            .filter(|c| c.state.is_pending())
            .map(|c| (c.entity_type, c.state))
            .collect()
    }

    #[tokio::test]
    async fn insert_then_commit_counts_root_and_relation_rows() {
        let db = InMemoryDatabase::new();
        let mut session = db.session();

        session.stage_insert(Widget::new("a", &["x", "y"])).unwrap();
        assert_eq!(pending(&session).len(), 3);

        let affected = session.commit().await.unwrap();
        assert_eq!(affected, 3);

        let counts = db.counts::<Widget>();
        assert_eq!(counts.total, 1);
        assert_eq!(counts.relation("WidgetAlias"), 2);
        assert!(session.pending_changes().is_empty());
    }

    #[tokio::test]
    async fn find_matches_identifiers_ignoring_case() {
        let db = InMemoryDatabase::new();
        db.seed([Widget::new("Alpha", &[]), Widget::new("beta", &[])]).unwrap();
        let mut session = db.session();

        let found: Vec<Widget> = session.find_by_identifiers(&names(&["ALPHA"])).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alpha");

        let others: Vec<Widget> = session.find_excluding(&names(&["alpha"])).await.unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].name, "beta");
    }

    #[tokio::test]
    async fn identical_update_is_unchanged() {
        let db = InMemoryDatabase::new();
        db.seed([Widget::new("a", &["x"])]).unwrap();
        let mut session = db.session();

        let found: Vec<Widget> = session.find_by_identifiers(&names(&["a"])).await.unwrap();
        session.stage_update(found[0].clone()).unwrap();

        assert!(pending(&session).is_empty());
        assert_eq!(session.commit().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn scalar_change_marks_root_modified() {
        let db = InMemoryDatabase::new();
        db.seed([Widget::new("a", &["x"])]).unwrap();
        let mut session = db.session();

        let mut widget: Widget = session
            .find_by_identifiers(&names(&["a"]))
            .await
            .unwrap()
            .remove(0);
        widget.color = "blue".to_string();
        session.stage_update(widget).unwrap();

        assert_eq!(pending(&session), vec![("Widget", EntityState::Modified)]);
        assert_eq!(session.commit().await.unwrap(), 1);
        assert_eq!(db.find::<Widget>("A").unwrap().color, "blue");
    }

    #[tokio::test]
    async fn delete_hides_children_until_flush() {
        let db = InMemoryDatabase::new();
        db.seed([Widget::new("a", &["x", "y"])]).unwrap();
        let mut session = db.session();

        let widget = db.find::<Widget>("a").unwrap();
        session.stage_delete(&widget).unwrap();

        assert_eq!(pending(&session), vec![("Widget", EntityState::Deleted)]);
        assert_eq!(session.commit().await.unwrap(), 1);
        assert_eq!(db.counts::<Widget>(), EntityCounts::default());
    }

    #[tokio::test]
    async fn immediate_cascade_lists_children() {
        let db = InMemoryDatabase::new().with_cascade_timing(CascadeTiming::Immediate);
        db.seed([Widget::new("a", &["x", "y"])]).unwrap();
        let mut session = db.session();

        let widget = db.find::<Widget>("a").unwrap();
        session.stage_delete(&widget).unwrap();

        let states = pending(&session);
        assert_eq!(states.len(), 3);
        assert_eq!(
            states.iter().filter(|(t, _)| *t == "WidgetAlias").count(),
            2
        );
        assert_eq!(session.commit().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn deleting_staged_insert_untracks_it() {
        let db = InMemoryDatabase::new();
        let mut session = db.session();
        let widget = Widget::new("a", &[]);

        session.stage_insert(widget.clone()).unwrap();
        session.stage_delete(&widget).unwrap();

        assert!(session.pending_changes().is_empty());
    }

    #[tokio::test]
    async fn update_of_unknown_entity_is_not_found() {
        let db = InMemoryDatabase::new();
        let mut session = db.session();

        let err = session.stage_update(Widget::new("ghost", &[])).unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn duplicate_identifier_rejects_whole_commit() {
        let db = InMemoryDatabase::new();
        db.seed([Widget::new("a", &[])]).unwrap();
        let mut session = db.session();

        session.stage_insert(Widget::new("b", &[])).unwrap();
        session.stage_insert(Widget::new("A", &[])).unwrap();

        let err = session.commit().await.unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(db.counts::<Widget>().total, 1);
    }

    #[test]
    fn seed_rejects_duplicates_atomically() {
        let db = InMemoryDatabase::new();
        let result = db.seed([Widget::new("a", &[]), Widget::new("A", &[])]);

        assert!(result.unwrap_err().is_duplicate());
        assert!(db.export::<Widget>().is_empty());
    }

    #[tokio::test]
    async fn discard_drops_staged_work() {
        let db = InMemoryDatabase::new();
        let mut session = db.session();

        session.stage_insert(Widget::new("a", &[])).unwrap();
        session.discard();

        assert_eq!(session.commit().await.unwrap(), 0);
        assert!(db.export::<Widget>().is_empty());
    }
}
