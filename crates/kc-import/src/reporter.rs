//! Change-delta reporting.
//!
//! Turns the store's pending change set into report counts for one
//! entity family and its relation types.

use kc_storage::{ChangeEntry, EntityState};
use tracing::trace;

use crate::error::{ImportError, ImportOutcome};
use crate::result::ImportResultItem;

/// Counts pending changes of a root type and its relation types.
#[derive(Debug, Clone)]
pub struct ChangeReporter {
    root: &'static str,
    relations: Vec<&'static str>,
}

impl ChangeReporter {
    /// Creates a reporter for a root type.
    #[must_use]
    pub const fn new(root: &'static str) -> Self {
        Self {
            root,
            relations: Vec::new(),
        }
    }

    /// Adds a relation type to count.
    #[must_use]
    pub fn with_relation(mut self, relation: &'static str) -> Self {
        self.relations.push(relation);
        self
    }

    /// Returns true if entries of this type are counted.
    #[must_use]
    pub fn is_interesting(&self, entity_type: &str) -> bool {
        entity_type == self.root || self.relations.iter().any(|r| *r == entity_type)
    }

    /// Applies pending changes to `item`.
    ///
    /// Root entries count towards `item`, relation entries towards the
    /// child named after their type. `replace` sees every interesting
    /// entry first and may account for it itself by returning `true`.
    ///
    /// ## Errors
    ///
    /// Returns `ImportError::UnsupportedState` for detached entries.
    pub fn report<F>(&self, changes: &[ChangeEntry], item: &mut ImportResultItem, mut replace: F) -> ImportOutcome<()>
    where
        F: FnMut(&ChangeEntry, &mut ImportResultItem) -> bool,
    {
        for entry in changes.iter().filter(|e| self.is_interesting(e.entity_type)) {
            if replace(entry, item) {
                trace!(entity_type = entry.entity_type, key = %entry.key, "change replaced");
                continue;
            }

            let target = if entry.entity_type == self.root {
                &mut *item
            } else {
                item.child_mut(entry.entity_type)
            };

            match entry.state {
                EntityState::Added => target.record_adds(1),
                EntityState::Deleted => target.record_deletes(1),
                EntityState::Modified => target.record_updates(1),
                EntityState::Unchanged => {}
                EntityState::Detached => {
                    return Err(ImportError::UnsupportedState {
                        entity_type: entry.entity_type,
                        state: entry.state,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn reporter() -> ChangeReporter {
        ChangeReporter::new("Client").with_relation("ClientSecret")
    }

    fn root(state: EntityState) -> ChangeEntry {
        ChangeEntry::root("Client", Uuid::now_v7(), "web", state)
    }

    fn secret(parent: Uuid, state: EntityState) -> ChangeEntry {
        ChangeEntry::relation("ClientSecret", Uuid::now_v7(), parent, state)
    }

    #[test]
    fn counts_states_per_type() {
        let parent = Uuid::now_v7();
        let changes = vec![
            root(EntityState::Added),
            root(EntityState::Modified),
            root(EntityState::Unchanged),
            secret(parent, EntityState::Added),
            secret(parent, EntityState::Deleted),
            ChangeEntry::root("ApiScope", Uuid::now_v7(), "read", EntityState::Added),
        ];
        let mut item = ImportResultItem::new(2);
        item.children
            .insert("ClientSecret".to_string(), ImportResultItem::new(1));

        reporter().report(&changes, &mut item, |_, _| false).unwrap();

        assert_eq!((item.adds, item.updates, item.deletes, item.after), (1, 1, 0, 3));
        let secrets = item.child("ClientSecret").unwrap();
        assert_eq!((secrets.adds, secrets.deletes, secrets.after), (1, 1, 1));
        assert!(item.is_balanced());
    }

    #[test]
    fn replaced_entries_are_skipped() {
        let parent = Uuid::now_v7();
        let changes = vec![
            secret(parent, EntityState::Deleted),
            secret(parent, EntityState::Added),
        ];
        let mut item = ImportResultItem::new(0);
        let mut seen = 0;

        reporter()
            .report(&changes, &mut item, |entry, _| {
                seen += 1;
                entry.state == EntityState::Deleted
            })
            .unwrap();

        assert_eq!(seen, 2);
        let secrets = item.child("ClientSecret").unwrap();
        assert_eq!((secrets.adds, secrets.deletes), (1, 0));
    }

    #[test]
    fn detached_entry_is_fatal() {
        let changes = vec![root(EntityState::Detached)];
        let mut item = ImportResultItem::new(0);

        let err = reporter().report(&changes, &mut item, |_, _| false).unwrap_err();

        assert!(err.is_contract_violation());
    }
}
