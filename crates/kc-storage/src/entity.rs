//! Row and entity contracts.
//!
//! A persisted root [`Entity`] owns zero or more relation collections whose
//! items are [`Row`]s. Stores diff tracked snapshots through these traits to
//! derive pending changes.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::change::{ChangeEntry, EntityState};

/// A relation row owned by a root entity.
pub trait Row: Clone + PartialEq + Send + Sync + 'static {
    /// Row type name, used as the relation bucket in reports.
    const TYPE_NAME: &'static str;

    /// Surrogate key of the row.
    fn row_id(&self) -> Uuid;
}

/// A persisted root entity with its relation collections.
pub trait Entity: Clone + PartialEq + Send + Sync + 'static {
    /// Entity type name (e.g. "Client").
    const TYPE_NAME: &'static str;

    /// Surrogate key.
    fn id(&self) -> Uuid;

    /// Logical identifier used for matching (case-insensitive).
    fn identifier(&self) -> &str;

    /// Copy of the entity with every relation collection emptied.
    ///
    /// Two entities whose scalar views are equal are unchanged at the
    /// root row level.
    #[must_use]
    fn without_relations(&self) -> Self;

    /// Reports relation row changes between two states of the same entity.
    ///
    /// `original` is `None` for an added entity, `current` is `None` for a
    /// deleted one.
    fn diff_relations(original: Option<&Self>, current: Option<&Self>, diff: &mut RelationDiff);

    /// Number of rows per relation type, including empty relations.
    fn relation_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut diff = RelationDiff::new(self.id());
        Self::diff_relations(Some(self), Some(self), &mut diff);
        diff.counts
    }
}

/// Collects relation row changes for one parent entity.
#[derive(Debug)]
pub struct RelationDiff {
    parent: Uuid,
    entries: Vec<ChangeEntry>,
    counts: BTreeMap<&'static str, usize>,
}

impl RelationDiff {
    /// Creates an empty diff for the given parent.
    #[must_use]
    pub fn new(parent: Uuid) -> Self {
        Self {
            parent,
            entries: Vec::new(),
            counts: BTreeMap::new(),
        }
    }

    /// Compares one relation collection of two entity states.
    pub fn compare<E, R: Row>(
        &mut self,
        original: Option<&E>,
        current: Option<&E>,
        rows: impl Fn(&E) -> &[R],
    ) {
        let original = original.map_or(&[][..], |e| rows(e));
        let current = current.map_or(&[][..], |e| rows(e));
        self.rows(original, current);
    }

    /// Compares two versions of a relation collection by row key.
    pub fn rows<R: Row>(&mut self, original: &[R], current: &[R]) {
        *self.counts.entry(R::TYPE_NAME).or_default() += current.len();

        for row in current {
            let state = match original.iter().find(|o| o.row_id() == row.row_id()) {
                None => EntityState::Added,
                Some(before) if before != row => EntityState::Modified,
                Some(_) => EntityState::Unchanged,
            };
            self.entries
                .push(ChangeEntry::relation(R::TYPE_NAME, row.row_id(), self.parent, state));
        }

        for before in original {
            if !current.iter().any(|r| r.row_id() == before.row_id()) {
                self.entries.push(ChangeEntry::relation(
                    R::TYPE_NAME,
                    before.row_id(),
                    self.parent,
                    EntityState::Deleted,
                ));
            }
        }
    }

    /// Consumes the diff, returning the collected entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<ChangeEntry> {
        self.entries
    }
}
