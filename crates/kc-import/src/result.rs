//! Import report types.
//!
//! A report holds one [`ImportResultItem`] per entity family, each with
//! nested items per relation type, plus the list of rejected-model errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Row counts for one entity or relation type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResultItem {
    /// Persisted rows before the pass.
    pub before: u64,
    /// Persisted rows after the pass (once committed).
    pub after: u64,
    /// Rows added.
    pub adds: u64,
    /// Rows updated.
    pub updates: u64,
    /// Rows deleted.
    pub deletes: u64,
    /// Counts per relation type.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, ImportResultItem>,
}

impl ImportResultItem {
    /// Creates an item starting from a persisted row count.
    #[must_use]
    pub const fn new(before: u64) -> Self {
        Self {
            before,
            after: before,
            adds: 0,
            updates: 0,
            deletes: 0,
            children: BTreeMap::new(),
        }
    }

    /// Returns the item of a relation type, if reported.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.get(name)
    }

    /// Returns the item of a relation type, creating an empty one if needed.
    pub fn child_mut(&mut self, name: &str) -> &mut Self {
        self.children.entry(name.to_string()).or_default()
    }

    /// Records added rows.
    pub const fn record_adds(&mut self, count: u64) {
        self.adds += count;
        self.after += count;
    }

    /// Records deleted rows.
    pub const fn record_deletes(&mut self, count: u64) {
        self.deletes += count;
        self.after = self.after.saturating_sub(count);
    }

    /// Records updated rows.
    pub const fn record_updates(&mut self, count: u64) {
        self.updates += count;
    }

    /// Returns true if the pass changed anything at this level or below.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.adds + self.updates + self.deletes > 0 || self.children.values().any(Self::has_changes)
    }

    /// Checks `before + adds - deletes == after` here and for every child.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.before + self.adds == self.after + self.deletes
            && self.children.values().all(Self::is_balanced)
    }

    /// Adds the counts of `other` into this item.
    pub fn merge(&mut self, other: &Self) {
        self.before += other.before;
        self.after += other.after;
        self.adds += other.adds;
        self.updates += other.updates;
        self.deletes += other.deletes;
        for (name, child) in &other.children {
            self.child_mut(name).merge(child);
        }
    }
}

/// Report of one or more reconciliation passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Counts per entity family.
    pub items: BTreeMap<String, ImportResultItem>,
    /// Rejected-model messages, in the order they were found.
    pub errors: Vec<String>,
}

impl ImportResult {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the item of an entity family, if reported.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ImportResultItem> {
        self.items.get(name)
    }

    /// Adds the item of an entity family, merging with an existing one.
    pub fn add_item(&mut self, name: &str, item: ImportResultItem) {
        match self.items.get_mut(name) {
            Some(existing) => existing.merge(&item),
            None => {
                self.items.insert(name.to_string(), item);
            }
        }
    }

    /// Records a rejected-model message.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Returns true if any model was rejected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if any family reported a change.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.items.values().any(ImportResultItem::has_changes)
    }

    /// Checks the conservation rule for every reported item.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.items.values().all(ImportResultItem::is_balanced)
    }

    /// Appends another report.
    pub fn merge(&mut self, other: Self) {
        for (name, item) in other.items {
            self.add_item(&name, item);
        }
        self.errors.extend(other.errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_balance() {
        let mut item = ImportResultItem::new(3);
        item.record_adds(2);
        item.record_deletes(4);
        item.record_updates(1);

        assert_eq!(item.after, 1);
        assert!(item.is_balanced());
        assert!(item.has_changes());
    }

    #[test]
    fn unbalanced_child_is_detected() {
        let mut item = ImportResultItem::new(1);
        item.child_mut("ClientSecret").adds = 1;

        assert!(!item.is_balanced());
    }

    #[test]
    fn merge_combines_items_and_errors() {
        let mut first = ImportResult::new();
        let mut item = ImportResultItem::new(0);
        item.record_adds(1);
        first.add_item("Client", item.clone());
        first.add_error("first");

        let mut second = ImportResult::new();
        second.add_item("Client", item);
        second.add_error("second");

        first.merge(second);

        assert_eq!(first.item("Client").map(|i| i.adds), Some(2));
        assert_eq!(first.errors, vec!["first", "second"]);
        assert!(first.is_balanced());
    }

    #[test]
    fn serializes_camel_case_without_empty_children() {
        let json = serde_json::to_value(ImportResultItem::new(2)).unwrap();

        assert_eq!(json["before"], 2);
        assert_eq!(json["after"], 2);
        assert!(json.get("children").is_none());
    }
}
