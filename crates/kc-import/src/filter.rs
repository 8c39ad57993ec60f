//! Identifier and duplicate filtering.
//!
//! Runs before reconciliation so later stages only see models with a
//! usable, unique identifier.

use std::collections::{HashMap, HashSet};

use kc_storage::identifier::normalize;
use tracing::warn;

/// How a family identifies its models.
pub struct IdentifierRule<M> {
    /// Family name used in messages (e.g. `Client`).
    pub family: &'static str,
    /// Identifier field name used in messages (e.g. `ClientId`).
    pub field: &'static str,
    /// Extracts the identifier from a model.
    pub identifier: fn(&M) -> Option<&str>,
    /// Accept missing or blank identifiers.
    pub allow_empty: bool,
}

impl<M> IdentifierRule<M> {
    /// Returns the identifier used for matching, or `None` if the model
    /// cannot be identified.
    #[must_use]
    pub fn key<'m>(&self, model: &'m M) -> Option<&'m str> {
        match (self.identifier)(model) {
            Some(value) if self.allow_empty || !value.trim().is_empty() => Some(value),
            None if self.allow_empty => Some(""),
            _ => None,
        }
    }
}

/// Removes models whose identifier is missing or blank.
///
/// One error is recorded per removed model.
pub fn retain_identified<M>(models: &mut Vec<M>, rule: &IdentifierRule<M>, errors: &mut Vec<String>) {
    models.retain(|model| {
        if rule.key(model).is_some() {
            return true;
        }

        let message = match (rule.identifier)(model) {
            None => format!("{}.{} is missing.", rule.family, rule.field),
            Some(value) => format!("{}.{} \"{}\" is blank.", rule.family, rule.field, value),
        };
        warn!(family = rule.family, "{message}");
        errors.push(message);
        false
    });
}

/// Removes every model whose identifier occurs more than once.
///
/// Identifiers are compared case-insensitively. Each offending group is
/// dropped entirely and reported once, quoting its first spelling.
pub fn retain_unique<M>(models: &mut Vec<M>, rule: &IdentifierRule<M>, errors: &mut Vec<String>) {
    let mut groups: HashMap<String, usize> = HashMap::new();
    for model in models.iter() {
        if let Some(key) = rule.key(model) {
            *groups.entry(normalize(key)).or_default() += 1;
        }
    }

    let mut reported = HashSet::new();
    models.retain(|model| {
        let Some(key) = rule.key(model) else {
            return true;
        };
        let normalized = normalize(key);
        let size = groups.get(&normalized).copied().unwrap_or(0);
        if size <= 1 {
            return true;
        }

        if reported.insert(normalized) {
            let duplicates = size - 1;
            let noun = if duplicates == 1 { "duplicate" } else { "duplicates" };
            let message = format!(
                "{}.{} \"{}\" has {} {}.",
                rule.family, rule.field, key, duplicates, noun
            );
            warn!(family = rule.family, "{message}");
            errors.push(message);
        }
        false
    });
}
