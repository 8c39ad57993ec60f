//! Case-insensitive logical identifiers.
//!
//! Logical identifiers (client IDs, resource names, user names) are unique
//! within a family when compared without regard to case.

use std::collections::HashSet;

/// Normalizes an identifier for case-insensitive comparison.
#[must_use]
pub fn normalize(identifier: &str) -> String {
    identifier.to_lowercase()
}

/// Compares two identifiers ignoring case.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

/// A set of logical identifiers compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    normalized: HashSet<String>,
}

impl IdentifierSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identifier. Returns false if an equal identifier was present.
    pub fn insert(&mut self, identifier: &str) -> bool {
        self.normalized.insert(normalize(identifier))
    }

    /// Checks whether the set holds an identifier equal ignoring case.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.normalized.contains(&normalize(identifier))
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for identifier in iter {
            set.insert(identifier);
        }
        set
    }
}
