//! Relation matching.
//!
//! Pairs the persisted items of a relation collection with the imported
//! ones. Matching runs in two phases:
//!
//! 1. every import item, in order, looks for a partner in the remaining
//!    entity items using the [`Matcher`];
//! 2. import items left over take the remaining entity items positionally.
//!
//! Whatever is still unpaired becomes a pure add or a pure delete.

use kc_storage::identifier::eq_ignore_case;

/// Strategy used to find the entity item matching an import item.
pub enum Matcher<E, I> {
    /// Equal keys, compared exactly first and case-insensitively second.
    Key {
        /// Key of a persisted item.
        entity: fn(&E) -> &str,
        /// Key of an imported item.
        import: fn(&I) -> &str,
    },
    /// Custom equality.
    Predicate(fn(&E, &I) -> bool),
}

impl<E, I> Clone for Matcher<E, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, I> Copy for Matcher<E, I> {}

impl<T> Matcher<T, T> {
    /// Matches items of the same type by key.
    #[must_use]
    pub const fn by_key(key: fn(&T) -> &str) -> Self {
        Self::Key {
            entity: key,
            import: key,
        }
    }
}

impl<E, I> Matcher<E, I> {
    /// A matcher that never pairs items, leaving everything to the
    /// positional phase.
    #[must_use]
    pub fn positional() -> Self {
        Self::Predicate(never)
    }

    /// Finds the position of the entity item matching `item`.
    fn find(&self, pool: &[E], item: &I) -> Option<usize> {
        match self {
            Self::Key { entity, import } => {
                let key = import(item);
                pool.iter()
                    .position(|e| entity(e) == key)
                    .or_else(|| pool.iter().position(|e| eq_ignore_case(entity(e), key)))
            }
            Self::Predicate(matches) => pool.iter().position(|e| matches(e, item)),
        }
    }
}

fn never<E, I>(_: &E, _: &I) -> bool {
    false
}

/// Outcome for one item of a relation collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPair<E, I> {
    /// Paired by the matcher.
    Matched(E, I),
    /// Paired by position after the matcher found nothing.
    Positional(E, I),
    /// Import item with no entity counterpart.
    Added(I),
    /// Entity item with no import counterpart.
    Removed(E),
}

impl<E, I> MatchPair<E, I> {
    /// Splits the pair into its optional sides.
    pub fn into_parts(self) -> (Option<E>, Option<I>) {
        match self {
            Self::Matched(e, i) | Self::Positional(e, i) => (Some(e), Some(i)),
            Self::Added(i) => (None, Some(i)),
            Self::Removed(e) => (Some(e), None),
        }
    }
}

/// Pairs entity items with import items.
///
/// Pairs come out as matched pairs (import order), positional pairs,
/// adds, then removals (entity order). Each entity item is consumed by at
/// most one import item.
pub fn match_items<E, I>(entity_items: Vec<E>, import_items: Vec<I>, matcher: Matcher<E, I>) -> Vec<MatchPair<E, I>> {
    let mut pool = entity_items;
    let mut pairs = Vec::with_capacity(pool.len().max(import_items.len()));
    let mut deferred = Vec::new();

    for item in import_items {
        match matcher.find(&pool, &item) {
            Some(position) => {
                let entity = pool.remove(position);
                pairs.push(MatchPair::Matched(entity, item));
            }
            None => deferred.push(item),
        }
    }

    let mut pool = pool.into_iter();
    for item in deferred {
        match pool.next() {
            Some(entity) => pairs.push(MatchPair::Positional(entity, item)),
            None => pairs.push(MatchPair::Added(item)),
        }
    }

    pairs.extend(pool.map(MatchPair::Removed));
    pairs
}

/// Reconciles a persisted relation collection with its imported version.
///
/// Matched and positional pairs keep the persisted row (and its key) and
/// take the imported content through `copy`; adds take the imported row
/// as is; removals are dropped.
pub fn reconcile_rows<T: Clone>(rows: &mut Vec<T>, import: &[T], matcher: Matcher<T, T>, copy: fn(&mut T, &T)) {
    let current = std::mem::take(rows);

    for pair in match_items(current, import.to_vec(), matcher) {
        match pair {
            MatchPair::Matched(mut row, item) | MatchPair::Positional(mut row, item) => {
                copy(&mut row, &item);
                rows.push(row);
            }
            MatchPair::Added(item) => rows.push(item),
            MatchPair::Removed(_) => {}
        }
    }
}
