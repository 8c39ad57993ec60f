//! # kc-storage
//!
//! Persistence contract for configuration sync.
//!
//! The importer talks to storage through [`ImportStore`], a unit of work
//! that tracks loaded entities, stages mutations and reports pending
//! changes before they are committed.
//!
//! ## Contents
//!
//! - [`Entity`] / [`Row`] - root entities and their relation rows
//! - [`ChangeEntry`] / [`EntityState`] - pending change inspection
//! - [`IdentifierSet`] - case-insensitive identifier lookups
//! - [`InMemoryDatabase`] - change-tracking store used by the CLI and tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod change;
pub mod entity;
pub mod error;
pub mod identifier;
pub mod memory;
pub mod store;

pub use change::{ChangeEntry, EntityState};
pub use entity::{Entity, RelationDiff, Row};
pub use error::{StorageError, StorageResult};
pub use identifier::IdentifierSet;
pub use memory::{CascadeTiming, InMemoryDatabase, InMemorySession};
pub use store::{EntityCounts, ImportStore};
