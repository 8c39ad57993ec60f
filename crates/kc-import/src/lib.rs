//! # kc-import
//!
//! Configuration reconciliation engine.
//!
//! Binds declarative records from a [`ConfigurationSource`], reconciles
//! them family by family against an [`ImportStore`](kc_storage::ImportStore)
//! and reports the resulting inserts, updates and deletes before they are
//! committed.
//!
//! ## Components
//!
//! - [`filter`] - identifier and duplicate filtering
//! - [`matcher`] - two-phase relation matching with positional fallback
//! - [`reconciler`] - per-family reconciliation ([`EntityFamily`], [`EntityImporter`])
//! - [`reporter`] - pending-change accounting
//! - [`context`] - ordered family composition and commit
//! - [`families`] - the built-in entity families
//!
//! ## Example
//!
//! ```no_run
//! use kc_import::{ConfigurationSource, ContextImporter, ImportOptions};
//! use kc_storage::InMemoryDatabase;
//!
//! # async fn run() -> kc_import::ImportOutcome<()> {
//! let db = InMemoryDatabase::new();
//! let source = ConfigurationSource::load_all(["clients.json"])?;
//!
//! let mut importer = ContextImporter::configuration(db.session(), ImportOptions::default());
//! let result = importer.import(&source).await?;
//! if !result.has_errors() {
//!     importer.commit().await?;
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod families;
pub mod filter;
pub mod matcher;
pub mod model;
pub mod options;
pub mod reconciler;
pub mod reporter;
pub mod result;
pub mod source;
pub mod validation;

pub use context::ContextImporter;
pub use error::{ImportError, ImportOutcome};
pub use matcher::{MatchPair, Matcher, match_items, reconcile_rows};
pub use options::ImportOptions;
pub use reconciler::{EntityFamily, EntityImporter, PartialImporter, Relation};
pub use reporter::ChangeReporter;
pub use result::{ImportResult, ImportResultItem};
pub use source::ConfigurationSource;
pub use validation::{ClientConfigurationValidator, ModelValidator};
