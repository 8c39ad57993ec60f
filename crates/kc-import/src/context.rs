//! Context importers.
//!
//! A [`ContextImporter`] runs the families of one configuration area, in
//! order, against a single store session and exposes one commit for the
//! whole area.

use kc_core::event::{Event, EventType};
use kc_storage::ImportStore;
use tracing::{info, warn};

use crate::error::ImportOutcome;
use crate::families;
use crate::options::ImportOptions;
use crate::reconciler::PartialImporter;
use crate::result::ImportResult;
use crate::source::ConfigurationSource;

type Importers<S> = Vec<Box<dyn PartialImporter<S>>>;

/// Runs the importers of one configuration area.
pub struct ContextImporter<S: ImportStore + 'static> {
    area: &'static str,
    store: S,
    options: ImportOptions,
    build: fn() -> Importers<S>,
    importers: Option<Importers<S>>,
    summary: Vec<(String, String)>,
}

impl<S: ImportStore + 'static> ContextImporter<S> {
    /// Creates a context importer.
    ///
    /// `build` produces the ordered importer list on first use.
    #[must_use]
    pub const fn new(
        area: &'static str,
        store: S,
        options: ImportOptions,
        build: fn() -> Importers<S>,
    ) -> Self {
        Self {
            area,
            store,
            options,
            build,
            importers: None,
            summary: Vec::new(),
        }
    }

    /// Protocol configuration: identity resources, API scopes, API
    /// resources, clients and identity providers.
    #[must_use]
    pub const fn configuration(store: S, options: ImportOptions) -> Self {
        Self::new("configuration", store, options, families::configuration_importers::<S>)
    }

    /// Local identities: roles and users.
    #[must_use]
    pub const fn identity(store: S, options: ImportOptions) -> Self {
        Self::new("identity", store, options, families::identity_importers::<S>)
    }

    /// Both areas on one session, configuration first.
    #[must_use]
    pub const fn all(store: S, options: ImportOptions) -> Self {
        Self::new("all", store, options, families::all_importers::<S>)
    }

    /// Area name.
    #[must_use]
    pub const fn area(&self) -> &'static str {
        self.area
    }

    /// Options applied to every pass.
    #[must_use]
    pub const fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// The underlying store session.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the importer, returning the store session.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Names of the families handled, in run order.
    pub fn family_names(&mut self) -> Vec<&'static str> {
        self.importers
            .get_or_insert_with(self.build)
            .iter()
            .map(|importer| importer.name())
            .collect()
    }

    /// Runs every importer of the area against `source`.
    ///
    /// Changes stay staged until [`commit`](Self::commit). In verify-only
    /// mode they are measured and then discarded. Changes staged by an
    /// earlier pass that was never committed are discarded first, so each
    /// pass measures and commits against the stored state alone.
    ///
    /// ## Errors
    ///
    /// Returns an error if a section cannot be bound or the store fails;
    /// rejected models are listed in the returned report instead.
    pub async fn import(&mut self, source: &ConfigurationSource) -> ImportOutcome<ImportResult> {
        let stale = self
            .store
            .pending_changes()
            .iter()
            .filter(|change| change.state.is_pending())
            .count();
        if stale > 0 {
            warn!(area = self.area, pending = stale, "discarding uncommitted pass");
            self.store.discard();
            self.summary.clear();
        }

        let importers = self.importers.get_or_insert_with(self.build);
        let mut result = ImportResult::new();

        for importer in importers.iter() {
            if let Err(err) = importer
                .import(source, &mut self.store, &self.options, &mut result)
                .await
            {
                warn!(area = self.area, family = importer.name(), error = %err, "import pass failed");
                self.store.discard();
                Event::builder(EventType::ConfigurationImportError)
                    .failure(err.to_string())
                    .area(self.area)
                    .detail("family", importer.name())
                    .build()
                    .emit();
                return Err(err);
            }
        }

        self.summary = result
            .items
            .iter()
            .filter(|(_, item)| item.has_changes())
            .map(|(name, item)| {
                (
                    name.clone(),
                    format!("+{} ~{} -{}", item.adds, item.updates, item.deletes),
                )
            })
            .collect();

        info!(
            area = self.area,
            families = result.items.len(),
            errors = result.errors.len(),
            verify_only = self.options.verify_only,
            "import pass finished"
        );

        if self.options.verify_only {
            self.store.discard();
            let mut event = Event::builder(EventType::ConfigurationVerified).area(self.area);
            for (name, counts) in &self.summary {
                event = event.detail(name, counts);
            }
            event.build().emit();
        }

        Ok(result)
    }

    /// Flushes staged changes as one unit.
    ///
    /// Returns the number of affected rows; always 0 in verify-only mode.
    ///
    /// ## Errors
    ///
    /// Returns an error if the store rejects the commit; nothing is
    /// applied in that case.
    pub async fn commit(&mut self) -> ImportOutcome<usize> {
        if self.options.verify_only {
            self.store.discard();
            return Ok(0);
        }

        let affected = self.store.commit().await?;
        info!(area = self.area, affected, "configuration committed");

        let mut event = Event::builder(EventType::ConfigurationImported)
            .area(self.area)
            .affected_rows(affected);
        for (name, counts) in std::mem::take(&mut self.summary) {
            event = event.detail(name, counts);
        }
        event.build().emit();

        Ok(affected)
    }
}
