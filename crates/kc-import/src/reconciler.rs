//! Entity reconciliation.
//!
//! An [`EntityFamily`] describes one root entity type: how its import
//! models are identified, converted and copied, and which relation
//! collections it owns. [`EntityImporter`] runs the reconciliation pass for
//! a family against an [`ImportStore`].

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use kc_storage::identifier::normalize;
use kc_storage::{Entity, EntityState, IdentifierSet, ImportStore, Row};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ImportOutcome;
use crate::filter::{self, IdentifierRule};
use crate::options::ImportOptions;
use crate::reporter::ChangeReporter;
use crate::result::{ImportResult, ImportResultItem};
use crate::source::{ConfigurationSource, pluralize};
use crate::validation::ModelValidator;

/// One step of a context import.
///
/// Implementations bind their slice of the configuration, stage changes
/// through the store and add their counts to the shared report.
#[async_trait]
pub trait PartialImporter<S: ImportStore>: Send + Sync {
    /// Name of the family handled by this importer.
    fn name(&self) -> &'static str;

    /// Runs the pass for this importer.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration cannot be bound or the store
    /// fails. Rejected models are reported in `result` instead.
    async fn import(
        &self,
        source: &ConfigurationSource,
        store: &mut S,
        options: &ImportOptions,
        result: &mut ImportResult,
    ) -> ImportOutcome<()>;
}

/// A relation collection of a root entity.
pub struct Relation<E> {
    name: &'static str,
    reconcile: fn(&mut E, &E),
}

impl<E> Relation<E> {
    /// Creates a relation over rows of type `R`.
    ///
    /// `reconcile` brings the persisted entity's collection in line with
    /// the imported one, usually through
    /// [`reconcile_rows`](crate::matcher::reconcile_rows).
    #[must_use]
    pub fn of<R: Row>(reconcile: fn(&mut E, &E)) -> Self {
        Self {
            name: R::TYPE_NAME,
            reconcile,
        }
    }

    /// Row type name of the relation.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Description of one entity family.
pub struct EntityFamily<M, E> {
    rule: IdentifierRule<M>,
    section: String,
    to_entity: fn(&M) -> E,
    copy_scalars: fn(&mut E, &E),
    relations: Vec<Relation<E>>,
    validator: Option<Box<dyn ModelValidator<M>>>,
}

impl<M, E: Entity> EntityFamily<M, E> {
    /// Creates a family.
    ///
    /// * `field` - identifier field name used in messages
    /// * `identifier` - extracts the identifier from an import model
    /// * `to_entity` - converts an import model to a fresh entity
    /// * `copy_scalars` - copies every scalar field except the surrogate key
    ///   and timestamps onto a persisted entity
    #[must_use]
    pub fn new(
        field: &'static str,
        identifier: fn(&M) -> Option<&str>,
        to_entity: fn(&M) -> E,
        copy_scalars: fn(&mut E, &E),
    ) -> Self {
        Self {
            rule: IdentifierRule {
                family: E::TYPE_NAME,
                field,
                identifier,
                allow_empty: false,
            },
            section: pluralize(E::TYPE_NAME),
            to_entity,
            copy_scalars,
            relations: Vec::new(),
            validator: None,
        }
    }

    /// Overrides the configuration section name.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// Accepts models with a missing or blank identifier.
    #[must_use]
    pub fn allow_empty_identifier(mut self) -> Self {
        self.rule.allow_empty = true;
        self
    }

    /// Adds a relation collection.
    #[must_use]
    pub fn with_relation(mut self, relation: Relation<E>) -> Self {
        self.relations.push(relation);
        self
    }

    /// Sets the domain validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl ModelValidator<M> + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Family name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        E::TYPE_NAME
    }

    /// Configuration section bound by the family.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Row type names of the family's relations.
    pub fn relation_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.relations.iter().map(Relation::name)
    }

    fn reporter(&self) -> ChangeReporter {
        self.relation_names()
            .fold(ChangeReporter::new(E::TYPE_NAME), ChangeReporter::with_relation)
    }

    /// Drops invalid, duplicate and domain-invalid models.
    fn filter(&self, models: &mut Vec<M>, errors: &mut Vec<String>) {
        filter::retain_identified(models, &self.rule, errors);
        filter::retain_unique(models, &self.rule, errors);

        if let Some(validator) = &self.validator {
            models.retain(|model| match validator.validate(model) {
                Ok(()) => true,
                Err(message) => {
                    warn!(family = E::TYPE_NAME, "{message}");
                    errors.push(message);
                    false
                }
            });
        }
    }
}

/// Reconciles one entity family.
pub struct EntityImporter<M, E> {
    family: EntityFamily<M, E>,
}

impl<M, E> EntityImporter<M, E>
where
    M: Send + Sync,
    E: Entity,
{
    /// Creates an importer for a family.
    #[must_use]
    pub fn new(family: EntityFamily<M, E>) -> Self {
        Self { family }
    }

    /// Returns the family description.
    #[must_use]
    pub const fn family(&self) -> &EntityFamily<M, E> {
        &self.family
    }

    /// Reconciles a list of import models against the store.
    ///
    /// Stages inserts, updates and (with `delete_all_others`) deletes, then
    /// adds the family's counts to `result`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the store fails or reports a detached entry.
    pub async fn import_models<S: ImportStore>(
        &self,
        mut models: Vec<M>,
        store: &mut S,
        options: &ImportOptions,
        result: &mut ImportResult,
    ) -> ImportOutcome<()> {
        let family = &self.family;
        debug!(family = E::TYPE_NAME, models = models.len(), "reconciling family");

        let counts = store.counts::<E>().await?;
        let mut item = ImportResultItem::new(counts.total);
        for name in family.relation_names() {
            item.children
                .insert(name.to_string(), ImportResultItem::new(counts.relation(name)));
        }

        family.filter(&mut models, &mut result.errors);

        let entities: Vec<E> = models.iter().map(family.to_entity).collect();
        let identifiers: IdentifierSet = entities.iter().map(Entity::identifier).collect();

        let mut stored: HashMap<String, E> = store
            .find_by_identifiers::<E>(&identifiers)
            .await?
            .into_iter()
            .map(|entity| (normalize(entity.identifier()), entity))
            .collect();

        for entity in entities {
            match stored.remove(&normalize(entity.identifier())) {
                Some(mut current) => {
                    (family.copy_scalars)(&mut current, &entity);
                    for relation in &family.relations {
                        (relation.reconcile)(&mut current, &entity);
                    }
                    store.stage_update(current)?;
                }
                None => store.stage_insert(entity)?,
            }
        }

        let mut deleted: HashMap<Uuid, BTreeMap<&'static str, usize>> = HashMap::new();
        if options.delete_all_others {
            for stale in store.find_excluding::<E>(&identifiers).await? {
                deleted.insert(stale.id(), stale.relation_counts());
                store.stage_delete(&stale)?;
            }
        }

        // Relation rows of deleted parents are removed by cascade; whether the
        // store lists them depends on its timing, so they are counted from the
        // parents instead.
        let changes = store.pending_changes();
        family.reporter().report(&changes, &mut item, |entry, _| {
            entry.state == EntityState::Deleted
                && entry.is_relation()
                && entry.parent.is_some_and(|parent| deleted.contains_key(&parent))
        })?;
        for relation_counts in deleted.values() {
            for (name, count) in relation_counts {
                item.child_mut(name).record_deletes(*count as u64);
            }
        }

        info!(
            family = E::TYPE_NAME,
            adds = item.adds,
            updates = item.updates,
            deletes = item.deletes,
            "family reconciled"
        );
        result.add_item(E::TYPE_NAME, item);
        Ok(())
    }
}

#[async_trait]
impl<S, M, E> PartialImporter<S> for EntityImporter<M, E>
where
    S: ImportStore,
    M: DeserializeOwned + Send + Sync + 'static,
    E: Entity,
{
    fn name(&self) -> &'static str {
        E::TYPE_NAME
    }

    async fn import(
        &self,
        source: &ConfigurationSource,
        store: &mut S,
        options: &ImportOptions,
        result: &mut ImportResult,
    ) -> ImportOutcome<()> {
        let models = source.bind::<M>(self.family.section())?;
        self.import_models(models, store, options, result).await
    }
}
