//! Entity family descriptors.
//!
//! Each family is a value: identifier accessor, model conversion, scalar
//! copy and one reconcile function per relation collection. Families are
//! grouped into the two configuration areas and run in the order listed.

pub mod client;
pub mod identity;
pub mod identity_provider;
pub mod resource;

use kc_model::SecretData;
use kc_storage::ImportStore;
use kc_storage::identifier::eq_ignore_case;

use crate::reconciler::{EntityImporter, PartialImporter};

/// Importers of the protocol configuration area.
///
/// Scope names on clients and API resources are stored as plain strings;
/// they are not resolved against resource rows.
#[must_use]
pub fn configuration_importers<S: ImportStore + 'static>() -> Vec<Box<dyn PartialImporter<S>>> {
    vec![
        Box::new(EntityImporter::new(resource::identity_resources())),
        Box::new(EntityImporter::new(resource::api_scopes())),
        Box::new(EntityImporter::new(resource::api_resources())),
        Box::new(EntityImporter::new(client::clients())),
        Box::new(EntityImporter::new(identity_provider::identity_providers())),
    ]
}

/// Importers of the local identity area.
#[must_use]
pub fn identity_importers<S: ImportStore + 'static>() -> Vec<Box<dyn PartialImporter<S>>> {
    vec![
        Box::new(EntityImporter::new(identity::roles())),
        Box::new(EntityImporter::new(identity::users())),
    ]
}

/// Importers of both areas, configuration first.
#[must_use]
pub fn all_importers<S: ImportStore + 'static>() -> Vec<Box<dyn PartialImporter<S>>> {
    let mut importers = configuration_importers();
    importers.extend(identity_importers());
    importers
}

/// Copies a secret; a changed secret takes the imported issue time.
fn copy_secret(row: &mut SecretData, from: &SecretData) {
    row.overwrite_from(from);
}

/// Copies a claim's type and value over a paired row.
fn copy_claim(row_type: &mut String, row_value: &mut String, from_type: &str, from_value: &str) {
    from_type.clone_into(row_type);
    from_value.clone_into(row_value);
}

/// Claims match on type (ignoring case) and exact value.
fn same_claim(row_type: &str, row_value: &str, import_type: &str, import_value: &str) -> bool {
    row_value == import_value && eq_ignore_case(row_type, import_type)
}
