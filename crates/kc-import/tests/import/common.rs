//! Shared fixtures.

use kc_import::model::ClientModel;
use kc_import::validation::grant_types;
use kc_import::{ConfigurationSource, ContextImporter, ImportOptions, ImportResult};
use kc_storage::{CascadeTiming, InMemoryDatabase};

/// Enables test logging once per binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kc_import=debug,kc_storage=debug")
        .with_test_writer()
        .try_init();
}

/// Creates an empty database with the given cascade timing.
pub fn database(cascade: CascadeTiming) -> InMemoryDatabase {
    init_tracing();
    InMemoryDatabase::new().with_cascade_timing(cascade)
}

/// The three grant types used by the client fixtures. None of them
/// exclude each other.
pub const GRANT_TYPES: [&str; 3] = [
    grant_types::CLIENT_CREDENTIALS,
    grant_types::PASSWORD,
    grant_types::DEVICE_FLOW,
];

/// Builds a client model with the given grant types and secret values.
pub fn client(client_id: &str, grants: &[&str], secrets: &[&str]) -> ClientModel {
    let model = grants
        .iter()
        .fold(ClientModel::new(client_id), |model, grant| model.with_grant_type(*grant));
    secrets
        .iter()
        .fold(model, |model, secret| model.with_secret(*secret))
}

/// Runs a configuration pass over a client list and commits it.
///
/// Returns the report and the committed row count.
pub async fn import_clients(
    db: &InMemoryDatabase,
    clients: Vec<ClientModel>,
    options: ImportOptions,
) -> anyhow::Result<(ImportResult, usize)> {
    let source = ConfigurationSource::new().with_section("Clients", clients)?;
    import_source(db, &source, options).await
}

/// Runs a configuration pass over a source and commits it.
pub async fn import_source(
    db: &InMemoryDatabase,
    source: &ConfigurationSource,
    options: ImportOptions,
) -> anyhow::Result<(ImportResult, usize)> {
    let mut importer = ContextImporter::configuration(db.session(), options);
    let result = importer.import(source).await?;
    let affected = importer.commit().await?;
    Ok((result, affected))
}
