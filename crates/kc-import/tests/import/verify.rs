//! Verify-only passes.

use kc_import::{ConfigurationSource, ContextImporter, ImportOptions};
use kc_model::Client;
use kc_storage::{CascadeTiming, ImportStore};

use crate::common::{GRANT_TYPES, client, database, import_clients};

#[tokio::test]
async fn verify_only_reports_the_same_delta_twice_and_writes_nothing() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    import_clients(
        &db,
        vec![client("old", &GRANT_TYPES, &["a"]), client("kept", &GRANT_TYPES, &["a"])],
        ImportOptions::new(),
    )
    .await?;
    let before = db.counts::<Client>();

    let source = ConfigurationSource::new().with_section(
        "Clients",
        vec![
            client("kept", &GRANT_TYPES[..2], &["b"]),
            client("new", &GRANT_TYPES, &["a"]),
        ],
    )?;
    let options = ImportOptions::new()
        .with_delete_all_others(true)
        .with_verify_only(true);

    let mut reports = Vec::new();
    for _ in 0..2 {
        let mut importer = ContextImporter::configuration(db.session(), options);
        let result = importer.import(&source).await?;
        assert_eq!(importer.commit().await?, 0);
        reports.push(result);
    }

    assert_eq!(reports[0], reports[1]);
    let item = reports[0].item("Client").expect("client item");
    assert_eq!((item.adds, item.deletes), (1, 1));
    assert_eq!(item.child("ClientGrantType").map(|c| (c.adds, c.deletes)), Some((3, 1 + 3)));
    assert_eq!(item.child("ClientSecret").map(|c| c.updates), Some(1));
    assert_eq!(db.counts::<Client>(), before);
    assert!(db.find::<Client>("new").is_none());
    Ok(())
}

#[tokio::test]
async fn verify_only_leaves_the_session_empty() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let source = ConfigurationSource::new()
        .with_section("Clients", vec![client("app", &GRANT_TYPES, &["a"])])?;

    let mut importer =
        ContextImporter::configuration(db.session(), ImportOptions::new().with_verify_only(true));
    let result = importer.import(&source).await?;

    assert!(result.has_changes());
    assert!(importer.store().pending_changes().is_empty());
    Ok(())
}
