//! Rejected models: bad identifiers, duplicates and failed validation.

use kc_import::ImportOptions;
use kc_import::model::ClientModel;
use kc_model::Client;
use kc_storage::CascadeTiming;

use crate::common::{GRANT_TYPES, client, database, import_clients};

#[tokio::test]
async fn duplicate_group_is_rejected_entirely() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let models = vec![
        client("shared", &GRANT_TYPES, &["a"]),
        client("SHARED", &GRANT_TYPES, &["b"]),
        client("Shared", &GRANT_TYPES, &["c"]),
    ];

    let (result, affected) = import_clients(&db, models, ImportOptions::new()).await?;

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("2 duplicates"), "{}", result.errors[0]);
    assert_eq!(result.item("Client").map(|i| i.adds), Some(0));
    assert_eq!(affected, 0);
    assert_eq!(db.counts::<Client>().total, 0);
    Ok(())
}

#[tokio::test]
async fn invalid_models_are_skipped_without_aborting() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let mut blank = client("   ", &GRANT_TYPES, &["a"]);
    blank.client_name = Some("blank".to_string());
    let missing = ClientModel {
        client_name: Some("missing".to_string()),
        ..ClientModel::default()
    };
    let no_secret = client("no-secret", &GRANT_TYPES, &[]);
    let valid = client("valid", &GRANT_TYPES, &["a"]);

    let (result, affected) =
        import_clients(&db, vec![blank, missing, no_secret, valid], ImportOptions::new()).await?;

    assert_eq!(result.errors.len(), 3);
    assert!(result.errors.iter().any(|e| e == "Client.ClientId is missing."));
    assert!(result.errors.iter().any(|e| e == "Client.ClientId \"   \" is blank."));
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.starts_with("Client \"no-secret\":") && e.contains("requires a client secret"))
    );
    assert_eq!(result.item("Client").map(|i| i.adds), Some(1));
    assert_eq!(affected, 1 + GRANT_TYPES.len() + 1);
    assert!(db.find::<Client>("valid").is_some());
    Ok(())
}

#[tokio::test]
async fn conflicting_grant_types_are_rejected() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let model = client("spa", &["implicit", "authorization_code"], &["a"]);

    let (result, affected) = import_clients(&db, vec![model], ImportOptions::new()).await?;

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("cannot be combined"), "{}", result.errors[0]);
    assert_eq!(affected, 0);
    Ok(())
}

#[tokio::test]
async fn rejected_model_counts_as_absent_when_deleting_others() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    import_clients(&db, vec![client("app", &GRANT_TYPES, &["a"])], ImportOptions::new()).await?;

    // A rejected model drops out of the identifier set, so its persisted
    // counterpart is treated like any other absent identifier.
    let options = ImportOptions::new().with_delete_all_others(true);
    let (result, _) =
        import_clients(&db, vec![client("app", &GRANT_TYPES, &[])], options).await?;

    assert!(result.has_errors());
    assert_eq!(result.item("Client").map(|i| i.deletes), Some(1));
    Ok(())
}
