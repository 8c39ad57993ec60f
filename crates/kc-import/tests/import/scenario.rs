//! Client lifecycle: create, reimport, shrink, delete.

use kc_import::ImportOptions;
use kc_import::model::ClaimModel;
use kc_model::Client;
use kc_storage::CascadeTiming;

use crate::common::{GRANT_TYPES, client, database, import_clients};

const SECRETS: [&str; 3] = ["first-secret", "second-secret", "third-secret"];

#[tokio::test]
async fn client_lifecycle_reports_and_commits_expected_rows() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let full = client("client-1", &GRANT_TYPES, &SECRETS);

    // Create.
    let (result, affected) = import_clients(&db, vec![full.clone()], ImportOptions::new()).await?;
    let item = result.item("Client").expect("client item");
    assert_eq!(item.adds, 1);
    assert_eq!(item.child("ClientGrantType").map(|c| c.adds), Some(3));
    assert_eq!(item.child("ClientSecret").map(|c| c.adds), Some(3));
    assert_eq!(item.child("ClientRedirectUri").map(|c| c.adds), Some(0));
    assert_eq!(affected, 7);
    assert!(result.is_balanced());

    // Identical reimport.
    let (result, affected) = import_clients(&db, vec![full], ImportOptions::new()).await?;
    assert!(!result.has_changes());
    assert_eq!(affected, 0);

    // Shrink to one grant type and one secret, keeping the first of each.
    let options = ImportOptions::new().with_delete_all_others(true);
    let shrunk = client("client-1", &GRANT_TYPES[..1], &SECRETS[..1]);
    let (result, affected) = import_clients(&db, vec![shrunk], options).await?;
    let item = result.item("Client").expect("client item");
    assert_eq!((item.adds, item.updates, item.deletes), (0, 0, 0));
    assert_eq!(item.child("ClientGrantType").map(|c| c.deletes), Some(2));
    assert_eq!(item.child("ClientSecret").map(|c| c.deletes), Some(2));
    assert_eq!(affected, 4);
    assert!(result.is_balanced());

    let stored: Client = db.find("client-1").expect("client stored");
    assert_eq!(stored.allowed_grant_types.len(), 1);
    assert_eq!(stored.allowed_grant_types[0].grant_type, GRANT_TYPES[0]);
    assert_eq!(stored.client_secrets.len(), 1);
    assert_eq!(stored.client_secrets[0].secret.value, SECRETS[0]);

    // Empty import deletes the client and counts its cascaded rows.
    let (result, affected) = import_clients(&db, Vec::new(), options).await?;
    let item = result.item("Client").expect("client item");
    assert_eq!(item.deletes, 1);
    assert_eq!(item.after, 0);
    assert_eq!(item.child("ClientGrantType").map(|c| c.deletes), Some(1));
    assert_eq!(item.child("ClientSecret").map(|c| c.deletes), Some(1));
    assert_eq!(affected, 1);
    assert!(result.is_balanced());
    assert_eq!(db.counts::<Client>().total, 0);

    Ok(())
}

#[tokio::test]
async fn reordered_secrets_with_one_change_update_in_place() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let grants = &GRANT_TYPES[..1];
    import_clients(&db, vec![client("client-1", grants, &["a", "b", "c"])], ImportOptions::new())
        .await?;
    let before: Client = db.find("client-1").expect("client stored");

    let (result, affected) = import_clients(
        &db,
        vec![client("client-1", grants, &["c", "a", "changed"])],
        ImportOptions::new(),
    )
    .await?;

    let secrets = result
        .item("Client")
        .and_then(|item| item.child("ClientSecret"))
        .expect("secret item");
    assert_eq!((secrets.adds, secrets.updates, secrets.deletes), (0, 3, 0));
    assert_eq!(affected, 3);

    let after: Client = db.find("client-1").expect("client stored");
    let ids = |client: &Client| client.client_secrets.iter().map(|s| s.id).collect::<Vec<_>>();
    assert_eq!(ids(&before), ids(&after));
    let values: Vec<_> = after.client_secrets.iter().map(|s| s.secret.value.as_str()).collect();
    assert_eq!(values, ["c", "a", "changed"]);

    Ok(())
}

#[tokio::test]
async fn identifier_match_ignores_case_and_takes_imported_spelling() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    import_clients(&db, vec![client("Client-1", &GRANT_TYPES, &["s"])], ImportOptions::new()).await?;

    let (result, affected) = import_clients(
        &db,
        vec![client("CLIENT-1", &GRANT_TYPES, &["s"]).with_redirect_uri("https://app.example.com/cb")],
        ImportOptions::new(),
    )
    .await?;

    let item = result.item("Client").expect("client item");
    assert_eq!((item.adds, item.updates), (0, 1));
    assert_eq!(item.child("ClientRedirectUri").map(|c| c.adds), Some(1));
    assert_eq!(affected, 2);
    assert_eq!(db.counts::<Client>().total, 1);

    let stored: Client = db.find("client-1").expect("client stored");
    assert_eq!(stored.client_id, "CLIENT-1");

    Ok(())
}

#[tokio::test]
async fn scalar_change_is_one_update() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    import_clients(&db, vec![client("client-1", &GRANT_TYPES, &["s"])], ImportOptions::new()).await?;

    let mut changed = client("client-1", &GRANT_TYPES, &["s"]);
    changed.client_name = Some("Renamed".to_string());
    let (result, affected) = import_clients(&db, vec![changed], ImportOptions::new()).await?;

    let item = result.item("Client").expect("client item");
    assert_eq!((item.adds, item.updates, item.deletes), (0, 1, 0));
    assert_eq!(affected, 1);

    let stored: Client = db.find("client-1").expect("client stored");
    assert_eq!(stored.client_name.as_deref(), Some("Renamed"));

    Ok(())
}

#[tokio::test]
async fn changed_claim_value_is_written_in_place() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let with_claim = |value: &str| {
        let mut model = client("client-1", &GRANT_TYPES, &["s"]);
        model.claims.push(ClaimModel::new("tier", value));
        model
    };
    import_clients(&db, vec![with_claim("gold")], ImportOptions::new()).await?;
    let before: Client = db.find("client-1").expect("client stored");

    let (result, affected) = import_clients(&db, vec![with_claim("silver")], ImportOptions::new()).await?;

    let claims = result
        .item("Client")
        .and_then(|item| item.child("ClientClaim"))
        .expect("claim item");
    assert_eq!((claims.adds, claims.updates, claims.deletes), (0, 1, 0));
    assert_eq!(affected, 1);

    let after: Client = db.find("client-1").expect("client stored");
    assert_eq!(after.claims[0].id, before.claims[0].id);
    assert_eq!(after.claims[0].value, "silver");

    // The corrected row now matches; a further pass is idempotent.
    let (result, affected) = import_clients(&db, vec![with_claim("silver")], ImportOptions::new()).await?;
    assert!(!result.has_changes());
    assert_eq!(affected, 0);
    Ok(())
}
