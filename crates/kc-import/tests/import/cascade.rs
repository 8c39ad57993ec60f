//! Cascade accounting under both cascade timings.

use kc_import::{ImportOptions, ImportResult};
use kc_model::Client;
use kc_storage::CascadeTiming;

use crate::common::{GRANT_TYPES, client, database, import_clients};

async fn delete_one_of_two(cascade: CascadeTiming) -> anyhow::Result<(ImportResult, usize)> {
    let db = database(cascade);
    let keep = client("keep", &GRANT_TYPES, &["k"]);
    let stale = client("stale", &GRANT_TYPES[..1], &["s1", "s2"]).with_scope("api");
    import_clients(&db, vec![keep.clone(), stale], ImportOptions::new()).await?;

    let options = ImportOptions::new().with_delete_all_others(true);
    let outcome = import_clients(&db, vec![keep], options).await?;

    assert_eq!(db.counts::<Client>().total, 1);
    assert!(db.find::<Client>("stale").is_none());
    Ok(outcome)
}

#[tokio::test]
async fn deleted_parent_relations_are_counted_once() -> anyhow::Result<()> {
    let (result, _) = delete_one_of_two(CascadeTiming::OnFlush).await?;

    let item = result.item("Client").expect("client item");
    assert_eq!((item.before, item.deletes, item.after), (2, 1, 1));
    assert_eq!(item.child("ClientGrantType").map(|c| c.deletes), Some(1));
    assert_eq!(item.child("ClientSecret").map(|c| c.deletes), Some(2));
    assert_eq!(item.child("ClientScope").map(|c| c.deletes), Some(1));
    assert_eq!(item.child("ClientClaim").map(|c| c.deletes), Some(0));
    assert!(result.is_balanced());
    Ok(())
}

#[tokio::test]
async fn report_does_not_depend_on_cascade_timing() -> anyhow::Result<()> {
    let (on_flush, flushed_rows) = delete_one_of_two(CascadeTiming::OnFlush).await?;
    let (immediate, immediate_rows) = delete_one_of_two(CascadeTiming::Immediate).await?;

    assert_eq!(on_flush, immediate);
    // The store lists cascaded rows only when they are staged eagerly.
    assert_eq!(flushed_rows, 1);
    assert_eq!(immediate_rows, 1 + 1 + 2 + 1);
    Ok(())
}
