//! Identity area: roles and users.

use kc_import::model::{RoleModel, UserModel};
use kc_import::{ConfigurationSource, ContextImporter, ImportOptions};
use kc_model::{Role, User};
use kc_storage::CascadeTiming;

use crate::common::database;

fn source(roles: Vec<RoleModel>, users: Vec<UserModel>) -> anyhow::Result<ConfigurationSource> {
    Ok(ConfigurationSource::new()
        .with_section("Roles", roles)?
        .with_section("Users", users)?)
}

#[tokio::test]
async fn roles_and_users_reconcile_together() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let roles = vec![
        RoleModel::new("admin").with_claim("permission", "all"),
        RoleModel::new("reader"),
    ];
    let users = vec![UserModel::new("alice").with_role("admin").with_role("reader")];

    let mut importer = ContextImporter::identity(db.session(), ImportOptions::new());
    let result = importer.import(&source(roles.clone(), users.clone())?).await?;
    assert_eq!(result.item("Role").map(|i| i.adds), Some(2));
    assert_eq!(
        result.item("Role").and_then(|i| i.child("RoleClaim")).map(|c| c.adds),
        Some(1)
    );
    assert_eq!(
        result.item("User").and_then(|i| i.child("UserRole")).map(|c| c.adds),
        Some(2)
    );
    assert_eq!(importer.commit().await?, 2 + 1 + 1 + 2);

    let alice: User = db.find("ALICE").expect("user stored");
    assert_eq!(alice.normalized_user_name, "ALICE");
    let admin: Role = db.find("admin").expect("role stored");
    assert_eq!(admin.normalized_name, "ADMIN");

    // Dropping a role assignment and a role.
    let users = vec![UserModel::new("alice").with_role("admin")];
    let mut importer = ContextImporter::identity(
        db.session(),
        ImportOptions::new().with_delete_all_others(true),
    );
    let result = importer.import(&source(roles[..1].to_vec(), users)?).await?;
    assert_eq!(result.item("Role").map(|i| i.deletes), Some(1));
    assert_eq!(
        result.item("User").and_then(|i| i.child("UserRole")).map(|c| c.deletes),
        Some(1)
    );
    assert_eq!(importer.commit().await?, 2);
    assert!(result.is_balanced());

    Ok(())
}

#[tokio::test]
async fn claim_type_case_is_corrected_without_new_rows() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let mut importer = ContextImporter::identity(db.session(), ImportOptions::new());
    importer
        .import(&source(vec![RoleModel::new("admin").with_claim("Permission", "all")], Vec::new())?)
        .await?;
    importer.commit().await?;

    let mut importer = ContextImporter::identity(db.session(), ImportOptions::new());
    let result = importer
        .import(&source(vec![RoleModel::new("admin").with_claim("permission", "all")], Vec::new())?)
        .await?;
    let claims = result
        .item("Role")
        .and_then(|i| i.child("RoleClaim"))
        .expect("claim item");
    assert_eq!((claims.adds, claims.updates, claims.deletes), (0, 1, 0));
    importer.commit().await?;

    let admin: Role = db.find("admin").expect("role stored");
    assert_eq!(admin.claims[0].claim_type, "permission");
    Ok(())
}

#[tokio::test]
async fn changed_claim_value_updates_the_paired_row() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let mut importer = ContextImporter::identity(db.session(), ImportOptions::new());
    importer
        .import(&source(
            vec![RoleModel::new("admin").with_claim("permission", "read")],
            vec![UserModel::new("alice").with_claim("department", "sales")],
        )?)
        .await?;
    importer.commit().await?;
    let before: Role = db.find("admin").expect("role stored");

    let mut importer = ContextImporter::identity(db.session(), ImportOptions::new());
    let result = importer
        .import(&source(
            vec![RoleModel::new("admin").with_claim("permission", "write")],
            vec![UserModel::new("alice").with_claim("department", "support")],
        )?)
        .await?;

    for (family, relation) in [("Role", "RoleClaim"), ("User", "UserClaim")] {
        let claims = result
            .item(family)
            .and_then(|i| i.child(relation))
            .expect("claim item");
        assert_eq!((claims.adds, claims.updates, claims.deletes), (0, 1, 0), "{relation}");
    }
    assert_eq!(importer.commit().await?, 2);

    let admin: Role = db.find("admin").expect("role stored");
    assert_eq!(admin.claims[0].id, before.claims[0].id);
    assert_eq!(admin.claims[0].claim_value, "write");
    let alice: User = db.find("alice").expect("user stored");
    assert_eq!(alice.claims[0].claim_value, "support");
    Ok(())
}
