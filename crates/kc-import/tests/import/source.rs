//! Passes driven by configuration files.

use std::fs;

use kc_import::{ConfigurationSource, ImportOptions};
use kc_model::{ApiResource, Client, IdentityProvider, IdentityResource};
use kc_storage::CascadeTiming;

use crate::common::{database, import_source};

const RESOURCES: &str = r#"{
    "IdentityResources": [
        { "name": "openid", "userClaims": ["sub"] },
        { "name": "profile", "userClaims": ["name", "family_name"] }
    ],
    "ApiResources": [
        {
            "name": "orders",
            "scopes": ["orders.read", "orders.write"],
            "apiSecrets": [{ "value": "orders-secret" }]
        }
    ]
}"#;

const CLIENTS: &str = r#"
[[Clients]]
clientId = "portal"
allowedGrantTypes = ["authorization_code"]
redirectUris = ["https://portal.example.com/signin"]
allowedScopes = ["openid", "profile", "orders.read"]
clientSecrets = [{ value = "portal-secret" }]

[Clients.properties]
tier = "gold"

[[IdentityProviders]]
scheme = "corp"
displayName = "Corporate login"
type = "oidc"
"#;

#[tokio::test]
async fn layered_files_import_every_family() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let resources = dir.path().join("resources.json");
    let clients = dir.path().join("clients.toml");
    fs::write(&resources, RESOURCES)?;
    fs::write(&clients, CLIENTS)?;

    let db = database(CascadeTiming::OnFlush);
    let source = ConfigurationSource::load_all([&resources, &clients])?;
    let (result, affected) = import_source(&db, &source, ImportOptions::new()).await?;

    assert!(!result.has_errors(), "{:?}", result.errors);
    assert_eq!(result.item("IdentityResource").map(|i| i.adds), Some(2));
    assert_eq!(result.item("ApiResource").map(|i| i.adds), Some(1));
    assert_eq!(result.item("IdentityProvider").map(|i| i.adds), Some(1));
    assert_eq!(result.item("ApiScope").map(|i| i.adds), Some(0));

    let client = result.item("Client").expect("client item");
    assert_eq!(client.child("ClientScope").map(|c| c.adds), Some(3));
    assert_eq!(client.child("ClientProperty").map(|c| c.adds), Some(1));

    // 2 + 3 claims, 1 + 2 scopes + 1 secret, 1 + 1 + 1 + 3 + 1 + 1, 1
    assert_eq!(affected, 5 + 4 + 8 + 1);

    let portal: Client = db.find("portal").expect("client stored");
    assert_eq!(portal.redirect_uris[0].redirect_uri, "https://portal.example.com/signin");
    assert!(db.find::<IdentityResource>("profile").is_some());
    assert!(db.find::<ApiResource>("orders").is_some());
    assert!(db.find::<IdentityProvider>("CORP").is_some());

    // Same files again: nothing to do.
    let (result, affected) = import_source(&db, &source, ImportOptions::new()).await?;
    assert!(!result.has_changes());
    assert_eq!(affected, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_section_aborts_the_pass() -> anyhow::Result<()> {
    let db = database(CascadeTiming::OnFlush);
    let source = ConfigurationSource::from_json_str(r#"{ "Clients": { "clientId": "x" } }"#)?;

    let outcome = import_source(&db, &source, ImportOptions::new()).await;

    assert!(outcome.is_err());
    assert_eq!(db.counts::<Client>().total, 0);
    Ok(())
}
