//! Client family.

use kc_model::{
    Client, ClientClaim, ClientCorsOrigin, ClientGrantType, ClientIdpRestriction,
    ClientPostLogoutRedirectUri, ClientProperty, ClientRedirectUri, ClientScope, ClientSecret,
};
use kc_storage::Entity;
use uuid::Uuid;

use super::{copy_claim, copy_secret, same_claim};
use crate::matcher::{Matcher, reconcile_rows};
use crate::model::ClientModel;
use crate::reconciler::{EntityFamily, Relation};
use crate::validation::ClientConfigurationValidator;

/// The client family, identified by `ClientId`.
#[must_use]
pub fn clients() -> EntityFamily<ClientModel, Client> {
    EntityFamily::new("ClientId", ClientModel::identifier, to_entity, copy_scalars)
        .with_relation(Relation::of::<ClientGrantType>(grant_types))
        .with_relation(Relation::of::<ClientRedirectUri>(redirect_uris))
        .with_relation(Relation::of::<ClientPostLogoutRedirectUri>(post_logout_redirect_uris))
        .with_relation(Relation::of::<ClientScope>(scopes))
        .with_relation(Relation::of::<ClientSecret>(secrets))
        .with_relation(Relation::of::<ClientClaim>(claims))
        .with_relation(Relation::of::<ClientCorsOrigin>(cors_origins))
        .with_relation(Relation::of::<ClientProperty>(properties))
        .with_relation(Relation::of::<ClientIdpRestriction>(idp_restrictions))
        .with_validator(ClientConfigurationValidator)
}

fn to_entity(model: &ClientModel) -> Client {
    Client {
        client_name: model.client_name.clone(),
        description: model.description.clone(),
        enabled: model.enabled,
        protocol_type: model.protocol_type.clone(),
        require_client_secret: model.require_client_secret,
        require_consent: model.require_consent,
        allow_remember_consent: model.allow_remember_consent,
        require_pkce: model.require_pkce,
        allow_plain_text_pkce: model.allow_plain_text_pkce,
        allow_offline_access: model.allow_offline_access,
        allow_access_tokens_via_browser: model.allow_access_tokens_via_browser,
        enable_local_login: model.enable_local_login,
        client_uri: model.client_uri.clone(),
        logo_uri: model.logo_uri.clone(),
        front_channel_logout_uri: model.front_channel_logout_uri.clone(),
        back_channel_logout_uri: model.back_channel_logout_uri.clone(),
        identity_token_lifetime: model.identity_token_lifetime,
        access_token_lifetime: model.access_token_lifetime,
        authorization_code_lifetime: model.authorization_code_lifetime,
        absolute_refresh_token_lifetime: model.absolute_refresh_token_lifetime,
        sliding_refresh_token_lifetime: model.sliding_refresh_token_lifetime,
        consent_lifetime: model.consent_lifetime,
        refresh_token_usage: model.refresh_token_usage,
        refresh_token_expiration: model.refresh_token_expiration,
        access_token_type: model.access_token_type,
        include_jwt_id: model.include_jwt_id,
        always_send_client_claims: model.always_send_client_claims,
        client_claims_prefix: model.client_claims_prefix.clone(),
        pair_wise_subject_salt: model.pair_wise_subject_salt.clone(),
        non_editable: model.non_editable,
        allowed_grant_types: model.allowed_grant_types.iter().map(ClientGrantType::new).collect(),
        redirect_uris: model.redirect_uris.iter().map(ClientRedirectUri::new).collect(),
        post_logout_redirect_uris: model
            .post_logout_redirect_uris
            .iter()
            .map(ClientPostLogoutRedirectUri::new)
            .collect(),
        allowed_scopes: model.allowed_scopes.iter().map(ClientScope::new).collect(),
        client_secrets: model
            .client_secrets
            .iter()
            .map(|secret| ClientSecret {
                id: Uuid::now_v7(),
                secret: secret.into(),
            })
            .collect(),
        claims: model
            .claims
            .iter()
            .map(|claim| ClientClaim::new(&claim.claim_type, &claim.value))
            .collect(),
        allowed_cors_origins: model.allowed_cors_origins.iter().map(ClientCorsOrigin::new).collect(),
        properties: model
            .properties
            .iter()
            .map(|(key, value)| ClientProperty::new(key, value))
            .collect(),
        identity_provider_restrictions: model
            .identity_provider_restrictions
            .iter()
            .map(ClientIdpRestriction::new)
            .collect(),
        ..Client::new(model.client_id.clone().unwrap_or_default())
    }
}

/// Copies scalars; surrogate key, timestamps and relations are excluded.
fn copy_scalars(target: &mut Client, source: &Client) {
    *target = Client {
        id: target.id,
        created: target.created,
        updated: target.updated,
        last_accessed: target.last_accessed,
        allowed_grant_types: std::mem::take(&mut target.allowed_grant_types),
        redirect_uris: std::mem::take(&mut target.redirect_uris),
        post_logout_redirect_uris: std::mem::take(&mut target.post_logout_redirect_uris),
        allowed_scopes: std::mem::take(&mut target.allowed_scopes),
        client_secrets: std::mem::take(&mut target.client_secrets),
        claims: std::mem::take(&mut target.claims),
        allowed_cors_origins: std::mem::take(&mut target.allowed_cors_origins),
        properties: std::mem::take(&mut target.properties),
        identity_provider_restrictions: std::mem::take(&mut target.identity_provider_restrictions),
        ..source.without_relations()
    };
}

fn grant_types(entity: &mut Client, import: &Client) {
    fn key(row: &ClientGrantType) -> &str {
        &row.grant_type
    }
    reconcile_rows(
        &mut entity.allowed_grant_types,
        &import.allowed_grant_types,
        Matcher::by_key(key),
        |row, from| row.grant_type.clone_from(&from.grant_type),
    );
}

fn redirect_uris(entity: &mut Client, import: &Client) {
    fn key(row: &ClientRedirectUri) -> &str {
        &row.redirect_uri
    }
    reconcile_rows(
        &mut entity.redirect_uris,
        &import.redirect_uris,
        Matcher::by_key(key),
        |row, from| row.redirect_uri.clone_from(&from.redirect_uri),
    );
}

fn post_logout_redirect_uris(entity: &mut Client, import: &Client) {
    fn key(row: &ClientPostLogoutRedirectUri) -> &str {
        &row.post_logout_redirect_uri
    }
    reconcile_rows(
        &mut entity.post_logout_redirect_uris,
        &import.post_logout_redirect_uris,
        Matcher::by_key(key),
        |row, from| row.post_logout_redirect_uri.clone_from(&from.post_logout_redirect_uri),
    );
}

fn scopes(entity: &mut Client, import: &Client) {
    fn key(row: &ClientScope) -> &str {
        &row.scope
    }
    reconcile_rows(
        &mut entity.allowed_scopes,
        &import.allowed_scopes,
        Matcher::by_key(key),
        |row, from| row.scope.clone_from(&from.scope),
    );
}

// Secrets have no natural key and pair by position.
fn secrets(entity: &mut Client, import: &Client) {
    reconcile_rows(
        &mut entity.client_secrets,
        &import.client_secrets,
        Matcher::positional(),
        |row, from| copy_secret(&mut row.secret, &from.secret),
    );
}

fn claims(entity: &mut Client, import: &Client) {
    reconcile_rows(
        &mut entity.claims,
        &import.claims,
        Matcher::Predicate(|row: &ClientClaim, from: &ClientClaim| {
            same_claim(&row.claim_type, &row.value, &from.claim_type, &from.value)
        }),
        |row, from| copy_claim(&mut row.claim_type, &mut row.value, &from.claim_type, &from.value),
    );
}

fn cors_origins(entity: &mut Client, import: &Client) {
    fn key(row: &ClientCorsOrigin) -> &str {
        &row.origin
    }
    reconcile_rows(
        &mut entity.allowed_cors_origins,
        &import.allowed_cors_origins,
        Matcher::by_key(key),
        |row, from| row.origin.clone_from(&from.origin),
    );
}

fn properties(entity: &mut Client, import: &Client) {
    fn key(row: &ClientProperty) -> &str {
        &row.key
    }
    reconcile_rows(
        &mut entity.properties,
        &import.properties,
        Matcher::by_key(key),
        |row, from| {
            row.key.clone_from(&from.key);
            row.value.clone_from(&from.value);
        },
    );
}

fn idp_restrictions(entity: &mut Client, import: &Client) {
    fn key(row: &ClientIdpRestriction) -> &str {
        &row.provider
    }
    reconcile_rows(
        &mut entity.identity_provider_restrictions,
        &import.identity_provider_restrictions,
        Matcher::by_key(key),
        |row, from| row.provider.clone_from(&from.provider),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClaimModel;

    fn model() -> ClientModel {
        let mut model = ClientModel::new("web")
            .with_grant_type("client_credentials")
            .with_secret("s3cret")
            .with_scope("api");
        model.claims.push(ClaimModel::new("tier", "gold"));
        model.properties.insert("owner".to_string(), "team-a".to_string());
        model
    }

    #[test]
    fn family_lists_every_relation() {
        let family = clients();

        assert_eq!(family.section(), "Clients");
        assert_eq!(family.relation_names().count(), 9);
    }

    #[test]
    fn conversion_maps_relations() {
        let client = to_entity(&model());

        assert_eq!(client.identifier(), "web");
        assert_eq!(client.allowed_grant_types[0].grant_type, "client_credentials");
        assert_eq!(client.client_secrets[0].secret.value, "s3cret");
        assert_eq!(client.claims[0].value, "gold");
        assert_eq!(client.properties[0].key, "owner");
    }

    #[test]
    fn copy_keeps_identity_and_relations() {
        let mut stored = to_entity(&model());
        let id = stored.id;
        let created = stored.created;
        let mut incoming = to_entity(&model());
        incoming.description = Some("changed".to_string());
        incoming.allowed_grant_types.clear();

        copy_scalars(&mut stored, &incoming);

        assert_eq!(stored.id, id);
        assert_eq!(stored.created, created);
        assert_eq!(stored.description.as_deref(), Some("changed"));
        assert_eq!(stored.allowed_grant_types.len(), 1);
    }

    #[test]
    fn reimport_of_same_model_changes_nothing() {
        let stored = to_entity(&model());
        let incoming = to_entity(&model());

        let mut current = stored.clone();
        copy_scalars(&mut current, &incoming);
        grant_types(&mut current, &incoming);
        secrets(&mut current, &incoming);
        claims(&mut current, &incoming);
        properties(&mut current, &incoming);
        scopes(&mut current, &incoming);

        assert_eq!(current, stored);
    }

    #[test]
    fn grant_type_case_is_corrected_in_place() {
        let mut stored = to_entity(&model());
        let row_id = stored.allowed_grant_types[0].id;
        let incoming = to_entity(&ClientModel::new("web").with_grant_type("CLIENT_CREDENTIALS"));

        grant_types(&mut stored, &incoming);

        assert_eq!(stored.allowed_grant_types.len(), 1);
        assert_eq!(stored.allowed_grant_types[0].id, row_id);
        assert_eq!(stored.allowed_grant_types[0].grant_type, "CLIENT_CREDENTIALS");
    }
}
