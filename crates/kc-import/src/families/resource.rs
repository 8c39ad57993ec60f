//! Identity resource, API scope and API resource families.

use kc_model::{
    ApiResource, ApiResourceClaim, ApiResourceProperty, ApiResourceScope, ApiResourceSecret,
    ApiScope, ApiScopeClaim, ApiScopeProperty, IdentityResource, IdentityResourceClaim,
    IdentityResourceProperty,
};
use kc_storage::Entity;
use uuid::Uuid;

use super::copy_secret;
use crate::matcher::{Matcher, reconcile_rows};
use crate::model::{ApiResourceModel, ApiScopeModel, IdentityResourceModel};
use crate::reconciler::{EntityFamily, Relation};

// ============================================================================
// Identity resources
// ============================================================================

/// The identity resource family, identified by `Name`.
#[must_use]
pub fn identity_resources() -> EntityFamily<IdentityResourceModel, IdentityResource> {
    EntityFamily::new(
        "Name",
        IdentityResourceModel::identifier,
        identity_resource_entity,
        copy_identity_resource,
    )
    .with_relation(Relation::of::<IdentityResourceClaim>(reconcile_identity_resource_claim))
    .with_relation(Relation::of::<IdentityResourceProperty>(reconcile_identity_resource_property))
}

fn identity_resource_entity(model: &IdentityResourceModel) -> IdentityResource {
    IdentityResource {
        display_name: model.display_name.clone(),
        description: model.description.clone(),
        enabled: model.enabled,
        required: model.required,
        emphasize: model.emphasize,
        show_in_discovery_document: model.show_in_discovery_document,
        non_editable: model.non_editable,
        user_claims: model
            .user_claims
            .iter()
            .map(IdentityResourceClaim::new)
            .collect(),
        properties: model
            .properties
            .iter()
            .map(|(key, value)| IdentityResourceProperty {
                id: Uuid::now_v7(),
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
        ..IdentityResource::new(model.name.clone().unwrap_or_default())
    }
}

fn copy_identity_resource(target: &mut IdentityResource, source: &IdentityResource) {
    *target = IdentityResource {
        id: target.id,
        created: target.created,
        updated: target.updated,
        user_claims: std::mem::take(&mut target.user_claims),
        properties: std::mem::take(&mut target.properties),
        ..source.without_relations()
    };
}

// ============================================================================
// API scopes
// ============================================================================

/// The API scope family, identified by `Name`.
#[must_use]
pub fn api_scopes() -> EntityFamily<ApiScopeModel, ApiScope> {
    EntityFamily::new("Name", ApiScopeModel::identifier, api_scope_entity, copy_api_scope)
        .with_relation(Relation::of::<ApiScopeClaim>(reconcile_api_scope_claim))
        .with_relation(Relation::of::<ApiScopeProperty>(reconcile_api_scope_property))
}

fn api_scope_entity(model: &ApiScopeModel) -> ApiScope {
    ApiScope {
        display_name: model.display_name.clone(),
        description: model.description.clone(),
        enabled: model.enabled,
        required: model.required,
        emphasize: model.emphasize,
        show_in_discovery_document: model.show_in_discovery_document,
        non_editable: model.non_editable,
        user_claims: model
            .user_claims
            .iter()
            .map(|claim_type| ApiScopeClaim {
                id: Uuid::now_v7(),
                claim_type: claim_type.clone(),
            })
            .collect(),
        properties: model
            .properties
            .iter()
            .map(|(key, value)| ApiScopeProperty {
                id: Uuid::now_v7(),
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
        ..ApiScope::new(model.name.clone().unwrap_or_default())
    }
}

fn copy_api_scope(target: &mut ApiScope, source: &ApiScope) {
    *target = ApiScope {
        id: target.id,
        created: target.created,
        updated: target.updated,
        last_accessed: target.last_accessed,
        user_claims: std::mem::take(&mut target.user_claims),
        properties: std::mem::take(&mut target.properties),
        ..source.without_relations()
    };
}

// ============================================================================
// API resources
// ============================================================================

/// The API resource family, identified by `Name`.
#[must_use]
pub fn api_resources() -> EntityFamily<ApiResourceModel, ApiResource> {
    EntityFamily::new(
        "Name",
        ApiResourceModel::identifier,
        api_resource_entity,
        copy_api_resource,
    )
    .with_relation(Relation::of::<ApiResourceScope>(reconcile_api_resource_scope))
    // Secrets have no natural key and pair by position.
    .with_relation(Relation::of::<ApiResourceSecret>(reconcile_api_resource_secret))
    .with_relation(Relation::of::<ApiResourceClaim>(reconcile_api_resource_claim))
    .with_relation(Relation::of::<ApiResourceProperty>(reconcile_api_resource_property))
}

fn api_resource_entity(model: &ApiResourceModel) -> ApiResource {
    let algorithms = model.allowed_access_token_signing_algorithms.join(",");

    ApiResource {
        display_name: model.display_name.clone(),
        description: model.description.clone(),
        enabled: model.enabled,
        allowed_access_token_signing_algorithms: (!algorithms.is_empty()).then_some(algorithms),
        show_in_discovery_document: model.show_in_discovery_document,
        require_resource_indicator: model.require_resource_indicator,
        non_editable: model.non_editable,
        scopes: model
            .scopes
            .iter()
            .map(|scope| ApiResourceScope {
                id: Uuid::now_v7(),
                scope: scope.clone(),
            })
            .collect(),
        secrets: model
            .api_secrets
            .iter()
            .map(|secret| ApiResourceSecret {
                id: Uuid::now_v7(),
                secret: secret.into(),
            })
            .collect(),
        user_claims: model
            .user_claims
            .iter()
            .map(|claim_type| ApiResourceClaim {
                id: Uuid::now_v7(),
                claim_type: claim_type.clone(),
            })
            .collect(),
        properties: model
            .properties
            .iter()
            .map(|(key, value)| ApiResourceProperty {
                id: Uuid::now_v7(),
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
        ..ApiResource::new(model.name.clone().unwrap_or_default())
    }
}

fn copy_api_resource(target: &mut ApiResource, source: &ApiResource) {
    *target = ApiResource {
        id: target.id,
        created: target.created,
        updated: target.updated,
        last_accessed: target.last_accessed,
        scopes: std::mem::take(&mut target.scopes),
        secrets: std::mem::take(&mut target.secrets),
        user_claims: std::mem::take(&mut target.user_claims),
        properties: std::mem::take(&mut target.properties),
        ..source.without_relations()
    };
}

fn reconcile_identity_resource_claim(entity: &mut IdentityResource, import: &IdentityResource) {
    fn key(row: &IdentityResourceClaim) -> &str {
        &row.claim_type
    }
    reconcile_rows(
        &mut entity.user_claims,
        &import.user_claims,
        Matcher::by_key(key),
        |row, from| row.claim_type.clone_from(&from.claim_type),
    );
}

fn reconcile_identity_resource_property(entity: &mut IdentityResource, import: &IdentityResource) {
    fn key(row: &IdentityResourceProperty) -> &str {
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

fn reconcile_api_scope_claim(entity: &mut ApiScope, import: &ApiScope) {
    fn key(row: &ApiScopeClaim) -> &str {
        &row.claim_type
    }
    reconcile_rows(
        &mut entity.user_claims,
        &import.user_claims,
        Matcher::by_key(key),
        |row, from| row.claim_type.clone_from(&from.claim_type),
    );
}

fn reconcile_api_scope_property(entity: &mut ApiScope, import: &ApiScope) {
    fn key(row: &ApiScopeProperty) -> &str {
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

fn reconcile_api_resource_scope(entity: &mut ApiResource, import: &ApiResource) {
    fn key(row: &ApiResourceScope) -> &str {
        &row.scope
    }
    reconcile_rows(
        &mut entity.scopes,
        &import.scopes,
        Matcher::by_key(key),
        |row, from| row.scope.clone_from(&from.scope),
    );
}

fn reconcile_api_resource_secret(entity: &mut ApiResource, import: &ApiResource) {
    reconcile_rows(
        &mut entity.secrets,
        &import.secrets,
        Matcher::positional(),
        |row, from| copy_secret(&mut row.secret, &from.secret),
    );
}

fn reconcile_api_resource_claim(entity: &mut ApiResource, import: &ApiResource) {
    fn key(row: &ApiResourceClaim) -> &str {
        &row.claim_type
    }
    reconcile_rows(
        &mut entity.user_claims,
        &import.user_claims,
        Matcher::by_key(key),
        |row, from| row.claim_type.clone_from(&from.claim_type),
    );
}

fn reconcile_api_resource_property(entity: &mut ApiResource, import: &ApiResource) {
    fn key(row: &ApiResourceProperty) -> &str {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_default_to_plural_names() {
        assert_eq!(identity_resources().section(), "IdentityResources");
        assert_eq!(api_scopes().section(), "ApiScopes");
        assert_eq!(api_resources().section(), "ApiResources");
    }

    #[test]
    fn signing_algorithms_are_joined() {
        let mut model = ApiResourceModel::new("orders");
        assert_eq!(api_resource_entity(&model).allowed_access_token_signing_algorithms, None);

        model.allowed_access_token_signing_algorithms = vec!["RS256".to_string(), "ES256".to_string()];
        assert_eq!(
            api_resource_entity(&model)
                .allowed_access_token_signing_algorithms
                .as_deref(),
            Some("RS256,ES256")
        );
    }

    #[test]
    fn copy_keeps_created_and_relations() {
        let mut stored = identity_resource_entity(&IdentityResourceModel::new("profile").with_claim("name"));
        let created = stored.created;
        let mut incoming = identity_resource_entity(&IdentityResourceModel::new("profile"));
        incoming.display_name = Some("Profile".to_string());

        copy_identity_resource(&mut stored, &incoming);

        assert_eq!(stored.created, created);
        assert_eq!(stored.display_name.as_deref(), Some("Profile"));
        assert_eq!(stored.user_claims.len(), 1);
    }
}
