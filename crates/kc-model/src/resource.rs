//! Resource domain models.
//!
//! Identity resources group user claims exposed through the identity token,
//! API scopes are the scopes clients request for API access, and API
//! resources describe the protected APIs that own those scopes.

use chrono::{DateTime, Utc};
use kc_storage::{Entity, RelationDiff};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::secret::SecretData;

// ============================================================================
// Identity resources
// ============================================================================

/// A named group of user claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct IdentityResource {
    /// Surrogate key.
    pub id: Uuid,
    /// Unique resource name (e.g. `openid`, `profile`).
    pub name: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the resource is enabled.
    pub enabled: bool,
    /// Whether consent for this resource is mandatory.
    pub required: bool,
    /// Whether the consent screen emphasizes this resource.
    pub emphasize: bool,
    /// Whether the resource is listed in the discovery document.
    pub show_in_discovery_document: bool,
    /// When the resource was created.
    pub created: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated: Option<DateTime<Utc>>,
    /// Whether the resource is protected from edits.
    pub non_editable: bool,
    /// User claim types included in the resource.
    pub user_claims: Vec<IdentityResourceClaim>,
    /// Custom properties.
    pub properties: Vec<IdentityResourceProperty>,
}

impl IdentityResource {
    /// Creates an enabled identity resource.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            display_name: None,
            description: None,
            enabled: true,
            required: false,
            emphasize: false,
            show_in_discovery_document: true,
            created: Utc::now(),
            updated: None,
            non_editable: false,
            user_claims: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Adds a user claim type.
    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>) -> Self {
        self.user_claims.push(IdentityResourceClaim::new(claim_type));
        self
    }
}

impl Entity for IdentityResource {
    const TYPE_NAME: &'static str = "IdentityResource";

    fn id(&self) -> Uuid {
        self.id
    }

    fn identifier(&self) -> &str {
        &self.name
    }

    fn without_relations(&self) -> Self {
        Self {
            user_claims: Vec::new(),
            properties: Vec::new(),
            ..self.clone()
        }
    }

    fn diff_relations(original: Option<&Self>, current: Option<&Self>, diff: &mut RelationDiff) {
        diff.compare(original, current, |r| r.user_claims.as_slice());
        diff.compare(original, current, |r| r.properties.as_slice());
    }
}

/// A user claim type included in an identity resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityResourceClaim {
    /// Surrogate key.
    pub id: Uuid,
    /// Claim type.
    pub claim_type: String,
}

impl IdentityResourceClaim {
    /// Creates a new claim row.
    #[must_use]
    pub fn new(claim_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            claim_type: claim_type.into(),
        }
    }
}

/// A custom identity resource property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityResourceProperty {
    /// Surrogate key.
    pub id: Uuid,
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: String,
}

// ============================================================================
// API scopes
// ============================================================================

/// A scope clients may request to access APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ApiScope {
    /// Surrogate key.
    pub id: Uuid,
    /// Unique scope name.
    pub name: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the scope is enabled.
    pub enabled: bool,
    /// Whether consent for this scope is mandatory.
    pub required: bool,
    /// Whether the consent screen emphasizes this scope.
    pub emphasize: bool,
    /// Whether the scope is listed in the discovery document.
    pub show_in_discovery_document: bool,
    /// When the scope was created.
    pub created: DateTime<Utc>,
    /// When the scope was last updated.
    pub updated: Option<DateTime<Utc>>,
    /// When the scope was last used.
    pub last_accessed: Option<DateTime<Utc>>,
    /// Whether the scope is protected from edits.
    pub non_editable: bool,
    /// User claim types added to access tokens carrying the scope.
    pub user_claims: Vec<ApiScopeClaim>,
    /// Custom properties.
    pub properties: Vec<ApiScopeProperty>,
}

impl ApiScope {
    /// Creates an enabled API scope.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            display_name: None,
            description: None,
            enabled: true,
            required: false,
            emphasize: false,
            show_in_discovery_document: true,
            created: Utc::now(),
            updated: None,
            last_accessed: None,
            non_editable: false,
            user_claims: Vec::new(),
            properties: Vec::new(),
        }
    }
}

impl Entity for ApiScope {
    const TYPE_NAME: &'static str = "ApiScope";

    fn id(&self) -> Uuid {
        self.id
    }

    fn identifier(&self) -> &str {
        &self.name
    }

    fn without_relations(&self) -> Self {
        Self {
            user_claims: Vec::new(),
            properties: Vec::new(),
            ..self.clone()
        }
    }

    fn diff_relations(original: Option<&Self>, current: Option<&Self>, diff: &mut RelationDiff) {
        diff.compare(original, current, |s| s.user_claims.as_slice());
        diff.compare(original, current, |s| s.properties.as_slice());
    }
}

/// A user claim type attached to an API scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiScopeClaim {
    /// Surrogate key.
    pub id: Uuid,
    /// Claim type.
    pub claim_type: String,
}

/// A custom API scope property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiScopeProperty {
    /// Surrogate key.
    pub id: Uuid,
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: String,
}

// ============================================================================
// API resources
// ============================================================================

/// A protected API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResource {
    /// Surrogate key.
    pub id: Uuid,
    /// Unique resource name (used as audience).
    pub name: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the resource is enabled.
    pub enabled: bool,
    /// Comma-separated signing algorithms accepted for access tokens.
    pub allowed_access_token_signing_algorithms: Option<String>,
    /// Whether the resource is listed in the discovery document.
    pub show_in_discovery_document: bool,
    /// Whether clients must send a resource indicator.
    pub require_resource_indicator: bool,
    /// When the resource was created.
    pub created: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated: Option<DateTime<Utc>>,
    /// When the resource was last used.
    pub last_accessed: Option<DateTime<Utc>>,
    /// Whether the resource is protected from edits.
    pub non_editable: bool,
    /// Scopes owned by the resource.
    pub scopes: Vec<ApiResourceScope>,
    /// Secrets used for token introspection.
    pub secrets: Vec<ApiResourceSecret>,
    /// User claim types added to access tokens for the resource.
    pub user_claims: Vec<ApiResourceClaim>,
    /// Custom properties.
    pub properties: Vec<ApiResourceProperty>,
}

impl ApiResource {
    /// Creates an enabled API resource.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            display_name: None,
            description: None,
            enabled: true,
            allowed_access_token_signing_algorithms: None,
            show_in_discovery_document: true,
            require_resource_indicator: false,
            created: Utc::now(),
            updated: None,
            last_accessed: None,
            non_editable: false,
            scopes: Vec::new(),
            secrets: Vec::new(),
            user_claims: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Adds an owned scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(ApiResourceScope {
            id: Uuid::now_v7(),
            scope: scope.into(),
        });
        self
    }

    /// Adds a shared secret.
    #[must_use]
    pub fn with_secret(mut self, value: impl Into<String>) -> Self {
        self.secrets.push(ApiResourceSecret {
            id: Uuid::now_v7(),
            secret: SecretData::new(value),
        });
        self
    }
}

impl Entity for ApiResource {
    const TYPE_NAME: &'static str = "ApiResource";

    fn id(&self) -> Uuid {
        self.id
    }

    fn identifier(&self) -> &str {
        &self.name
    }

    fn without_relations(&self) -> Self {
        Self {
            scopes: Vec::new(),
            secrets: Vec::new(),
            user_claims: Vec::new(),
            properties: Vec::new(),
            ..self.clone()
        }
    }

    fn diff_relations(original: Option<&Self>, current: Option<&Self>, diff: &mut RelationDiff) {
        diff.compare(original, current, |r| r.scopes.as_slice());
        diff.compare(original, current, |r| r.secrets.as_slice());
        diff.compare(original, current, |r| r.user_claims.as_slice());
        diff.compare(original, current, |r| r.properties.as_slice());
    }
}

/// A scope owned by an API resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResourceScope {
    /// Surrogate key.
    pub id: Uuid,
    /// Scope name.
    pub scope: String,
}

/// An API resource secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResourceSecret {
    /// Surrogate key.
    pub id: Uuid,
    /// Secret payload.
    #[serde(flatten)]
    pub secret: SecretData,
}

/// A user claim type attached to an API resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResourceClaim {
    /// Surrogate key.
    pub id: Uuid,
    /// Claim type.
    pub claim_type: String,
}

/// A custom API resource property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResourceProperty {
    /// Surrogate key.
    pub id: Uuid,
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: String,
}

relation_row! {
    IdentityResourceClaim => "IdentityResourceClaim",
    IdentityResourceProperty => "IdentityResourceProperty",
    ApiScopeClaim => "ApiScopeClaim",
    ApiScopeProperty => "ApiScopeProperty",
    ApiResourceScope => "ApiResourceScope",
    ApiResourceSecret => "ApiResourceSecret",
    ApiResourceClaim => "ApiResourceClaim",
    ApiResourceProperty => "ApiResourceProperty",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_resource_counts() {
        let resource = IdentityResource::new("profile")
            .with_claim("name")
            .with_claim("family_name");
        let counts = resource.relation_counts();

        assert_eq!(counts["IdentityResourceClaim"], 2);
        assert_eq!(counts["IdentityResourceProperty"], 0);
    }

    #[test]
    fn api_resource_scalar_view() {
        let resource = ApiResource::new("orders")
            .with_scope("orders.read")
            .with_secret("s3cret");
        let scalars = resource.without_relations();

        assert_eq!(scalars.name, "orders");
        assert!(scalars.scopes.is_empty());
        assert!(scalars.secrets.is_empty());
        assert_eq!(resource.relation_counts()["ApiResourceSecret"], 1);
    }
}
