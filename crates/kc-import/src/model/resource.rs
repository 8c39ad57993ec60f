//! Resource import models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SecretModel;

/// Desired state of an identity resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools, missing_docs)] // Fields mirror kc_model::IdentityResource
pub struct IdentityResourceModel {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
    pub required: bool,
    pub emphasize: bool,
    pub show_in_discovery_document: bool,
    pub non_editable: bool,
    pub user_claims: Vec<String>,
    pub properties: BTreeMap<String, String>,
}

impl Default for IdentityResourceModel {
    fn default() -> Self {
        Self {
            name: None,
            display_name: None,
            description: None,
            enabled: true,
            required: false,
            emphasize: false,
            show_in_discovery_document: true,
            non_editable: false,
            user_claims: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl IdentityResourceModel {
    /// Creates an identity resource model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Identifier used for matching.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Adds a user claim type.
    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>) -> Self {
        self.user_claims.push(claim_type.into());
        self
    }
}

/// Desired state of an API scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools, missing_docs)] // Fields mirror kc_model::ApiScope
pub struct ApiScopeModel {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
    pub required: bool,
    pub emphasize: bool,
    pub show_in_discovery_document: bool,
    pub non_editable: bool,
    pub user_claims: Vec<String>,
    pub properties: BTreeMap<String, String>,
}

impl Default for ApiScopeModel {
    fn default() -> Self {
        Self {
            name: None,
            display_name: None,
            description: None,
            enabled: true,
            required: false,
            emphasize: false,
            show_in_discovery_document: true,
            non_editable: false,
            user_claims: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl ApiScopeModel {
    /// Creates an API scope model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Identifier used for matching.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Desired state of an API resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)] // Fields mirror kc_model::ApiResource
pub struct ApiResourceModel {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
    pub allowed_access_token_signing_algorithms: Vec<String>,
    pub show_in_discovery_document: bool,
    pub require_resource_indicator: bool,
    pub non_editable: bool,
    pub scopes: Vec<String>,
    pub api_secrets: Vec<SecretModel>,
    pub user_claims: Vec<String>,
    pub properties: BTreeMap<String, String>,
}

impl Default for ApiResourceModel {
    fn default() -> Self {
        Self {
            name: None,
            display_name: None,
            description: None,
            enabled: true,
            allowed_access_token_signing_algorithms: Vec::new(),
            show_in_discovery_document: true,
            require_resource_indicator: false,
            non_editable: false,
            scopes: Vec::new(),
            api_secrets: Vec::new(),
            user_claims: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl ApiResourceModel {
    /// Creates an API resource model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Identifier used for matching.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Adds an owned scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds a shared secret.
    #[must_use]
    pub fn with_secret(mut self, value: impl Into<String>) -> Self {
        self.api_secrets.push(SecretModel::new(value));
        self
    }
}
