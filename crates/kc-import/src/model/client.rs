//! Client import model.

use std::collections::BTreeMap;

use kc_model::{AccessTokenType, TokenExpiration, TokenUsage};
use serde::{Deserialize, Serialize};

use super::{ClaimModel, SecretModel};

/// Desired state of a client.
///
/// Relations are plain values; properties are keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools, missing_docs)] // Fields mirror kc_model::Client
pub struct ClientModel {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
    pub protocol_type: String,
    pub require_client_secret: bool,
    pub require_consent: bool,
    pub allow_remember_consent: bool,
    pub require_pkce: bool,
    pub allow_plain_text_pkce: bool,
    pub allow_offline_access: bool,
    pub allow_access_tokens_via_browser: bool,
    pub enable_local_login: bool,
    pub client_uri: Option<String>,
    pub logo_uri: Option<String>,
    pub front_channel_logout_uri: Option<String>,
    pub back_channel_logout_uri: Option<String>,
    pub identity_token_lifetime: i32,
    pub access_token_lifetime: i32,
    pub authorization_code_lifetime: i32,
    pub absolute_refresh_token_lifetime: i32,
    pub sliding_refresh_token_lifetime: i32,
    pub consent_lifetime: Option<i32>,
    pub refresh_token_usage: TokenUsage,
    pub refresh_token_expiration: TokenExpiration,
    pub access_token_type: AccessTokenType,
    pub include_jwt_id: bool,
    pub always_send_client_claims: bool,
    pub client_claims_prefix: Option<String>,
    pub pair_wise_subject_salt: Option<String>,
    pub non_editable: bool,
    pub allowed_grant_types: Vec<String>,
    pub redirect_uris: Vec<String>,
    pub post_logout_redirect_uris: Vec<String>,
    pub allowed_scopes: Vec<String>,
    pub client_secrets: Vec<SecretModel>,
    pub claims: Vec<ClaimModel>,
    pub allowed_cors_origins: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub identity_provider_restrictions: Vec<String>,
}

impl Default for ClientModel {
    fn default() -> Self {
        Self {
            client_id: None,
            client_name: None,
            description: None,
            enabled: true,
            protocol_type: "oidc".to_string(),
            require_client_secret: true,
            require_consent: false,
            allow_remember_consent: true,
            require_pkce: true,
            allow_plain_text_pkce: false,
            allow_offline_access: false,
            allow_access_tokens_via_browser: false,
            enable_local_login: true,
            client_uri: None,
            logo_uri: None,
            front_channel_logout_uri: None,
            back_channel_logout_uri: None,
            identity_token_lifetime: 300,
            access_token_lifetime: 3600,
            authorization_code_lifetime: 300,
            absolute_refresh_token_lifetime: 2_592_000,
            sliding_refresh_token_lifetime: 1_296_000,
            consent_lifetime: None,
            refresh_token_usage: TokenUsage::default(),
            refresh_token_expiration: TokenExpiration::default(),
            access_token_type: AccessTokenType::default(),
            include_jwt_id: true,
            always_send_client_claims: false,
            client_claims_prefix: Some("client_".to_string()),
            pair_wise_subject_salt: None,
            non_editable: false,
            allowed_grant_types: Vec::new(),
            redirect_uris: Vec::new(),
            post_logout_redirect_uris: Vec::new(),
            allowed_scopes: Vec::new(),
            client_secrets: Vec::new(),
            claims: Vec::new(),
            allowed_cors_origins: Vec::new(),
            properties: BTreeMap::new(),
            identity_provider_restrictions: Vec::new(),
        }
    }
}

impl ClientModel {
    /// Creates a client model with default settings.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            ..Self::default()
        }
    }

    /// Identifier used for matching.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Adds an allowed grant type.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.allowed_grant_types.push(grant_type.into());
        self
    }

    /// Adds a shared secret.
    #[must_use]
    pub fn with_secret(mut self, value: impl Into<String>) -> Self {
        self.client_secrets.push(SecretModel::new(value));
        self
    }

    /// Adds a redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    /// Adds an allowed CORS origin.
    #[must_use]
    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_cors_origins.push(origin.into());
        self
    }

    /// Adds an allowed scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.allowed_scopes.push(scope.into());
        self
    }
}
