//! Client domain model.
//!
//! Clients represent applications that can request tokens from the
//! identity provider (OAuth 2.0 / OIDC clients).

use chrono::{DateTime, Utc};
use kc_storage::{Entity, RelationDiff};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::secret::SecretData;

/// Refresh token reuse policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenUsage {
    /// The refresh token handle stays the same when refreshing.
    ReUse,
    /// The refresh token handle is replaced on every refresh.
    #[default]
    OneTimeOnly,
}

/// Refresh token lifetime policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenExpiration {
    /// Lifetime is renewed on refresh, up to the absolute lifetime.
    Sliding,
    /// Token expires at a fixed point in time.
    #[default]
    Absolute,
}

/// Access token format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessTokenType {
    /// Self-contained JWT.
    #[default]
    Jwt,
    /// Reference token resolved through introspection.
    Reference,
}

/// An OAuth 2.0 / OIDC client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // Domain model naturally has many boolean flags
pub struct Client {
    // === Identity ===
    /// Surrogate key.
    pub id: Uuid,
    /// Unique client identifier (OAuth `client_id`).
    pub client_id: String,
    /// Display name.
    pub client_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the client is enabled.
    pub enabled: bool,
    /// Protocol type (e.g. `oidc`).
    pub protocol_type: String,

    // === Timestamps ===
    /// When the client was created.
    pub created: DateTime<Utc>,
    /// When the client was last updated.
    pub updated: Option<DateTime<Utc>>,
    /// When the client was last used.
    pub last_accessed: Option<DateTime<Utc>>,

    // === Authentication ===
    /// Whether a secret is required at the token endpoint.
    pub require_client_secret: bool,
    /// Whether the consent screen is shown.
    pub require_consent: bool,
    /// Whether users may remember consent decisions.
    pub allow_remember_consent: bool,
    /// Whether PKCE is required for code flows.
    pub require_pkce: bool,
    /// Whether plain-text PKCE challenges are accepted.
    pub allow_plain_text_pkce: bool,
    /// Whether refresh tokens may be requested.
    pub allow_offline_access: bool,
    /// Whether access tokens may be sent through the browser.
    pub allow_access_tokens_via_browser: bool,
    /// Whether local login is allowed.
    pub enable_local_login: bool,

    // === URLs ===
    /// Client home page.
    pub client_uri: Option<String>,
    /// Client logo.
    pub logo_uri: Option<String>,
    /// Front-channel logout endpoint.
    pub front_channel_logout_uri: Option<String>,
    /// Back-channel logout endpoint.
    pub back_channel_logout_uri: Option<String>,

    // === Token lifetimes (seconds) ===
    /// Identity token lifetime.
    pub identity_token_lifetime: i32,
    /// Access token lifetime.
    pub access_token_lifetime: i32,
    /// Authorization code lifetime.
    pub authorization_code_lifetime: i32,
    /// Absolute refresh token lifetime (0 means unlimited).
    pub absolute_refresh_token_lifetime: i32,
    /// Sliding refresh token lifetime.
    pub sliding_refresh_token_lifetime: i32,
    /// Consent lifetime (`None` means unlimited).
    pub consent_lifetime: Option<i32>,

    // === Token policy ===
    /// Refresh token reuse policy.
    pub refresh_token_usage: TokenUsage,
    /// Refresh token lifetime policy.
    pub refresh_token_expiration: TokenExpiration,
    /// Access token format.
    pub access_token_type: AccessTokenType,
    /// Whether a `jti` claim is added to access tokens.
    pub include_jwt_id: bool,
    /// Whether client claims are sent on every flow.
    pub always_send_client_claims: bool,
    /// Prefix for client claim types.
    pub client_claims_prefix: Option<String>,
    /// Salt for pairwise subject identifiers.
    pub pair_wise_subject_salt: Option<String>,

    /// Whether the client is protected from edits.
    pub non_editable: bool,

    // === Relations ===
    /// Allowed grant types.
    pub allowed_grant_types: Vec<ClientGrantType>,
    /// Allowed redirect URIs.
    pub redirect_uris: Vec<ClientRedirectUri>,
    /// Allowed post-logout redirect URIs.
    pub post_logout_redirect_uris: Vec<ClientPostLogoutRedirectUri>,
    /// Allowed scopes.
    pub allowed_scopes: Vec<ClientScope>,
    /// Client secrets.
    pub client_secrets: Vec<ClientSecret>,
    /// Claims added to tokens for this client.
    pub claims: Vec<ClientClaim>,
    /// Allowed CORS origins.
    pub allowed_cors_origins: Vec<ClientCorsOrigin>,
    /// Custom properties.
    pub properties: Vec<ClientProperty>,
    /// External identity providers the client may use.
    pub identity_provider_restrictions: Vec<ClientIdpRestriction>,
}

impl Client {
    /// Creates an enabled client with default lifetimes and no relations.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            client_id: client_id.into(),
            client_name: None,
            description: None,
            enabled: true,
            protocol_type: "oidc".to_string(),
            created: Utc::now(),
            updated: None,
            last_accessed: None,
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
            properties: Vec::new(),
            identity_provider_restrictions: Vec::new(),
        }
    }

    /// Adds an allowed grant type.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.allowed_grant_types.push(ClientGrantType::new(grant_type));
        self
    }

    /// Adds a shared secret.
    #[must_use]
    pub fn with_secret(mut self, value: impl Into<String>) -> Self {
        self.client_secrets.push(ClientSecret::new(value));
        self
    }

    /// Adds a redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(ClientRedirectUri::new(uri));
        self
    }

    /// Adds an allowed scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.allowed_scopes.push(ClientScope::new(scope));
        self
    }
}

impl Entity for Client {
    const TYPE_NAME: &'static str = "Client";

    fn id(&self) -> Uuid {
        self.id
    }

    fn identifier(&self) -> &str {
        &self.client_id
    }

    fn without_relations(&self) -> Self {
        Self {
            allowed_grant_types: Vec::new(),
            redirect_uris: Vec::new(),
            post_logout_redirect_uris: Vec::new(),
            allowed_scopes: Vec::new(),
            client_secrets: Vec::new(),
            claims: Vec::new(),
            allowed_cors_origins: Vec::new(),
            properties: Vec::new(),
            identity_provider_restrictions: Vec::new(),
            ..self.clone()
        }
    }

    fn diff_relations(original: Option<&Self>, current: Option<&Self>, diff: &mut RelationDiff) {
        diff.compare(original, current, |c| c.allowed_grant_types.as_slice());
        diff.compare(original, current, |c| c.redirect_uris.as_slice());
        diff.compare(original, current, |c| c.post_logout_redirect_uris.as_slice());
        diff.compare(original, current, |c| c.allowed_scopes.as_slice());
        diff.compare(original, current, |c| c.client_secrets.as_slice());
        diff.compare(original, current, |c| c.claims.as_slice());
        diff.compare(original, current, |c| c.allowed_cors_origins.as_slice());
        diff.compare(original, current, |c| c.properties.as_slice());
        diff.compare(original, current, |c| c.identity_provider_restrictions.as_slice());
    }
}

/// An allowed grant type (e.g. `authorization_code`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientGrantType {
    /// Surrogate key.
    pub id: Uuid,
    /// Grant type name.
    pub grant_type: String,
}

impl ClientGrantType {
    /// Creates a new grant type row.
    #[must_use]
    pub fn new(grant_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            grant_type: grant_type.into(),
        }
    }
}

/// An allowed redirect URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRedirectUri {
    /// Surrogate key.
    pub id: Uuid,
    /// Absolute redirect URI.
    pub redirect_uri: String,
}

impl ClientRedirectUri {
    /// Creates a new redirect URI row.
    #[must_use]
    pub fn new(redirect_uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

/// An allowed post-logout redirect URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPostLogoutRedirectUri {
    /// Surrogate key.
    pub id: Uuid,
    /// Absolute redirect URI.
    pub post_logout_redirect_uri: String,
}

impl ClientPostLogoutRedirectUri {
    /// Creates a new post-logout redirect URI row.
    #[must_use]
    pub fn new(post_logout_redirect_uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            post_logout_redirect_uri: post_logout_redirect_uri.into(),
        }
    }
}

/// A scope the client may request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientScope {
    /// Surrogate key.
    pub id: Uuid,
    /// Scope name.
    pub scope: String,
}

impl ClientScope {
    /// Creates a new scope row.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            scope: scope.into(),
        }
    }
}

/// A client secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
    /// Surrogate key.
    pub id: Uuid,
    /// Secret payload.
    #[serde(flatten)]
    pub secret: SecretData,
}

impl ClientSecret {
    /// Creates a shared secret row issued now.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            secret: SecretData::new(value),
        }
    }
}

/// A claim added to tokens issued to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientClaim {
    /// Surrogate key.
    pub id: Uuid,
    /// Claim type.
    pub claim_type: String,
    /// Claim value.
    pub value: String,
}

impl ClientClaim {
    /// Creates a new claim row.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// An allowed CORS origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCorsOrigin {
    /// Surrogate key.
    pub id: Uuid,
    /// Origin (`scheme://host[:port]`).
    pub origin: String,
}

impl ClientCorsOrigin {
    /// Creates a new CORS origin row.
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            origin: origin.into(),
        }
    }
}

/// A custom client property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProperty {
    /// Surrogate key.
    pub id: Uuid,
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: String,
}

impl ClientProperty {
    /// Creates a new property row.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An external identity provider the client is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdpRestriction {
    /// Surrogate key.
    pub id: Uuid,
    /// Identity provider scheme.
    pub provider: String,
}

impl ClientIdpRestriction {
    /// Creates a new restriction row.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            provider: provider.into(),
        }
    }
}

relation_row! {
    ClientGrantType => "ClientGrantType",
    ClientRedirectUri => "ClientRedirectUri",
    ClientPostLogoutRedirectUri => "ClientPostLogoutRedirectUri",
    ClientScope => "ClientScope",
    ClientSecret => "ClientSecret",
    ClientClaim => "ClientClaim",
    ClientCorsOrigin => "ClientCorsOrigin",
    ClientProperty => "ClientProperty",
    ClientIdpRestriction => "ClientIdpRestriction",
}
