//! Identity provider import model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Desired state of an external identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityProviderModel {
    /// Authentication scheme.
    pub scheme: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Whether the provider is enabled.
    pub enabled: bool,
    /// Provider type.
    #[serde(rename = "type")]
    pub provider_type: String,
    /// Provider-specific settings, stored serialized.
    pub properties: Option<Value>,
    /// Whether the provider is protected from edits.
    pub non_editable: bool,
}

impl Default for IdentityProviderModel {
    fn default() -> Self {
        Self {
            scheme: None,
            display_name: None,
            enabled: true,
            provider_type: "oidc".to_string(),
            properties: None,
            non_editable: false,
        }
    }
}

impl IdentityProviderModel {
    /// Creates an identity provider model.
    #[must_use]
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            ..Self::default()
        }
    }

    /// Identifier used for matching.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.scheme.as_deref()
    }
}
