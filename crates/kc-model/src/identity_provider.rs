//! External identity provider model.

use chrono::{DateTime, Utc};
use kc_storage::{Entity, RelationDiff};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An external login provider (e.g. an upstream OIDC provider).
///
/// Identity providers have no relation collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProvider {
    /// Surrogate key.
    pub id: Uuid,
    /// Unique authentication scheme.
    pub scheme: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Whether the provider is enabled.
    pub enabled: bool,
    /// Provider type (e.g. `oidc`).
    pub provider_type: String,
    /// Provider-specific settings, serialized.
    pub properties: Option<String>,
    /// When the provider was created.
    pub created: DateTime<Utc>,
    /// When the provider was last updated.
    pub updated: Option<DateTime<Utc>>,
    /// When the provider was last used.
    pub last_accessed: Option<DateTime<Utc>>,
    /// Whether the provider is protected from edits.
    pub non_editable: bool,
}

impl IdentityProvider {
    /// Creates an enabled OIDC provider.
    #[must_use]
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            scheme: scheme.into(),
            display_name: None,
            enabled: true,
            provider_type: "oidc".to_string(),
            properties: None,
            created: Utc::now(),
            updated: None,
            last_accessed: None,
            non_editable: false,
        }
    }
}

impl Entity for IdentityProvider {
    const TYPE_NAME: &'static str = "IdentityProvider";

    fn id(&self) -> Uuid {
        self.id
    }

    fn identifier(&self) -> &str {
        &self.scheme
    }

    fn without_relations(&self) -> Self {
        self.clone()
    }

    fn diff_relations(_: Option<&Self>, _: Option<&Self>, _: &mut RelationDiff) {}
}
