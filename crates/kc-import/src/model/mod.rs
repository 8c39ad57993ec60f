//! Import models.
//!
//! Desired-state records bound from configuration sections. Field names
//! are camelCase; unknown keys are ignored and missing keys take their
//! defaults.

pub mod client;
pub mod identity;
pub mod identity_provider;
pub mod resource;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::ClientModel;
pub use identity::{RoleModel, UserModel};
pub use identity_provider::IdentityProviderModel;
pub use resource::{ApiResourceModel, ApiScopeModel, IdentityResourceModel};

/// A secret as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretModel {
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Secret value.
    pub value: String,
    /// Expiration instant.
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
    /// Secret type.
    #[serde(rename = "type", default = "default_secret_type")]
    pub secret_type: String,
}

fn default_secret_type() -> String {
    kc_model::secret::SHARED_SECRET.to_string()
}

impl SecretModel {
    /// Creates a shared secret.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            description: None,
            value: value.into(),
            expiration: None,
            secret_type: default_secret_type(),
        }
    }
}

impl From<&SecretModel> for kc_model::SecretData {
    fn from(model: &SecretModel) -> Self {
        Self {
            description: model.description.clone(),
            value: model.value.clone(),
            expiration: model.expiration,
            secret_type: model.secret_type.clone(),
            created: Utc::now(),
        }
    }
}

/// A claim type/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimModel {
    /// Claim type.
    #[serde(rename = "type")]
    pub claim_type: String,
    /// Claim value.
    pub value: String,
}

impl ClaimModel {
    /// Creates a claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}
