//! Local identity import models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClaimModel;

/// Desired state of a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleModel {
    /// Role name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Claims granted through the role.
    pub claims: Vec<ClaimModel>,
}

impl RoleModel {
    /// Creates a role model.
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

    /// Adds a claim.
    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(ClaimModel::new(claim_type, value));
        self
    }
}

/// Desired state of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)] // Fields mirror kc_model::User
pub struct UserModel {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub password_hash: Option<String>,
    pub two_factor_enabled: bool,
    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub claims: Vec<ClaimModel>,
    pub roles: Vec<String>,
}

impl Default for UserModel {
    fn default() -> Self {
        Self {
            user_name: None,
            email: None,
            email_confirmed: false,
            phone_number: None,
            phone_number_confirmed: false,
            password_hash: None,
            two_factor_enabled: false,
            lockout_enabled: true,
            lockout_end: None,
            claims: Vec::new(),
            roles: Vec::new(),
        }
    }
}

impl UserModel {
    /// Creates a user model.
    #[must_use]
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            ..Self::default()
        }
    }

    /// Identifier used for matching.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Assigns a role by name.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Adds a claim.
    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(ClaimModel::new(claim_type, value));
        self
    }
}
