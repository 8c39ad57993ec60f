//! User domain model.
//!
//! Local users belong to the identity area. They carry claims and role
//! assignments; role assignments refer to roles by name.

use chrono::{DateTime, Utc};
use kc_storage::{Entity, RelationDiff};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A local user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    // === Identity ===
    /// Surrogate key.
    pub id: Uuid,
    /// Unique user name.
    pub user_name: String,
    /// Upper-cased user name used for lookups.
    pub normalized_user_name: String,

    // === Contact ===
    /// Email address.
    pub email: Option<String>,
    /// Upper-cased email used for lookups.
    pub normalized_email: Option<String>,
    /// Whether the email has been confirmed.
    pub email_confirmed: bool,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Whether the phone number has been confirmed.
    pub phone_number_confirmed: bool,

    // === Security ===
    /// Hashed password, if the user signs in locally.
    pub password_hash: Option<String>,
    /// Whether two-factor authentication is enabled.
    pub two_factor_enabled: bool,
    /// Whether the account can be locked out.
    pub lockout_enabled: bool,
    /// End of the current lockout, if any.
    pub lockout_end: Option<DateTime<Utc>>,

    // === Relations ===
    /// User claims.
    pub claims: Vec<UserClaim>,
    /// Assigned roles.
    pub roles: Vec<UserRole>,
}

impl User {
    /// Creates a user without claims or roles.
    #[must_use]
    pub fn new(user_name: impl Into<String>) -> Self {
        let user_name = user_name.into();
        Self {
            id: Uuid::now_v7(),
            normalized_user_name: user_name.to_uppercase(),
            user_name,
            email: None,
            normalized_email: None,
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

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into();
        self.normalized_email = Some(email.to_uppercase());
        self.email = Some(email);
        self
    }

    /// Assigns a role by name.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(UserRole::new(role));
        self
    }

    /// Adds a claim.
    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(UserClaim::new(claim_type, value));
        self
    }
}

impl Entity for User {
    const TYPE_NAME: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }

    fn identifier(&self) -> &str {
        &self.user_name
    }

    fn without_relations(&self) -> Self {
        Self {
            claims: Vec::new(),
            roles: Vec::new(),
            ..self.clone()
        }
    }

    fn diff_relations(original: Option<&Self>, current: Option<&Self>, diff: &mut RelationDiff) {
        diff.compare(original, current, |u| u.claims.as_slice());
        diff.compare(original, current, |u| u.roles.as_slice());
    }
}

/// A claim attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaim {
    /// Surrogate key.
    pub id: Uuid,
    /// Claim type.
    pub claim_type: String,
    /// Claim value.
    pub claim_value: String,
}

impl UserClaim {
    /// Creates a new claim row.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, claim_value: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            claim_type: claim_type.into(),
            claim_value: claim_value.into(),
        }
    }
}

/// A role assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// Surrogate key.
    pub id: Uuid,
    /// Assigned role name.
    pub role_name: String,
}

impl UserRole {
    /// Creates a new role assignment row.
    #[must_use]
    pub fn new(role_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role_name: role_name.into(),
        }
    }
}

relation_row! {
    UserClaim => "UserClaim",
    UserRole => "UserRole",
}
