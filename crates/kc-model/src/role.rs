//! Role domain model.
//!
//! Roles are assigned to local users for role-based access control.

use kc_storage::{Entity, RelationDiff};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A local identity role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Surrogate key.
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Upper-cased role name used for lookups.
    pub normalized_name: String,
    /// Role description.
    pub description: Option<String>,
    /// Claims granted to holders of the role.
    pub claims: Vec<RoleClaim>,
}

impl Role {
    /// Creates a role without claims.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::now_v7(),
            normalized_name: name.to_uppercase(),
            name,
            description: None,
            claims: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Adds a claim.
    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(RoleClaim::new(claim_type, value));
        self
    }
}

impl Entity for Role {
    const TYPE_NAME: &'static str = "Role";

    fn id(&self) -> Uuid {
        self.id
    }

    fn identifier(&self) -> &str {
        &self.name
    }

    fn without_relations(&self) -> Self {
        Self {
            claims: Vec::new(),
            ..self.clone()
        }
    }

    fn diff_relations(original: Option<&Self>, current: Option<&Self>, diff: &mut RelationDiff) {
        diff.compare(original, current, |r| r.claims.as_slice());
    }
}

/// A claim granted through a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClaim {
    /// Surrogate key.
    pub id: Uuid,
    /// Claim type.
    pub claim_type: String,
    /// Claim value.
    pub claim_value: String,
}

impl RoleClaim {
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

relation_row! {
    RoleClaim => "RoleClaim",
}
