//! # kc-model
//!
//! Persisted configuration entities.
//!
//! Each root entity carries a surrogate key, the logical identifier used
//! for matching and its relation collections. Relation rows have their
//! own surrogate key and no engine-wide identity.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

macro_rules! relation_row {
    ($($row:ty => $name:literal),+ $(,)?) => {
        $(
            impl kc_storage::Row for $row {
                const TYPE_NAME: &'static str = $name;

                fn row_id(&self) -> uuid::Uuid {
                    self.id
                }
            }
        )+
    };
}

pub mod client;
pub mod identity_provider;
pub mod resource;
pub mod role;
pub mod secret;
pub mod user;

pub use client::{
    AccessTokenType, Client, ClientClaim, ClientCorsOrigin, ClientGrantType, ClientIdpRestriction,
    ClientPostLogoutRedirectUri, ClientProperty, ClientRedirectUri, ClientScope, ClientSecret,
    TokenExpiration, TokenUsage,
};
pub use identity_provider::IdentityProvider;
pub use resource::{
    ApiResource, ApiResourceClaim, ApiResourceProperty, ApiResourceScope, ApiResourceSecret,
    ApiScope, ApiScopeClaim, ApiScopeProperty, IdentityResource, IdentityResourceClaim,
    IdentityResourceProperty,
};
pub use role::{Role, RoleClaim};
pub use secret::SecretData;
pub use user::{User, UserClaim, UserRole};
