//! Shared secret payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default secret type for shared secrets.
pub const SHARED_SECRET: &str = "SharedSecret";

/// Fields common to client and API resource secrets.
///
/// Secrets are identified only by their (usually hashed) value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretData {
    /// Optional description.
    pub description: Option<String>,
    /// Secret value.
    pub value: String,
    /// Expiration instant, if any.
    pub expiration: Option<DateTime<Utc>>,
    /// Secret type (e.g. `SharedSecret`, `X509Thumbprint`).
    pub secret_type: String,
    /// When the secret was issued.
    pub created: DateTime<Utc>,
}

impl SecretData {
    /// Creates a shared secret issued now.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            description: None,
            value: value.into(),
            expiration: None,
            secret_type: SHARED_SECRET.to_string(),
            created: Utc::now(),
        }
    }

    /// Overwrites the mutable fields from `other`.
    ///
    /// If any field differs the secret counts as re-issued and takes
    /// `other.created`; otherwise `created` is left untouched.
    pub fn overwrite_from(&mut self, other: &Self) {
        let reissued = self.description != other.description
            || self.value != other.value
            || self.expiration != other.expiration
            || self.secret_type != other.secret_type;

        if reissued {
            self.description.clone_from(&other.description);
            self.value.clone_from(&other.value);
            self.expiration = other.expiration;
            self.secret_type.clone_from(&other.secret_type);
            self.created = other.created;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn identical_secret_keeps_created() {
        let mut stored = SecretData::new("s3cret");
        stored.created -= Duration::days(10);
        let before = stored.created;

        stored.overwrite_from(&SecretData::new("s3cret"));

        assert_eq!(stored.created, before);
    }

    #[test]
    fn changed_value_resets_created() {
        let mut stored = SecretData::new("old");
        stored.created -= Duration::days(10);
        let incoming = SecretData::new("new");

        stored.overwrite_from(&incoming);

        assert_eq!(stored.value, "new");
        assert_eq!(stored.created, incoming.created);
    }

    #[test]
    fn changed_expiration_resets_created() {
        let mut stored = SecretData::new("s3cret");
        stored.created -= Duration::days(10);
        let mut incoming = SecretData::new("s3cret");
        incoming.expiration = Some(Utc::now() + Duration::days(30));

        stored.overwrite_from(&incoming);

        assert_eq!(stored.expiration, incoming.expiration);
        assert_eq!(stored.created, incoming.created);
    }
}
