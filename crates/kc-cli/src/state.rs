//! JSON state file backing the in-memory store.

use std::path::Path;

use kc_model::{ApiResource, ApiScope, Client, IdentityProvider, IdentityResource, Role, User};
use kc_storage::InMemoryDatabase;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliResult;

/// Persisted configuration, one list per family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateFile {
    /// Identity resources.
    pub identity_resources: Vec<IdentityResource>,
    /// API scopes.
    pub api_scopes: Vec<ApiScope>,
    /// API resources.
    pub api_resources: Vec<ApiResource>,
    /// Clients.
    pub clients: Vec<Client>,
    /// External identity providers.
    pub identity_providers: Vec<IdentityProvider>,
    /// Roles.
    pub roles: Vec<Role>,
    /// Users.
    pub users: Vec<User>,
}

impl StateFile {
    /// Reads a state file; a missing file is an empty state.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no state file, starting empty");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the state file, replacing any previous content.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path = %path.display(), "state file written");
        Ok(())
    }

    /// Seeds a fresh database with this state.
    ///
    /// ## Errors
    ///
    /// Returns an error if the state holds colliding identifiers.
    pub fn into_database(self) -> CliResult<InMemoryDatabase> {
        let db = InMemoryDatabase::new();
        db.seed(self.identity_resources)?;
        db.seed(self.api_scopes)?;
        db.seed(self.api_resources)?;
        db.seed(self.clients)?;
        db.seed(self.identity_providers)?;
        db.seed(self.roles)?;
        db.seed(self.users)?;
        Ok(db)
    }

    /// Captures the committed state of a database.
    #[must_use]
    pub fn from_database(db: &InMemoryDatabase) -> Self {
        Self {
            identity_resources: db.export(),
            api_scopes: db.export(),
            api_resources: db.export(),
            clients: db.export(),
            identity_providers: db.export(),
            roles: db.export(),
            users: db.export(),
        }
    }
}
