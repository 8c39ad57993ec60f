//! Domain validation of import models.
//!
//! Validators reject individual models with a message; rejected models are
//! reported and skipped without aborting the pass.

use std::collections::HashSet;

use url::Url;

use crate::model::ClientModel;

/// Validates one import model.
pub trait ModelValidator<M>: Send + Sync {
    /// Checks a model.
    ///
    /// ## Errors
    ///
    /// Returns the message to report if the model must be skipped.
    fn validate(&self, model: &M) -> Result<(), String>;
}

/// Well-known grant type names.
pub mod grant_types {
    /// Implicit flow.
    pub const IMPLICIT: &str = "implicit";
    /// Authorization code flow.
    pub const AUTHORIZATION_CODE: &str = "authorization_code";
    /// Hybrid flow.
    pub const HYBRID: &str = "hybrid";
    /// Client credentials flow.
    pub const CLIENT_CREDENTIALS: &str = "client_credentials";
    /// Resource owner password flow.
    pub const PASSWORD: &str = "password";
    /// Device authorization flow.
    pub const DEVICE_FLOW: &str = "urn:ietf:params:oauth:grant-type:device_code";
}

const EXCLUSIVE_GRANT_TYPES: [(&str, &str); 3] = [
    (grant_types::IMPLICIT, grant_types::AUTHORIZATION_CODE),
    (grant_types::IMPLICIT, grant_types::HYBRID),
    (grant_types::AUTHORIZATION_CODE, grant_types::HYBRID),
];

/// Semantic checks for client models.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientConfigurationValidator;

impl ClientConfigurationValidator {
    fn check(model: &ClientModel) -> Result<(), String> {
        check_grant_types(model)?;
        check_secrets(model)?;
        check_lifetimes(model)?;

        for uri in &model.redirect_uris {
            check_absolute(uri, "redirect URI")?;
        }
        for uri in &model.post_logout_redirect_uris {
            check_absolute(uri, "post-logout redirect URI")?;
        }
        for origin in &model.allowed_cors_origins {
            check_origin(origin)?;
        }
        Ok(())
    }
}

impl ModelValidator<ClientModel> for ClientConfigurationValidator {
    fn validate(&self, model: &ClientModel) -> Result<(), String> {
        Self::check(model).map_err(|reason| {
            format!(
                "Client \"{}\": {reason}",
                model.client_id.as_deref().unwrap_or_default()
            )
        })
    }
}

fn check_grant_types(model: &ClientModel) -> Result<(), String> {
    if model.allowed_grant_types.is_empty() {
        return Err("at least one grant type is required".to_string());
    }

    let mut seen = HashSet::new();
    for grant_type in &model.allowed_grant_types {
        if !seen.insert(grant_type.to_lowercase()) {
            return Err(format!("grant type \"{grant_type}\" is listed more than once"));
        }
    }

    for (first, second) in EXCLUSIVE_GRANT_TYPES {
        if seen.contains(first) && seen.contains(second) {
            return Err(format!(
                "grant types \"{first}\" and \"{second}\" cannot be combined"
            ));
        }
    }
    Ok(())
}

fn check_secrets(model: &ClientModel) -> Result<(), String> {
    if !model.require_client_secret || !model.client_secrets.is_empty() {
        return Ok(());
    }

    match model
        .allowed_grant_types
        .iter()
        .find(|g| !g.eq_ignore_ascii_case(grant_types::IMPLICIT))
    {
        Some(grant_type) => Err(format!(
            "grant type \"{grant_type}\" requires a client secret"
        )),
        None => Ok(()),
    }
}

fn check_lifetimes(model: &ClientModel) -> Result<(), String> {
    if model.access_token_lifetime <= 0 {
        return Err("access token lifetime must be positive".to_string());
    }
    if model.identity_token_lifetime <= 0 {
        return Err("identity token lifetime must be positive".to_string());
    }
    if model.absolute_refresh_token_lifetime < 0 {
        return Err("absolute refresh token lifetime must not be negative".to_string());
    }
    if model.absolute_refresh_token_lifetime > 0
        && model.sliding_refresh_token_lifetime > model.absolute_refresh_token_lifetime
    {
        return Err("sliding refresh token lifetime exceeds the absolute lifetime".to_string());
    }
    Ok(())
}

fn check_absolute(uri: &str, what: &str) -> Result<(), String> {
    Url::parse(uri)
        .map(|_| ())
        .map_err(|_| format!("{what} \"{uri}\" is not an absolute URL"))
}

fn check_origin(origin: &str) -> Result<(), String> {
    let invalid = || format!("CORS origin \"{origin}\" must be scheme://host[:port]");

    let url = Url::parse(origin).map_err(|_| invalid())?;
    let bare = url.has_host()
        && url.path() == "/"
        && !origin.ends_with('/')
        && url.query().is_none()
        && url.fragment().is_none()
        && url.username().is_empty()
        && url.password().is_none();

    if bare { Ok(()) } else { Err(invalid()) }
}
