//! Identity provider family.

use kc_model::IdentityProvider;

use crate::model::IdentityProviderModel;
use crate::reconciler::EntityFamily;

/// The identity provider family, identified by `Scheme`. It has no
/// relations.
#[must_use]
pub fn identity_providers() -> EntityFamily<IdentityProviderModel, IdentityProvider> {
    EntityFamily::new("Scheme", IdentityProviderModel::identifier, to_entity, copy_scalars)
}

fn to_entity(model: &IdentityProviderModel) -> IdentityProvider {
    IdentityProvider {
        display_name: model.display_name.clone(),
        enabled: model.enabled,
        provider_type: model.provider_type.clone(),
        properties: model.properties.as_ref().map(ToString::to_string),
        non_editable: model.non_editable,
        ..IdentityProvider::new(model.scheme.clone().unwrap_or_default())
    }
}

fn copy_scalars(target: &mut IdentityProvider, source: &IdentityProvider) {
    *target = IdentityProvider {
        id: target.id,
        created: target.created,
        updated: target.updated,
        last_accessed: target.last_accessed,
        ..source.clone()
    };
}
