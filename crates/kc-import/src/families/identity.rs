//! Role and user families.

use kc_model::{Role, RoleClaim, User, UserClaim, UserRole};

use super::{copy_claim, same_claim};
use crate::matcher::{Matcher, reconcile_rows};
use crate::model::{RoleModel, UserModel};
use crate::reconciler::{EntityFamily, Relation};

/// The role family, identified by `Name`.
#[must_use]
pub fn roles() -> EntityFamily<RoleModel, Role> {
    EntityFamily::new("Name", RoleModel::identifier, role_entity, copy_role)
        .with_relation(Relation::of::<RoleClaim>(role_claims))
}

fn role_entity(model: &RoleModel) -> Role {
    Role {
        description: model.description.clone(),
        claims: model
            .claims
            .iter()
            .map(|claim| RoleClaim::new(&claim.claim_type, &claim.value))
            .collect(),
        ..Role::new(model.name.clone().unwrap_or_default())
    }
}

fn copy_role(target: &mut Role, source: &Role) {
    target.name.clone_from(&source.name);
    target.normalized_name.clone_from(&source.normalized_name);
    target.description.clone_from(&source.description);
}

fn role_claims(entity: &mut Role, import: &Role) {
    reconcile_rows(
        &mut entity.claims,
        &import.claims,
        Matcher::Predicate(|row: &RoleClaim, from: &RoleClaim| {
            same_claim(&row.claim_type, &row.claim_value, &from.claim_type, &from.claim_value)
        }),
        |row, from| {
            copy_claim(&mut row.claim_type, &mut row.claim_value, &from.claim_type, &from.claim_value);
        },
    );
}

/// The user family, identified by `UserName`.
#[must_use]
pub fn users() -> EntityFamily<UserModel, User> {
    EntityFamily::new("UserName", UserModel::identifier, user_entity, copy_user)
        .with_relation(Relation::of::<UserClaim>(user_claims))
        .with_relation(Relation::of::<UserRole>(user_roles))
}

fn user_entity(model: &UserModel) -> User {
    let user = User {
        email_confirmed: model.email_confirmed,
        phone_number: model.phone_number.clone(),
        phone_number_confirmed: model.phone_number_confirmed,
        password_hash: model.password_hash.clone(),
        two_factor_enabled: model.two_factor_enabled,
        lockout_enabled: model.lockout_enabled,
        lockout_end: model.lockout_end,
        claims: model
            .claims
            .iter()
            .map(|claim| UserClaim::new(&claim.claim_type, &claim.value))
            .collect(),
        roles: model.roles.iter().map(UserRole::new).collect(),
        ..User::new(model.user_name.clone().unwrap_or_default())
    };

    match &model.email {
        Some(email) => user.with_email(email),
        None => user,
    }
}

fn copy_user(target: &mut User, source: &User) {
    *target = User {
        id: target.id,
        claims: std::mem::take(&mut target.claims),
        roles: std::mem::take(&mut target.roles),
        ..source.clone()
    };
}

fn user_claims(entity: &mut User, import: &User) {
    reconcile_rows(
        &mut entity.claims,
        &import.claims,
        Matcher::Predicate(|row: &UserClaim, from: &UserClaim| {
            same_claim(&row.claim_type, &row.claim_value, &from.claim_type, &from.claim_value)
        }),
        |row, from| {
            copy_claim(&mut row.claim_type, &mut row.claim_value, &from.claim_type, &from.claim_value);
        },
    );
}

fn user_roles(entity: &mut User, import: &User) {
    fn key(row: &UserRole) -> &str {
        &row.role_name
    }
    reconcile_rows(
        &mut entity.roles,
        &import.roles,
        Matcher::by_key(key),
        |row, from| row.role_name.clone_from(&from.role_name),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClaimModel;

    #[test]
    fn user_conversion_normalizes_names() {
        let mut model = UserModel::new("alice").with_role("admin");
        model.email = Some("alice@example.com".to_string());
        model.claims.push(ClaimModel::new("department", "it"));

        let user = user_entity(&model);

        assert_eq!(user.normalized_user_name, "ALICE");
        assert_eq!(user.normalized_email.as_deref(), Some("ALICE@EXAMPLE.COM"));
        assert_eq!(user.roles[0].role_name, "admin");
        assert_eq!(user.claims[0].claim_value, "it");
    }

    #[test]
    fn reordered_claims_match_by_content() {
        let mut stored = role_entity(
            &RoleModel::new("admin")
                .with_claim("permission", "read")
                .with_claim("permission", "write"),
        );
        let ids: Vec<_> = stored.claims.iter().map(|c| c.id).collect();
        let incoming = role_entity(
            &RoleModel::new("admin")
                .with_claim("Permission", "write")
                .with_claim("permission", "read"),
        );

        role_claims(&mut stored, &incoming);

        assert_eq!(stored.claims[0].id, ids[1]);
        assert_eq!(stored.claims[0].claim_type, "Permission");
        assert_eq!(stored.claims[1].id, ids[0]);
    }

    #[test]
    fn role_assignment_matches_ignoring_case() {
        let mut stored = user_entity(&UserModel::new("bob").with_role("Admin"));
        let row_id = stored.roles[0].id;
        let incoming = user_entity(&UserModel::new("bob").with_role("admin"));

        user_roles(&mut stored, &incoming);

        assert_eq!(stored.roles[0].id, row_id);
        assert_eq!(stored.roles[0].role_name, "admin");
    }
}
