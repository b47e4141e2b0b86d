//! The authorization decision engine.
//!
//! Every guarded endpoint names an [`Operation`]; [`POLICY_TABLE`] maps it to
//! a [`GateSpec`]. Two gates exist:
//!
//! 1. **Role gate**: the caller's role must satisfy `required_role` under
//!    the [`PermissionHierarchy`].
//! 2. **Ownership gate**, only when `ownership` is set. The caller must be
//!    one of the resource's owners, or hold [`Role::Admin`].
//!
//! Operations missing from the table are denied. A denial is always the same
//! [`AuthorizationError::Forbidden`], whichever gate failed.

use crate::{
  AuthorizationError,
  claims::Identity,
  model::Id,
  role::{PermissionHierarchy, Role},
};

use Action::*;
use Resource::*;

// ─── Operations ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
  Ride,
  User,
  Car,
  CarModel,
  CarMake,
  CarCategory,
  Passenger,
  Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  List,
  Read,
  Create,
  Update,
  Delete,
  /// List the records owned by one user, e.g. `/user/{id}/rides`.
  ListByOwner,
  /// Change a user's role; checked in addition to `Update`.
  ChangeRole,
}

pub type Operation = (Resource, Action);

/// The gates that apply to one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSpec {
  pub required_role: Role,
  /// Wire name of the attribute the owner ids are read from, if the
  /// operation is scoped to a specific resource.
  pub ownership:     Option<&'static str>,
}

impl GateSpec {
  const fn role(required_role: Role) -> Self {
    Self {
      required_role,
      ownership: None,
    }
  }

  const fn owned(required_role: Role, field: &'static str) -> Self {
    Self {
      required_role,
      ownership: Some(field),
    }
  }
}

// ─── Policy table ────────────────────────────────────────────────────────────

/// Public reads (ride listing, a single ride, per-ride feedback) need no
/// token and are not listed here.
pub static POLICY_TABLE: &[(Operation, GateSpec)] = &[
  // Rides
  ((Ride, Create), GateSpec::owned(Role::User, "owner_user_id")),
  ((Ride, Update), GateSpec::owned(Role::User, "owner_user_id")),
  ((Ride, Delete), GateSpec::owned(Role::User, "owner_user_id")),
  ((Ride, ListByOwner), GateSpec::owned(Role::User, "user_id")),
  // Users
  ((User, List), GateSpec::role(Role::Admin)),
  ((User, Create), GateSpec::role(Role::Admin)),
  ((User, ChangeRole), GateSpec::role(Role::Admin)),
  ((User, Read), GateSpec::owned(Role::User, "id")),
  ((User, Update), GateSpec::owned(Role::User, "id")),
  ((User, Delete), GateSpec::owned(Role::User, "id")),
  // Cars
  ((Car, List), GateSpec::role(Role::Admin)),
  ((Car, Read), GateSpec::owned(Role::User, "user_id")),
  ((Car, Create), GateSpec::owned(Role::User, "user_id")),
  ((Car, Update), GateSpec::owned(Role::User, "user_id")),
  ((Car, Delete), GateSpec::owned(Role::User, "user_id")),
  ((Car, ListByOwner), GateSpec::owned(Role::User, "user_id")),
  // Reference data
  ((CarModel, List), GateSpec::role(Role::Admin)),
  ((CarModel, Read), GateSpec::role(Role::Admin)),
  ((CarModel, Create), GateSpec::role(Role::Admin)),
  ((CarModel, Update), GateSpec::role(Role::Admin)),
  ((CarModel, Delete), GateSpec::role(Role::Admin)),
  ((CarMake, List), GateSpec::role(Role::Admin)),
  ((CarMake, Read), GateSpec::role(Role::Admin)),
  ((CarMake, Create), GateSpec::role(Role::Admin)),
  ((CarMake, Update), GateSpec::role(Role::Admin)),
  ((CarMake, Delete), GateSpec::role(Role::Admin)),
  ((CarCategory, List), GateSpec::role(Role::Admin)),
  ((CarCategory, Read), GateSpec::role(Role::Admin)),
  ((CarCategory, Create), GateSpec::role(Role::Admin)),
  ((CarCategory, Update), GateSpec::role(Role::Admin)),
  ((CarCategory, Delete), GateSpec::role(Role::Admin)),
  // Memberships
  ((Passenger, List), GateSpec::owned(Role::User, "ride_member")),
  ((Passenger, Create), GateSpec::owned(Role::User, "passenger_id")),
  ((Passenger, Delete), GateSpec::owned(Role::User, "passenger_id")),
  // Feedback
  ((Feedback, List), GateSpec::role(Role::Admin)),
  ((Feedback, Read), GateSpec::role(Role::Admin)),
  ((Feedback, Create), GateSpec::owned(Role::User, "user_id")),
  ((Feedback, Update), GateSpec::owned(Role::User, "user_id")),
  ((Feedback, Delete), GateSpec::owned(Role::User, "user_id")),
  ((Feedback, ListByOwner), GateSpec::owned(Role::User, "user_id")),
];

/// Look up the gate spec for `op`.
pub fn gate_for(op: Operation) -> Option<GateSpec> {
  POLICY_TABLE
    .iter()
    .find(|(candidate, _)| *candidate == op)
    .map(|(_, spec)| *spec)
}

// ─── Guard ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct AuthorizationGuard {
  hierarchy: PermissionHierarchy,
}

impl AuthorizationGuard {
  pub fn new(hierarchy: PermissionHierarchy) -> Self { Self { hierarchy } }

  pub fn hierarchy(&self) -> &PermissionHierarchy { &self.hierarchy }

  /// `true` if `identity` may bypass ownership checks.
  pub fn is_admin(&self, identity: &Identity) -> bool {
    self.hierarchy.satisfies(identity.role, Role::Admin)
  }

  /// The primitive decision: role gate, then (if `owner` is given) the
  /// ownership gate.
  pub fn authorize(
    &self,
    identity: &Identity,
    required_role: Role,
    owner: Option<Id>,
  ) -> Result<(), AuthorizationError> {
    self.evaluate(
      identity,
      required_role,
      owner.as_ref().map(std::slice::from_ref),
    )
  }

  /// Decide `op` through the policy table. `owners` are the subject ids read
  /// from the operation's ownership attribute; they are ignored when the
  /// operation has no ownership gate.
  pub fn check(
    &self,
    identity: &Identity,
    op: Operation,
    owners: &[Id],
  ) -> Result<(), AuthorizationError> {
    let spec = gate_for(op).ok_or(AuthorizationError::Forbidden)?;
    self.evaluate(identity, spec.required_role, spec.ownership.map(|_| owners))
  }

  fn evaluate(
    &self,
    identity: &Identity,
    required_role: Role,
    owners: Option<&[Id]>,
  ) -> Result<(), AuthorizationError> {
    if !self.hierarchy.satisfies(identity.role, required_role) {
      return Err(AuthorizationError::Forbidden);
    }
    if let Some(owners) = owners
      && !owners.contains(&identity.subject_id)
      && !self.is_admin(identity)
    {
      return Err(AuthorizationError::Forbidden);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::DateTime;

  use super::*;

  fn identity(subject_id: Id, role: Role) -> Identity {
    Identity {
      subject_id,
      role,
      issued_at: DateTime::from_timestamp(0, 0).unwrap(),
      expires_at: DateTime::from_timestamp(3600, 0).unwrap(),
    }
  }

  #[test]
  fn ownership_allows_owner_or_admin_only() {
    let guard = AuthorizationGuard::default();
    for owner in 1..=4 {
      for subject in 1..=4 {
        for role in Role::ALL {
          let allowed = guard
            .authorize(&identity(subject, role), Role::User, Some(owner))
            .is_ok();
          assert_eq!(
            allowed,
            subject == owner || role == Role::Admin,
            "subject {subject} ({role}) on resource owned by {owner}"
          );
        }
      }
    }
  }

  #[test]
  fn role_gate_applies_regardless_of_ownership() {
    let guard = AuthorizationGuard::default();
    assert_eq!(
      guard.authorize(&identity(5, Role::User), Role::Admin, Some(5)),
      Err(AuthorizationError::Forbidden)
    );
    assert!(guard.authorize(&identity(1, Role::Admin), Role::Admin, None).is_ok());
  }

  #[test]
  fn reference_data_is_admin_only() {
    let guard = AuthorizationGuard::default();
    let user = identity(1, Role::User);
    let admin = identity(2, Role::Admin);
    for resource in [CarModel, CarMake, CarCategory] {
      for action in [List, Read, Create, Update, Delete] {
        assert!(guard.check(&user, (resource, action), &[1]).is_err());
        assert!(guard.check(&admin, (resource, action), &[]).is_ok());
      }
    }
  }

  #[test]
  fn only_admin_lists_users() {
    let guard = AuthorizationGuard::default();
    assert!(guard.check(&identity(1, Role::User), (User, List), &[]).is_err());
    assert!(guard.check(&identity(1, Role::Admin), (User, List), &[]).is_ok());
  }

  #[test]
  fn ride_update_requires_ownership() {
    let guard = AuthorizationGuard::default();
    let op = (Ride, Update);
    assert!(guard.check(&identity(3, Role::User), op, &[3]).is_ok());
    assert!(guard.check(&identity(4, Role::User), op, &[3]).is_err());
    assert!(guard.check(&identity(4, Role::Admin), op, &[3]).is_ok());
  }

  #[test]
  fn any_listed_owner_passes() {
    let guard = AuthorizationGuard::default();
    let op = (Passenger, Delete);
    // The passenger themselves, or the ride's driver.
    assert!(guard.check(&identity(8, Role::User), op, &[8, 2]).is_ok());
    assert!(guard.check(&identity(2, Role::User), op, &[8, 2]).is_ok());
    assert!(guard.check(&identity(9, Role::User), op, &[8, 2]).is_err());
  }

  #[test]
  fn empty_owner_list_denies_non_admin() {
    let guard = AuthorizationGuard::default();
    assert!(guard.check(&identity(1, Role::User), (Car, Update), &[]).is_err());
    assert!(guard.check(&identity(1, Role::Admin), (Car, Update), &[]).is_ok());
  }

  #[test]
  fn unlisted_operation_is_denied_even_for_admin() {
    let guard = AuthorizationGuard::default();
    assert_eq!(
      guard.check(&identity(1, Role::Admin), (CarMake, ListByOwner), &[]),
      Err(AuthorizationError::Forbidden)
    );
  }

  #[test]
  fn policy_table_has_one_entry_per_operation() {
    for (i, (op, _)) in POLICY_TABLE.iter().enumerate() {
      assert!(
        POLICY_TABLE[i + 1..].iter().all(|(other, _)| other != op),
        "duplicate policy for {op:?}"
      );
    }
  }
}
