//! Roles and the permission hierarchy over them.
//!
//! Every role carries an integer rank; a lower rank is more privileged. The
//! rank table is built once at startup and never mutated afterwards, so it can
//! be shared across request tasks behind an `Arc` without locking.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The closed set of roles a caller may present.
///
/// Adding a variant requires adding it to [`Role::ALL`]; the hierarchy
/// refuses to build unless every role has a rank.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  #[default]
  User,
}

impl Role {
  pub const ALL: [Role; 2] = [Role::Admin, Role::User];

  pub fn as_str(self) -> &'static str {
    match self {
      Role::Admin => "admin",
      Role::User => "user",
    }
  }

  fn index(self) -> usize { self as usize }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "admin" => Ok(Role::Admin),
      "user" => Ok(Role::User),
      other => Err(Error::UnknownRole(other.to_owned())),
    }
  }
}

// ─── Hierarchy ───────────────────────────────────────────────────────────────

/// A total order over [`Role`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionHierarchy {
  ranks: [u32; Role::ALL.len()],
}

impl PermissionHierarchy {
  /// Build a hierarchy from explicit ranks. Every role in [`Role::ALL`] must
  /// be given a rank, and [`Role::Admin`] must rank strictly below the rest.
  pub fn new(ranks: impl IntoIterator<Item = (Role, u32)>) -> Result<Self> {
    let mut table = [None; Role::ALL.len()];
    for (role, rank) in ranks {
      table[role.index()] = Some(rank);
    }

    let mut resolved = [0; Role::ALL.len()];
    for role in Role::ALL {
      resolved[role.index()] =
        table[role.index()].ok_or(Error::MissingRank(role))?;
    }
    let hierarchy = Self { ranks: resolved };

    let admin = hierarchy.rank(Role::Admin);
    for role in Role::ALL.into_iter().filter(|r| *r != Role::Admin) {
      let rank = hierarchy.rank(role);
      if admin >= rank {
        return Err(Error::RankOrder(Role::Admin, role, admin, rank));
      }
    }
    Ok(hierarchy)
  }

  /// Build a hierarchy from a configuration table keyed by role name.
  pub fn from_names(ranks: &BTreeMap<String, u32>) -> Result<Self> {
    let parsed = ranks
      .iter()
      .map(|(name, rank)| Ok((name.parse::<Role>()?, *rank)))
      .collect::<Result<Vec<_>>>()?;
    Self::new(parsed)
  }

  pub fn rank(&self, role: Role) -> u32 { self.ranks[role.index()] }

  /// `true` iff `presented` is at least as strong as `required`.
  pub fn satisfies(&self, presented: Role, required: Role) -> bool {
    self.rank(presented) <= self.rank(required)
  }
}

impl Default for PermissionHierarchy {
  fn default() -> Self {
    Self {
      ranks: [0, 1],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn satisfies_follows_rank_order() {
    let h = PermissionHierarchy::default();
    for presented in Role::ALL {
      for required in Role::ALL {
        assert_eq!(
          h.satisfies(presented, required),
          h.rank(presented) <= h.rank(required),
          "{presented} vs {required}"
        );
      }
    }
  }

  #[test]
  fn admin_satisfies_everything_user_does_not_satisfy_admin() {
    let h = PermissionHierarchy::default();
    assert!(h.satisfies(Role::Admin, Role::Admin));
    assert!(h.satisfies(Role::Admin, Role::User));
    assert!(h.satisfies(Role::User, Role::User));
    assert!(!h.satisfies(Role::User, Role::Admin));
  }

  #[test]
  fn default_matches_explicit_table() {
    let explicit =
      PermissionHierarchy::new([(Role::Admin, 0), (Role::User, 1)]).unwrap();
    assert_eq!(explicit, PermissionHierarchy::default());
  }

  #[test]
  fn missing_rank_is_rejected() {
    let err = PermissionHierarchy::new([(Role::Admin, 0)]).unwrap_err();
    assert!(matches!(err, Error::MissingRank(Role::User)));
  }

  #[test]
  fn admin_must_outrank_user() {
    for (admin, user) in [(1, 1), (2, 1)] {
      let err = PermissionHierarchy::new([(Role::Admin, admin), (Role::User, user)])
        .unwrap_err();
      assert!(
        matches!(err, Error::RankOrder(Role::Admin, Role::User, a, u) if a == admin && u == user),
        "admin={admin} user={user}"
      );
    }
    assert!(PermissionHierarchy::new([(Role::Admin, 5), (Role::User, 10)]).is_ok());
  }

  #[test]
  fn unknown_role_name_is_rejected() {
    let mut ranks = BTreeMap::new();
    ranks.insert("admin".to_owned(), 0);
    ranks.insert("user".to_owned(), 1);
    ranks.insert("superuser".to_owned(), 2);
    let err = PermissionHierarchy::from_names(&ranks).unwrap_err();
    assert!(matches!(err, Error::UnknownRole(name) if name == "superuser"));
  }

  #[test]
  fn role_names_round_trip_through_from_str() {
    for role in Role::ALL {
      assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
    }
  }
}
