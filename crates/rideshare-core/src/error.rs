//! Error types for `rideshare-core`.
//!
//! Three request-level kinds are kept apart and never converted into one
//! another: [`AuthenticationError`] (who is calling cannot be established),
//! [`AuthorizationError`] (the caller may not do this) and
//! [`ValidationError`] (the proposed state is inconsistent). [`Error`] covers
//! configuration defects detected at startup.

use std::fmt;

use thiserror::Error;

use crate::role::Role;

// ─── Authentication ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
  /// The token cannot be parsed, or a required claim is absent or mistyped.
  #[error("malformed token: {0}")]
  Malformed(String),

  #[error("token expired")]
  Expired,

  #[error("token signature does not verify")]
  InvalidSignature,
}

// ─── Authorization ───────────────────────────────────────────────────────────

/// Denial never says which gate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationError {
  #[error("unauthorized")]
  Forbidden,
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
  MissingField,
  InvalidFormat,
  DuplicateValue,
  CapacityExceeded,
  TemporalViolation,
  EligibilityViolation,
  /// A referenced record (car, model, user, ...) does not exist.
  RelatedNotFound,
}

impl fmt::Display for ValidationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::MissingField => "missing field",
      Self::InvalidFormat => "invalid format",
      Self::DuplicateValue => "duplicate value",
      Self::CapacityExceeded => "capacity exceeded",
      Self::TemporalViolation => "temporal violation",
      Self::EligibilityViolation => "eligibility violation",
      Self::RelatedNotFound => "related entity not found",
    })
  }
}

/// A rejected candidate entity. `field` is the wire name of the offending
/// field so client-facing text stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
  pub field:   &'static str,
  pub kind:    ValidationKind,
  pub message: String,
}

impl ValidationError {
  pub fn new(
    field: &'static str,
    kind: ValidationKind,
    message: impl Into<String>,
  ) -> Self {
    Self {
      field,
      kind,
      message: message.into(),
    }
  }

  pub fn missing(field: &'static str) -> Self {
    Self::new(field, ValidationKind::MissingField, format!("missing {field}"))
  }

  pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
    Self::new(field, ValidationKind::InvalidFormat, message)
  }

  pub fn related_not_found(field: &'static str) -> Self {
    Self::new(
      field,
      ValidationKind::RelatedNotFound,
      format!("{field} does not reference an existing record"),
    )
  }
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("no rank configured for role {0}")]
  MissingRank(Role),

  /// Admin must rank strictly below (be stronger than) every other role.
  #[error("role {0} must rank below role {1}, got {2} and {3}")]
  RankOrder(Role, Role, u32, u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
