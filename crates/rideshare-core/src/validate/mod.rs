//! Per-entity validation policies.
//!
//! Each entity implements [`Validate`] with its own `Related` context: the
//! records the rule needs to look at (the owner's other cars, the ride being
//! joined, its passenger list...). Validators never fetch anything; the
//! caller loads the related records from the store and hands them in, so
//! every policy here is a pure function of its inputs.
//!
//! A related record passed as `None` means the reference did not resolve and
//! is reported as [`ValidationKind::RelatedNotFound`](crate::ValidationKind).

mod car;
mod feedback;
mod passenger;
mod reference;
mod ride;
mod user;

pub use car::CarContext;
pub use feedback::FeedbackContext;
pub use passenger::MembershipContext;
pub use reference::CarModelContext;
pub use ride::RideContext;

use crate::{ValidationError, model::Id};

pub trait Validate {
  type Related<'a>;

  fn validate(&self, related: Self::Related<'_>) -> Result<(), ValidationError>;
}

// ─── Shared checks ───────────────────────────────────────────────────────────

pub(crate) fn require_id(field: &'static str, id: Id) -> Result<(), ValidationError> {
  if crate::model::is_present(id) {
    Ok(())
  } else {
    Err(ValidationError::missing(field))
  }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    Err(ValidationError::missing(field))
  } else {
    Ok(())
  }
}

pub(crate) fn require_related<'a, T>(
  field: &'static str,
  related: Option<&'a T>,
) -> Result<&'a T, ValidationError> {
  related.ok_or_else(|| ValidationError::related_not_found(field))
}
