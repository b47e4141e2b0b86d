use super::{Validate, require_id, require_related, require_text};
use crate::{
  ValidationError, ValidationKind,
  model::{Feedback, Passenger, Ride, User},
};

/// Lowest and highest accepted feedback score.
pub const SCORE_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

#[derive(Debug, Clone, Copy)]
pub struct FeedbackContext<'a> {
  pub ride:            Option<&'a Ride>,
  pub author:          Option<&'a User>,
  /// Membership of `ride_id`.
  pub passengers:      &'a [Passenger],
  /// Whether the caller submitting the feedback is an admin under the
  /// configured hierarchy. Admins may post on behalf of users who were not
  /// passengers.
  pub acting_as_admin: bool,
}

impl Validate for Feedback {
  type Related<'a> = FeedbackContext<'a>;

  fn validate(&self, related: FeedbackContext<'_>) -> Result<(), ValidationError> {
    require_id("user_id", self.user_id)?;
    require_id("ride_id", self.ride_id)?;
    let ride = require_related("ride_id", related.ride)?;
    require_related("user_id", related.author)?;

    if ride.owner_user_id == self.user_id {
      return Err(ValidationError::new(
        "user_id",
        ValidationKind::EligibilityViolation,
        "ride owner cannot leave feedback on own ride",
      ));
    }

    let rode = related
      .passengers
      .iter()
      .any(|p| p.passenger_id == self.user_id);
    if !rode && !related.acting_as_admin {
      return Err(ValidationError::new(
        "user_id",
        ValidationKind::EligibilityViolation,
        "only passengers can leave feedback",
      ));
    }

    if !SCORE_RANGE.contains(&self.score) {
      return Err(ValidationError::invalid(
        "score",
        format!(
          "score must be between {} and {}",
          SCORE_RANGE.start(),
          SCORE_RANGE.end()
        ),
      ));
    }
    require_text("message", &self.message)?;
    Ok(())
  }
}
