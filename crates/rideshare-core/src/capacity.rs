//! Seat and timing rules for joining a ride.
//!
//! Checks run in a fixed order so each rejected request carries exactly one
//! reason: malformed start date, ride already started, duplicate membership,
//! ride full.

use chrono::{DateTime, Utc};

use crate::{
  ValidationError, ValidationKind,
  model::{Id, Passenger, Ride, ride::START_DATE_FORMAT},
};

/// Seats still free given `capacity` and the current membership list.
pub fn remaining_seats(existing: &[Passenger], capacity: i64) -> i64 {
  let taken = i64::try_from(existing.len()).unwrap_or(i64::MAX);
  capacity.saturating_sub(taken).max(0)
}

/// Decide whether `passenger_id` may join `ride` at `now`.
///
/// `existing` is the ride's membership as read by the caller; this function
/// does not guard against a concurrent join observing the same list.
pub fn can_join(
  ride: &Ride,
  passenger_id: Id,
  existing: &[Passenger],
  capacity: i64,
  now: DateTime<Utc>,
) -> Result<(), ValidationError> {
  let starts_at = ride.start_time().map_err(|e| {
    ValidationError::invalid(
      "start_date",
      format!("start_date must match {START_DATE_FORMAT}: {e}"),
    )
  })?;

  if starts_at <= now {
    return Err(ValidationError::new(
      "start_date",
      ValidationKind::TemporalViolation,
      "ride has already started",
    ));
  }

  if existing.iter().any(|p| p.passenger_id == passenger_id) {
    return Err(ValidationError::new(
      "passenger_id",
      ValidationKind::DuplicateValue,
      "user is already a passenger",
    ));
  }

  if remaining_seats(existing, capacity) == 0 {
    return Err(ValidationError::new(
      "passenger_count",
      ValidationKind::CapacityExceeded,
      "ride is full",
    ));
  }

  Ok(())
}
