use chrono::{DateTime, Utc};

use super::{Validate, require_id, require_related};
use crate::{
  ValidationError, capacity,
  model::{Passenger, Ride, User},
};

/// What joining a ride is checked against.
#[derive(Debug, Clone, Copy)]
pub struct MembershipContext<'a> {
  pub ride:      &'a Ride,
  pub passenger: Option<&'a User>,
  pub existing:  &'a [Passenger],
  /// Seats offered by the ride's car category.
  pub capacity:  i64,
  pub now:       DateTime<Utc>,
}

impl Validate for Passenger {
  type Related<'a> = MembershipContext<'a>;

  fn validate(&self, related: MembershipContext<'_>) -> Result<(), ValidationError> {
    require_id("ride_id", self.ride_id)?;
    require_id("passenger_id", self.passenger_id)?;
    require_related("passenger_id", related.passenger)?;
    capacity::can_join(
      related.ride,
      self.passenger_id,
      related.existing,
      related.capacity,
      related.now,
    )
  }
}
