use super::{Validate, require_id, require_related, require_text};
use crate::{
  ValidationError, ValidationKind,
  model::{Car, Ride, User, ride::START_DATE_FORMAT},
};

/// Records a ride is checked against.
#[derive(Debug, Clone, Copy)]
pub struct RideContext<'a> {
  /// The user named by `owner_user_id`.
  pub owner:   Option<&'a User>,
  /// The car named by `vehicle_id`.
  pub vehicle: Option<&'a Car>,
}

impl Validate for Ride {
  type Related<'a> = RideContext<'a>;

  fn validate(&self, related: RideContext<'_>) -> Result<(), ValidationError> {
    require_id("owner_user_id", self.owner_user_id)?;
    require_id("vehicle_id", self.vehicle_id)?;
    require_related("owner_user_id", related.owner)?;
    let vehicle = require_related("vehicle_id", related.vehicle)?;

    if vehicle.user_id != self.owner_user_id {
      return Err(ValidationError::new(
        "vehicle_id",
        ValidationKind::EligibilityViolation,
        "vehicle does not belong to owner",
      ));
    }

    require_text("start_date", &self.start_date)?;
    self.start_time().map_err(|_| {
      ValidationError::invalid(
        "start_date",
        format!("start_date must match {START_DATE_FORMAT}"),
      )
    })?;

    require_text("start_city", &self.start_city)?;
    require_text("start_address", &self.start_address)?;
    require_text("end_city", &self.end_city)?;
    require_text("end_address", &self.end_address)?;
    Ok(())
  }
}
