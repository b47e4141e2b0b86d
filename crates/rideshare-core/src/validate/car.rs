use super::{Validate, require_id, require_related, require_text};
use crate::{
  ValidationError, ValidationKind,
  model::{Car, CarModel, User},
};

#[derive(Debug, Clone, Copy)]
pub struct CarContext<'a> {
  pub owner:      Option<&'a User>,
  /// Every car currently registered to `user_id`, including this one when
  /// it is being updated.
  pub owner_cars: &'a [Car],
  pub model:      Option<&'a CarModel>,
}

impl Validate for Car {
  type Related<'a> = CarContext<'a>;

  fn validate(&self, related: CarContext<'_>) -> Result<(), ValidationError> {
    require_text("license_plate", &self.license_plate)?;
    require_id("user_id", self.user_id)?;
    require_related("user_id", related.owner)?;

    // Plates are unique per owner. The stored copy of the car under update
    // is not a duplicate of itself.
    let taken = related.owner_cars.iter().any(|other| {
      other.license_plate == self.license_plate
        && !(crate::model::is_present(self.id) && other.id == self.id)
    });
    if taken {
      return Err(ValidationError::new(
        "license_plate",
        ValidationKind::DuplicateValue,
        "license plate already registered",
      ));
    }

    if self.year <= 0 {
      return Err(ValidationError::missing("year"));
    }
    require_id("model_id", self.model_id)?;
    require_related("model_id", related.model)?;
    Ok(())
  }
}
