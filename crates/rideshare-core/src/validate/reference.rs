//! Car models, makes and categories.

use super::{Validate, require_id, require_related, require_text};
use crate::{
  ValidationError,
  model::{CarCategory, CarMake, CarModel},
};

#[derive(Debug, Clone, Copy)]
pub struct CarModelContext<'a> {
  pub category: Option<&'a CarCategory>,
  pub make:     Option<&'a CarMake>,
}

impl Validate for CarModel {
  type Related<'a> = CarModelContext<'a>;

  fn validate(&self, related: CarModelContext<'_>) -> Result<(), ValidationError> {
    require_id("category_id", self.category_id)?;
    require_id("make_id", self.make_id)?;
    require_related("category_id", related.category)?;
    require_related("make_id", related.make)?;
    require_text("name", &self.name)?;
    Ok(())
  }
}

impl Validate for CarMake {
  type Related<'a> = ();

  fn validate(&self, (): ()) -> Result<(), ValidationError> {
    require_text("name", &self.name)
  }
}

impl Validate for CarCategory {
  type Related<'a> = ();

  fn validate(&self, (): ()) -> Result<(), ValidationError> {
    require_text("name", &self.name)?;
    match self.passenger_count {
      0 => Err(ValidationError::missing("passenger_count")),
      n if n < 0 => Err(ValidationError::invalid(
        "passenger_count",
        "passenger_count must be positive",
      )),
      _ => Ok(()),
    }
  }
}
