use super::{Validate, require_text};
use crate::{ValidationError, model::User};

/// Presence checks only. Role changes are an authorization concern.
impl Validate for User {
  type Related<'a> = ();

  fn validate(&self, (): ()) -> Result<(), ValidationError> {
    require_text("name", &self.name)?;
    require_text("email", &self.email)?;
    require_text("password", &self.password)?;
    Ok(())
  }
}
