//! Cars and the reference data describing them.

use serde::{Deserialize, Serialize};

use super::Id;

/// A vehicle owned by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Car {
  pub id:            Id,
  pub user_id:       Id,
  pub license_plate: String,
  pub year:          i32,
  pub model_id:      Id,
}

/// A model, e.g. "Corolla", tying a make to a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarModel {
  pub id:          Id,
  pub category_id: Id,
  pub make_id:     Id,
  pub name:        String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarMake {
  pub id:   Id,
  pub name: String,
}

/// A vehicle class. `passenger_count` is the seat capacity offered to riders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarCategory {
  pub id:              Id,
  pub name:            String,
  pub passenger_count: i64,
}
