//! Ride membership: a (ride, passenger) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Passenger {
  pub ride_id:      Id,
  pub passenger_id: Id,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at:   Option<DateTime<Utc>>,
}

impl Passenger {
  pub fn new(ride_id: Id, passenger_id: Id) -> Self {
    Self {
      ride_id,
      passenger_id,
      created_at: None,
    }
  }
}
