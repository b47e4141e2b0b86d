//! A ride offered by a driver in one of their cars.

use chrono::{DateTime, NaiveDateTime, ParseError, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

/// Layout of `start_date`, interpreted as UTC.
pub const START_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ride {
  pub id:            Id,
  pub owner_user_id: Id,
  pub vehicle_id:    Id,
  pub start_date:    String,
  pub start_city:    String,
  pub start_address: String,
  pub end_city:      String,
  pub end_address:   String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at:    Option<DateTime<Utc>>,
}

impl Ride {
  /// Parse `start_date` under [`START_DATE_FORMAT`].
  pub fn start_time(&self) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(&self.start_date, START_DATE_FORMAT)
      .map(|naive| naive.and_utc())
  }
}
