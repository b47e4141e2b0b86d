//! A marketplace account. Drivers and passengers are both users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;
use crate::role::Role;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
  pub id:         Id,
  pub name:       String,
  pub email:      String,
  /// Accepted on input; stored as an argon2 PHC string; never serialised.
  #[serde(skip_serializing)]
  pub password:   String,
  pub role:       Role,
  pub settings:   serde_json::Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
}
