//! Feedback left by a passenger about a ride.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feedback {
  pub id:         Id,
  /// The author.
  pub user_id:    Id,
  pub ride_id:    Id,
  pub score:      i64,
  pub message:    String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
}

impl Feedback {
  /// Apply an update on top of `existing`.
  ///
  /// `user_id` and `ride_id` are fixed at creation: whatever the caller sent
  /// for them is discarded and replaced by the stored values.
  pub fn pinned_to(self, existing: &Feedback) -> Feedback {
    Feedback {
      id: existing.id,
      user_id: existing.user_id,
      ride_id: existing.ride_id,
      created_at: existing.created_at,
      ..self
    }
  }
}
