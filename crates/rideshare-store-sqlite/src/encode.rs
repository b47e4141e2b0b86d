//! Row mapping between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, roles as their lowercase name
//! and user settings as compact JSON. Each table-backed entity implements
//! [`Record`], which carries its SQL and its column order so that
//! [`SqliteStore`](crate::SqliteStore) can share one implementation of
//! list/get/insert/update/delete across all of them.

use chrono::{DateTime, Utc};
use rideshare_core::{
  model::{Car, CarCategory, CarMake, CarModel, Feedback, Id, Passenger, Ride, User},
  role::Role,
};
use rusqlite::{
  Row,
  types::{Type, Value},
};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

fn conversion_failure(
  idx: usize,
  err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
  rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn decode_dt(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
  let raw: String = row.get(idx)?;
  DateTime::parse_from_rfc3339(&raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| conversion_failure(idx, e))
}

fn decode_role(row: &Row<'_>, idx: usize) -> rusqlite::Result<Role> {
  let raw: String = row.get(idx)?;
  raw.parse().map_err(|e| conversion_failure(idx, e))
}

fn decode_settings(row: &Row<'_>, idx: usize) -> rusqlite::Result<serde_json::Value> {
  let raw: String = row.get(idx)?;
  serde_json::from_str(&raw).map_err(|e| conversion_failure(idx, e))
}

fn encode_settings(settings: &serde_json::Value) -> String {
  match settings {
    serde_json::Value::Null => "{}".to_owned(),
    other => other.to_string(),
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A domain type stored one-per-row in a table with an integer `id`.
pub trait Record: Sized + Send + 'static {
  /// `SELECT id, ... FROM table`, without a `WHERE` clause.
  const SELECT: &'static str;
  /// Insert statement taking [`Record::values`] as positional parameters.
  const INSERT: &'static str;
  /// Update statement taking [`Record::update_values`] followed by the id.
  const UPDATE: &'static str;
  const DELETE: &'static str;

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

  /// Column values for `INSERT`, in statement order.
  fn values(&self) -> Vec<Value>;

  /// Column values for `UPDATE`; defaults to the insert columns.
  fn update_values(&self) -> Vec<Value> { self.values() }

  fn id(&self) -> Id;

  fn set_id(&mut self, id: Id);

  /// Assign the creation time, for tables that record one.
  fn stamp(&mut self, _at: DateTime<Utc>) {}
}

impl Record for User {
  const SELECT: &'static str =
    "SELECT id, name, email, password, role, settings, created_at FROM users";
  const INSERT: &'static str = "INSERT INTO users (name, email, password, role, settings, \
                                created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
  const UPDATE: &'static str = "UPDATE users SET name = ?1, email = ?2, password = ?3, \
                                role = ?4, settings = ?5 WHERE id = ?6";
  const DELETE: &'static str = "DELETE FROM users WHERE id = ?1";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(User {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      password:   row.get(3)?,
      role:       decode_role(row, 4)?,
      settings:   decode_settings(row, 5)?,
      created_at: Some(decode_dt(row, 6)?),
    })
  }

  fn values(&self) -> Vec<Value> {
    let mut values = self.update_values();
    values.push(self.created_at.map(encode_dt).into());
    values
  }

  fn update_values(&self) -> Vec<Value> {
    vec![
      self.name.clone().into(),
      self.email.clone().into(),
      self.password.clone().into(),
      self.role.as_str().to_owned().into(),
      encode_settings(&self.settings).into(),
    ]
  }

  fn id(&self) -> Id { self.id }

  fn set_id(&mut self, id: Id) { self.id = id; }

  fn stamp(&mut self, at: DateTime<Utc>) { self.created_at = Some(at); }
}

impl Record for Ride {
  const SELECT: &'static str = "SELECT id, owner_user_id, vehicle_id, start_date, start_city, \
                                start_address, end_city, end_address, created_at FROM rides";
  const INSERT: &'static str = "INSERT INTO rides (owner_user_id, vehicle_id, start_date, \
                                start_city, start_address, end_city, end_address, created_at) \
                                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
  const UPDATE: &'static str = "UPDATE rides SET owner_user_id = ?1, vehicle_id = ?2, \
                                start_date = ?3, start_city = ?4, start_address = ?5, \
                                end_city = ?6, end_address = ?7 WHERE id = ?8";
  const DELETE: &'static str = "DELETE FROM rides WHERE id = ?1";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Ride {
      id:            row.get(0)?,
      owner_user_id: row.get(1)?,
      vehicle_id:    row.get(2)?,
      start_date:    row.get(3)?,
      start_city:    row.get(4)?,
      start_address: row.get(5)?,
      end_city:      row.get(6)?,
      end_address:   row.get(7)?,
      created_at:    Some(decode_dt(row, 8)?),
    })
  }

  fn values(&self) -> Vec<Value> {
    let mut values = self.update_values();
    values.push(self.created_at.map(encode_dt).into());
    values
  }

  fn update_values(&self) -> Vec<Value> {
    vec![
      self.owner_user_id.into(),
      self.vehicle_id.into(),
      self.start_date.clone().into(),
      self.start_city.clone().into(),
      self.start_address.clone().into(),
      self.end_city.clone().into(),
      self.end_address.clone().into(),
    ]
  }

  fn id(&self) -> Id { self.id }

  fn set_id(&mut self, id: Id) { self.id = id; }

  fn stamp(&mut self, at: DateTime<Utc>) { self.created_at = Some(at); }
}

impl Record for Car {
  const SELECT: &'static str =
    "SELECT id, user_id, license_plate, year, model_id FROM cars";
  const INSERT: &'static str = "INSERT INTO cars (user_id, license_plate, year, model_id) \
                                VALUES (?1, ?2, ?3, ?4)";
  const UPDATE: &'static str = "UPDATE cars SET user_id = ?1, license_plate = ?2, year = ?3, \
                                model_id = ?4 WHERE id = ?5";
  const DELETE: &'static str = "DELETE FROM cars WHERE id = ?1";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Car {
      id:            row.get(0)?,
      user_id:       row.get(1)?,
      license_plate: row.get(2)?,
      year:          row.get(3)?,
      model_id:      row.get(4)?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.user_id.into(),
      self.license_plate.clone().into(),
      self.year.into(),
      self.model_id.into(),
    ]
  }

  fn id(&self) -> Id { self.id }

  fn set_id(&mut self, id: Id) { self.id = id; }
}

impl Record for CarModel {
  const SELECT: &'static str = "SELECT id, category_id, make_id, name FROM car_models";
  const INSERT: &'static str =
    "INSERT INTO car_models (category_id, make_id, name) VALUES (?1, ?2, ?3)";
  const UPDATE: &'static str =
    "UPDATE car_models SET category_id = ?1, make_id = ?2, name = ?3 WHERE id = ?4";
  const DELETE: &'static str = "DELETE FROM car_models WHERE id = ?1";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(CarModel {
      id:          row.get(0)?,
      category_id: row.get(1)?,
      make_id:     row.get(2)?,
      name:        row.get(3)?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.category_id.into(),
      self.make_id.into(),
      self.name.clone().into(),
    ]
  }

  fn id(&self) -> Id { self.id }

  fn set_id(&mut self, id: Id) { self.id = id; }
}

impl Record for CarMake {
  const SELECT: &'static str = "SELECT id, name FROM car_makes";
  const INSERT: &'static str = "INSERT INTO car_makes (name) VALUES (?1)";
  const UPDATE: &'static str = "UPDATE car_makes SET name = ?1 WHERE id = ?2";
  const DELETE: &'static str = "DELETE FROM car_makes WHERE id = ?1";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(CarMake {
      id:   row.get(0)?,
      name: row.get(1)?,
    })
  }

  fn values(&self) -> Vec<Value> { vec![self.name.clone().into()] }

  fn id(&self) -> Id { self.id }

  fn set_id(&mut self, id: Id) { self.id = id; }
}

impl Record for CarCategory {
  const SELECT: &'static str = "SELECT id, name, passenger_count FROM car_categories";
  const INSERT: &'static str =
    "INSERT INTO car_categories (name, passenger_count) VALUES (?1, ?2)";
  const UPDATE: &'static str =
    "UPDATE car_categories SET name = ?1, passenger_count = ?2 WHERE id = ?3";
  const DELETE: &'static str = "DELETE FROM car_categories WHERE id = ?1";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(CarCategory {
      id:              row.get(0)?,
      name:            row.get(1)?,
      passenger_count: row.get(2)?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![self.name.clone().into(), self.passenger_count.into()]
  }

  fn id(&self) -> Id { self.id }

  fn set_id(&mut self, id: Id) { self.id = id; }
}

impl Record for Feedback {
  const SELECT: &'static str =
    "SELECT id, user_id, ride_id, score, message, created_at FROM user_feedback";
  const INSERT: &'static str = "INSERT INTO user_feedback (user_id, ride_id, score, message, \
                                created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
  /// Author and ride are fixed at creation.
  const UPDATE: &'static str =
    "UPDATE user_feedback SET score = ?1, message = ?2 WHERE id = ?3";
  const DELETE: &'static str = "DELETE FROM user_feedback WHERE id = ?1";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Feedback {
      id:         row.get(0)?,
      user_id:    row.get(1)?,
      ride_id:    row.get(2)?,
      score:      row.get(3)?,
      message:    row.get(4)?,
      created_at: Some(decode_dt(row, 5)?),
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.user_id.into(),
      self.ride_id.into(),
      self.score.into(),
      self.message.clone().into(),
      self.created_at.map(encode_dt).into(),
    ]
  }

  fn update_values(&self) -> Vec<Value> {
    vec![self.score.into(), self.message.clone().into()]
  }

  fn id(&self) -> Id { self.id }

  fn set_id(&mut self, id: Id) { self.id = id; }

  fn stamp(&mut self, at: DateTime<Utc>) { self.created_at = Some(at); }
}

// ─── Passenger ───────────────────────────────────────────────────────────────

pub const SELECT_PASSENGERS: &str =
  "SELECT ride_id, passenger_id, created_at FROM ride_passengers";

pub fn passenger_from_row(row: &Row<'_>) -> rusqlite::Result<Passenger> {
  Ok(Passenger {
    ride_id:      row.get(0)?,
    passenger_id: row.get(1)?,
    created_at:   Some(decode_dt(row, 2)?),
  })
}
