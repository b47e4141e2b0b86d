//! [`SqliteStore`]: the SQLite implementation of [`RideshareStore`].

use std::path::Path;

use chrono::Utc;
use rideshare_core::{
  model::{Car, CarCategory, CarMake, CarModel, Feedback, Id, Passenger, Ride, User},
  store::RideshareStore,
};
use rusqlite::{OptionalExtension as _, params_from_iter, types::Value};

use crate::{
  Result,
  encode::{Record, SELECT_PASSENGERS, encode_dt, passenger_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rideshare store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Generic record access ─────────────────────────────────────────────────

  /// All rows of `R`, optionally restricted by equality on the given
  /// columns. Column names are always compile-time constants.
  async fn select<R: Record>(&self, filter: &'static [&'static str], args: Vec<Value>) -> Result<Vec<R>> {
    let sql = if filter.is_empty() {
      format!("{} ORDER BY id", R::SELECT)
    } else {
      let clauses = filter
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(" AND ");
      format!("{} WHERE {clauses} ORDER BY id", R::SELECT)
    };

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(args), R::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn get<R: Record>(&self, id: Id) -> Result<Option<R>> {
    let sql = format!("{} WHERE id = ?1", R::SELECT);
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], R::from_row)
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn insert<R: Record>(&self, mut record: R) -> Result<R> {
    record.stamp(Utc::now());
    let values = record.values();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(R::INSERT, params_from_iter(values))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    record.set_id(id);
    Ok(record)
  }

  async fn update<R: Record>(&self, record: R) -> Result<()> {
    let mut values = record.update_values();
    values.push(record.id().into());
    self
      .conn
      .call(move |conn| {
        conn.execute(R::UPDATE, params_from_iter(values))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete<R: Record>(&self, id: Id) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(R::DELETE, rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RideshareStore impl ─────────────────────────────────────────────────────

impl RideshareStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn list_users(&self) -> Result<Vec<User>> { self.select(&[], vec![]).await }

  async fn get_user(&self, id: Id) -> Result<Option<User>> { self.get(id).await }

  async fn create_user(&self, user: User) -> Result<User> { self.insert(user).await }

  async fn update_user(&self, user: User) -> Result<()> { self.update(user).await }

  async fn delete_user(&self, id: Id) -> Result<()> { self.delete::<User>(id).await }

  // ── Rides ─────────────────────────────────────────────────────────────────

  async fn list_rides(&self) -> Result<Vec<Ride>> { self.select(&[], vec![]).await }

  async fn list_rides_by_owner(&self, owner_user_id: Id) -> Result<Vec<Ride>> {
    self
      .select(&["owner_user_id"], vec![owner_user_id.into()])
      .await
  }

  async fn get_ride(&self, id: Id) -> Result<Option<Ride>> { self.get(id).await }

  async fn create_ride(&self, ride: Ride) -> Result<Ride> { self.insert(ride).await }

  async fn update_ride(&self, ride: Ride) -> Result<()> { self.update(ride).await }

  async fn delete_ride(&self, id: Id) -> Result<()> { self.delete::<Ride>(id).await }

  // ── Cars ──────────────────────────────────────────────────────────────────

  async fn list_cars(&self) -> Result<Vec<Car>> { self.select(&[], vec![]).await }

  async fn list_cars_by_owner(&self, user_id: Id) -> Result<Vec<Car>> {
    self.select(&["user_id"], vec![user_id.into()]).await
  }

  async fn get_car(&self, id: Id) -> Result<Option<Car>> { self.get(id).await }

  async fn create_car(&self, car: Car) -> Result<Car> { self.insert(car).await }

  async fn update_car(&self, car: Car) -> Result<()> { self.update(car).await }

  async fn delete_car(&self, id: Id) -> Result<()> { self.delete::<Car>(id).await }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn list_car_models(&self) -> Result<Vec<CarModel>> {
    self.select(&[], vec![]).await
  }

  async fn get_car_model(&self, id: Id) -> Result<Option<CarModel>> { self.get(id).await }

  async fn create_car_model(&self, model: CarModel) -> Result<CarModel> {
    self.insert(model).await
  }

  async fn update_car_model(&self, model: CarModel) -> Result<()> { self.update(model).await }

  async fn delete_car_model(&self, id: Id) -> Result<()> {
    self.delete::<CarModel>(id).await
  }

  async fn list_car_makes(&self) -> Result<Vec<CarMake>> { self.select(&[], vec![]).await }

  async fn get_car_make(&self, id: Id) -> Result<Option<CarMake>> { self.get(id).await }

  async fn create_car_make(&self, make: CarMake) -> Result<CarMake> { self.insert(make).await }

  async fn update_car_make(&self, make: CarMake) -> Result<()> { self.update(make).await }

  async fn delete_car_make(&self, id: Id) -> Result<()> { self.delete::<CarMake>(id).await }

  async fn list_car_categories(&self) -> Result<Vec<CarCategory>> {
    self.select(&[], vec![]).await
  }

  async fn get_car_category(&self, id: Id) -> Result<Option<CarCategory>> {
    self.get(id).await
  }

  async fn create_car_category(&self, category: CarCategory) -> Result<CarCategory> {
    self.insert(category).await
  }

  async fn update_car_category(&self, category: CarCategory) -> Result<()> {
    self.update(category).await
  }

  async fn delete_car_category(&self, id: Id) -> Result<()> {
    self.delete::<CarCategory>(id).await
  }

  // ── Passengers ────────────────────────────────────────────────────────────

  async fn list_passengers(&self, ride_id: Id) -> Result<Vec<Passenger>> {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SELECT_PASSENGERS} WHERE ride_id = ?1 ORDER BY created_at, passenger_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ride_id], passenger_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn get_passenger(&self, ride_id: Id, passenger_id: Id) -> Result<Option<Passenger>> {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SELECT_PASSENGERS} WHERE ride_id = ?1 AND passenger_id = ?2"),
              rusqlite::params![ride_id, passenger_id],
              passenger_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn add_passenger(
    &self,
    mut passenger: Passenger,
    capacity: i64,
  ) -> Result<Option<Passenger>> {
    let now = Utc::now();
    passenger.created_at = Some(now);
    let (ride_id, passenger_id, at) =
      (passenger.ride_id, passenger.passenger_id, encode_dt(now));

    // The seat count and the insert run as one statement on the single
    // connection, so two joins cannot both take the last seat.
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO ride_passengers (ride_id, passenger_id, created_at)
           SELECT ?1, ?2, ?3
           WHERE (SELECT COUNT(*) FROM ride_passengers WHERE ride_id = ?1) < ?4",
          rusqlite::params![ride_id, passenger_id, at, capacity],
        )?)
      })
      .await?;
    Ok((inserted == 1).then_some(passenger))
  }

  async fn remove_passenger(&self, ride_id: Id, passenger_id: Id) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM ride_passengers WHERE ride_id = ?1 AND passenger_id = ?2",
          rusqlite::params![ride_id, passenger_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Feedback ──────────────────────────────────────────────────────────────

  async fn list_feedback(&self) -> Result<Vec<Feedback>> { self.select(&[], vec![]).await }

  async fn list_feedback_by_author(&self, user_id: Id) -> Result<Vec<Feedback>> {
    self.select(&["user_id"], vec![user_id.into()]).await
  }

  async fn list_feedback_by_ride(&self, ride_id: Id) -> Result<Vec<Feedback>> {
    self.select(&["ride_id"], vec![ride_id.into()]).await
  }

  async fn list_feedback_by_author_and_ride(
    &self,
    user_id: Id,
    ride_id: Id,
  ) -> Result<Vec<Feedback>> {
    self
      .select(&["user_id", "ride_id"], vec![user_id.into(), ride_id.into()])
      .await
  }

  async fn get_feedback(&self, id: Id) -> Result<Option<Feedback>> { self.get(id).await }

  async fn create_feedback(&self, feedback: Feedback) -> Result<Feedback> {
    self.insert(feedback).await
  }

  async fn update_feedback(&self, feedback: Feedback) -> Result<()> {
    self.update(feedback).await
  }

  async fn delete_feedback(&self, id: Id) -> Result<()> {
    self.delete::<Feedback>(id).await
  }
}
