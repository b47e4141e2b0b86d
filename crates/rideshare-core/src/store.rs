//! The `RideshareStore` trait.
//!
//! Implemented by storage backends (e.g. `rideshare-store-sqlite`). The HTTP
//! layer depends on this abstraction only; it fetches related records here
//! and hands them to the validators in [`crate::validate`].

use std::future::Future;

use crate::model::{
  Car, CarCategory, CarMake, CarModel, Feedback, Id, Passenger, Ride, User,
};

/// Errors raised by a store backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` if the write was refused by a uniqueness or referential
  /// constraint rather than by an operational failure.
  fn is_conflict(&self) -> bool;
}

/// Abstraction over a rideshare store backend.
///
/// Reads of a single record return `None` when the id is unknown. Creates
/// return the persisted record with its store-assigned id. Updates and
/// deletes of an unknown id are no-ops; callers check existence first.
///
/// All methods return `Send` futures so the trait can be used behind `axum`.
pub trait RideshareStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// `user.password` is stored as given; hashing is the caller's job.
  fn create_user(&self, user: User) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn update_user(&self, user: User) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_user(&self, id: Id) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Rides ─────────────────────────────────────────────────────────────

  fn list_rides(&self) -> impl Future<Output = Result<Vec<Ride>, Self::Error>> + Send + '_;

  fn list_rides_by_owner(
    &self,
    owner_user_id: Id,
  ) -> impl Future<Output = Result<Vec<Ride>, Self::Error>> + Send + '_;

  fn get_ride(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Ride>, Self::Error>> + Send + '_;

  fn create_ride(&self, ride: Ride) -> impl Future<Output = Result<Ride, Self::Error>> + Send + '_;

  fn update_ride(&self, ride: Ride) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Also removes the ride's memberships and feedback.
  fn delete_ride(&self, id: Id) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Cars ──────────────────────────────────────────────────────────────

  fn list_cars(&self) -> impl Future<Output = Result<Vec<Car>, Self::Error>> + Send + '_;

  fn list_cars_by_owner(
    &self,
    user_id: Id,
  ) -> impl Future<Output = Result<Vec<Car>, Self::Error>> + Send + '_;

  fn get_car(&self, id: Id) -> impl Future<Output = Result<Option<Car>, Self::Error>> + Send + '_;

  fn create_car(&self, car: Car) -> impl Future<Output = Result<Car, Self::Error>> + Send + '_;

  fn update_car(&self, car: Car) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_car(&self, id: Id) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reference data ────────────────────────────────────────────────────

  fn list_car_models(
    &self,
  ) -> impl Future<Output = Result<Vec<CarModel>, Self::Error>> + Send + '_;

  fn get_car_model(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<CarModel>, Self::Error>> + Send + '_;

  fn create_car_model(
    &self,
    model: CarModel,
  ) -> impl Future<Output = Result<CarModel, Self::Error>> + Send + '_;

  fn update_car_model(
    &self,
    model: CarModel,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_car_model(&self, id: Id) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_car_makes(&self) -> impl Future<Output = Result<Vec<CarMake>, Self::Error>> + Send + '_;

  fn get_car_make(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<CarMake>, Self::Error>> + Send + '_;

  fn create_car_make(
    &self,
    make: CarMake,
  ) -> impl Future<Output = Result<CarMake, Self::Error>> + Send + '_;

  fn update_car_make(&self, make: CarMake) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_car_make(&self, id: Id) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_car_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<CarCategory>, Self::Error>> + Send + '_;

  fn get_car_category(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<CarCategory>, Self::Error>> + Send + '_;

  fn create_car_category(
    &self,
    category: CarCategory,
  ) -> impl Future<Output = Result<CarCategory, Self::Error>> + Send + '_;

  fn update_car_category(
    &self,
    category: CarCategory,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_car_category(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Passengers ────────────────────────────────────────────────────────

  fn list_passengers(
    &self,
    ride_id: Id,
  ) -> impl Future<Output = Result<Vec<Passenger>, Self::Error>> + Send + '_;

  fn get_passenger(
    &self,
    ride_id: Id,
    passenger_id: Id,
  ) -> impl Future<Output = Result<Option<Passenger>, Self::Error>> + Send + '_;

  /// Insert the membership only if the ride still has fewer than `capacity`
  /// passengers at commit time; returns `None` when it is full. Fails with a
  /// conflict if the pair is already present.
  fn add_passenger(
    &self,
    passenger: Passenger,
    capacity: i64,
  ) -> impl Future<Output = Result<Option<Passenger>, Self::Error>> + Send + '_;

  fn remove_passenger(
    &self,
    ride_id: Id,
    passenger_id: Id,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Feedback ──────────────────────────────────────────────────────────

  fn list_feedback(&self) -> impl Future<Output = Result<Vec<Feedback>, Self::Error>> + Send + '_;

  fn list_feedback_by_author(
    &self,
    user_id: Id,
  ) -> impl Future<Output = Result<Vec<Feedback>, Self::Error>> + Send + '_;

  fn list_feedback_by_ride(
    &self,
    ride_id: Id,
  ) -> impl Future<Output = Result<Vec<Feedback>, Self::Error>> + Send + '_;

  fn list_feedback_by_author_and_ride(
    &self,
    user_id: Id,
    ride_id: Id,
  ) -> impl Future<Output = Result<Vec<Feedback>, Self::Error>> + Send + '_;

  fn get_feedback(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Feedback>, Self::Error>> + Send + '_;

  fn create_feedback(
    &self,
    feedback: Feedback,
  ) -> impl Future<Output = Result<Feedback, Self::Error>> + Send + '_;

  fn update_feedback(
    &self,
    feedback: Feedback,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_feedback(&self, id: Id) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
