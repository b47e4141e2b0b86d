//! Endpoint handlers, one module per resource.
//!
//! Every mutating handler runs the same pipeline: load the primary resource
//! (404 if absent), ask the [`AuthorizationGuard`] about the operation, load
//! the related records the validator needs, validate, and only then write.
//!
//! [`AuthorizationGuard`]: rideshare_core::guard::AuthorizationGuard

pub mod car_categories;
pub mod car_makes;
pub mod car_models;
pub mod cars;
pub mod feedback;
pub mod passengers;
pub mod rides;
pub mod users;

use axum::{
  extract::{FromRequest, FromRequestParts},
  http::StatusCode,
  response::IntoResponse,
};
use rideshare_core::{
  ValidationError,
  model::{Id, Ride},
  store::RideshareStore,
};

use crate::error::ApiError;

/// A JSON request body whose rejection is reported as an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

/// Typed path parameters whose rejection is reported as an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Unwrap a primary-resource lookup, mapping `None` to 404.
pub(crate) fn found<T>(value: Option<T>, what: &'static str) -> Result<T, ApiError> {
  value.ok_or(ApiError::NotFound(what))
}

pub(crate) fn no_content() -> axum::response::Response { StatusCode::NO_CONTENT.into_response() }

/// Seats offered by `ride`: its car, that car's model, that model's
/// category.
pub(crate) async fn ride_capacity<S: RideshareStore>(
  store: &S,
  ride: &Ride,
) -> Result<i64, ApiError> {
  let missing = || ApiError::from(ValidationError::related_not_found("vehicle_id"));

  let car = store
    .get_car(ride.vehicle_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(missing)?;
  let model = store
    .get_car_model(car.model_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(missing)?;
  let category = store
    .get_car_category(model.category_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(missing)?;
  Ok(category.passenger_count)
}

/// Ids of everyone attached to a ride: the driver first, then passengers.
pub(crate) fn ride_members(ride: &Ride, passengers: &[rideshare_core::model::Passenger]) -> Vec<Id> {
  std::iter::once(ride.owner_user_id)
    .chain(passengers.iter().map(|p| p.passenger_id))
    .collect()
}
