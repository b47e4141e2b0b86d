//! Handlers for car endpoints.

use axum::{
  extract::State,
  http::StatusCode,
  response::Response,
};
use rideshare_core::{
  guard::{Action, Resource},
  model::{Car, Id},
  store::RideshareStore,
  validate::{CarContext, Validate as _},
};

use super::{Path, Payload, found, no_content};
use crate::{AppState, auth::Caller, error::ApiError, respond::Format};

/// `GET /cars`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (Resource::Car, Action::List), &[])?;
  let cars = state.store.list_cars().await.map_err(ApiError::store)?;
  format.many("cars", &cars)
}

/// `GET /car/{car_id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(car_id): Path<Id>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let car = found(
    state.store.get_car(car_id).await.map_err(ApiError::store)?,
    "car",
  )?;
  state
    .guard
    .check(&caller, (Resource::Car, Action::Read), &[car.user_id])?;
  format.one(StatusCode::OK, "car", &car)
}

/// `POST /car`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
  Payload(mut car): Payload<Car>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state
    .guard
    .check(&caller, (Resource::Car, Action::Create), &[car.user_id])?;

  car.id = 0;
  validate_candidate(&state, &car).await?;

  let car = state.store.create_car(car).await.map_err(ApiError::store)?;
  tracing::info!(car_id = car.id, owner = car.user_id, "car registered");
  format.one(StatusCode::CREATED, "car", &car)
}

/// `PUT /car/{car_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(car_id): Path<Id>,
  Payload(mut car): Payload<Car>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let existing = found(
    state.store.get_car(car_id).await.map_err(ApiError::store)?,
    "car",
  )?;
  let op = (Resource::Car, Action::Update);
  state.guard.check(&caller, op, &[existing.user_id])?;
  state.guard.check(&caller, op, &[car.user_id])?;

  car.id = car_id;
  validate_candidate(&state, &car).await?;

  state.store.update_car(car).await.map_err(ApiError::store)?;
  Ok(no_content())
}

/// `DELETE /car/{car_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(car_id): Path<Id>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let existing = found(
    state.store.get_car(car_id).await.map_err(ApiError::store)?,
    "car",
  )?;
  state
    .guard
    .check(&caller, (Resource::Car, Action::Delete), &[existing.user_id])?;

  state.store.delete_car(car_id).await.map_err(ApiError::store)?;
  tracing::info!(car_id, "car deleted");
  Ok(no_content())
}

/// `GET /user/{user_id}/cars`
///
/// A user without cars gets an empty list.
pub async fn list_by_owner<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(user_id): Path<Id>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state
    .guard
    .check(&caller, (Resource::Car, Action::ListByOwner), &[user_id])?;
  let cars = state
    .store
    .list_cars_by_owner(user_id)
    .await
    .map_err(ApiError::store)?;
  format.many("cars", &cars)
}

async fn validate_candidate<S: RideshareStore>(
  state: &AppState<S>,
  car: &Car,
) -> Result<(), ApiError> {
  let owner = state.store.get_user(car.user_id).await.map_err(ApiError::store)?;
  let owner_cars = state
    .store
    .list_cars_by_owner(car.user_id)
    .await
    .map_err(ApiError::store)?;
  let model = state
    .store
    .get_car_model(car.model_id)
    .await
    .map_err(ApiError::store)?;
  car.validate(CarContext {
    owner:      owner.as_ref(),
    owner_cars: &owner_cars,
    model:      model.as_ref(),
  })?;
  Ok(())
}
