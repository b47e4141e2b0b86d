//! Handlers for car make endpoints. Admin only.

use axum::{
  extract::State,
  http::StatusCode,
  response::Response,
};
use rideshare_core::{
  guard::{Action, Resource},
  model::{CarMake, Id},
  store::RideshareStore,
  validate::Validate as _,
};

use super::{Path, Payload, found, no_content};
use crate::{AppState, auth::Caller, error::ApiError, respond::Format};

const OP: Resource = Resource::CarMake;

/// `GET /car_makes`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::List), &[])?;
  let makes = state.store.list_car_makes().await.map_err(ApiError::store)?;
  format.many("car_makes", &makes)
}

/// `GET /car_make/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Id>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::Read), &[])?;
  let make = found(
    state.store.get_car_make(id).await.map_err(ApiError::store)?,
    "car make",
  )?;
  format.one(StatusCode::OK, "car_make", &make)
}

/// `POST /car_make`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
  Payload(mut make): Payload<CarMake>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::Create), &[])?;
  make.id = 0;
  make.validate(())?;
  let make = state.store.create_car_make(make).await.map_err(ApiError::store)?;
  format.one(StatusCode::CREATED, "car_make", &make)
}

/// `PUT /car_make/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Id>,
  Payload(mut make): Payload<CarMake>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::Update), &[])?;
  found(
    state.store.get_car_make(id).await.map_err(ApiError::store)?,
    "car make",
  )?;
  make.id = id;
  make.validate(())?;
  state.store.update_car_make(make).await.map_err(ApiError::store)?;
  Ok(no_content())
}

/// `DELETE /car_make/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Id>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::Delete), &[])?;
  found(
    state.store.get_car_make(id).await.map_err(ApiError::store)?,
    "car make",
  )?;
  state.store.delete_car_make(id).await.map_err(ApiError::store)?;
  Ok(no_content())
}
