//! Handlers for car category endpoints. Admin only.
//!
//! Lowering `passenger_count` applies to future joins only; passengers
//! already on a ride are kept.

use axum::{
  extract::State,
  http::StatusCode,
  response::Response,
};
use rideshare_core::{
  guard::{Action, Resource},
  model::{CarCategory, Id},
  store::RideshareStore,
  validate::Validate as _,
};

use super::{Path, Payload, found, no_content};
use crate::{AppState, auth::Caller, error::ApiError, respond::Format};

const OP: Resource = Resource::CarCategory;

/// `GET /car_categories`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::List), &[])?;
  let categories = state.store.list_car_categories().await.map_err(ApiError::store)?;
  format.many("car_categories", &categories)
}

/// `GET /car_category/{id}`
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
  let category = found(
    state.store.get_car_category(id).await.map_err(ApiError::store)?,
    "car category",
  )?;
  format.one(StatusCode::OK, "car_category", &category)
}

/// `POST /car_category`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
  Payload(mut category): Payload<CarCategory>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::Create), &[])?;
  category.id = 0;
  category.validate(())?;
  let category = state
    .store
    .create_car_category(category)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(category_id = category.id, seats = category.passenger_count, "car category created");
  format.one(StatusCode::CREATED, "car_category", &category)
}

/// `PUT /car_category/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Id>,
  Payload(mut category): Payload<CarCategory>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::Update), &[])?;
  found(
    state.store.get_car_category(id).await.map_err(ApiError::store)?,
    "car category",
  )?;
  category.id = id;
  category.validate(())?;
  state.store.update_car_category(category).await.map_err(ApiError::store)?;
  Ok(no_content())
}

/// `DELETE /car_category/{id}`
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
    state.store.get_car_category(id).await.map_err(ApiError::store)?,
    "car category",
  )?;
  state.store.delete_car_category(id).await.map_err(ApiError::store)?;
  Ok(no_content())
}
