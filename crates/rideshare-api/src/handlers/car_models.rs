//! Handlers for car model endpoints. Admin only.

use axum::{
  extract::State,
  http::StatusCode,
  response::Response,
};
use rideshare_core::{
  claims::Identity,
  guard::{Action, Resource},
  model::{CarModel, Id},
  store::RideshareStore,
  validate::{CarModelContext, Validate as _},
};

use super::{Path, Payload, found, no_content};
use crate::{AppState, auth::Caller, error::ApiError, respond::Format};

fn gate<S: RideshareStore>(
  state: &AppState<S>,
  caller: &Identity,
  action: Action,
) -> Result<(), ApiError> {
  state.guard.check(caller, (Resource::CarModel, action), &[])?;
  Ok(())
}

/// `GET /car_models`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  gate(&state, &caller, Action::List)?;
  let models = state.store.list_car_models().await.map_err(ApiError::store)?;
  format.many("car_models", &models)
}

/// `GET /car_model/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Id>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  gate(&state, &caller, Action::Read)?;
  let model = found(
    state.store.get_car_model(id).await.map_err(ApiError::store)?,
    "car model",
  )?;
  format.one(StatusCode::OK, "car_model", &model)
}

/// `POST /car_model`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
  Payload(mut model): Payload<CarModel>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  gate(&state, &caller, Action::Create)?;
  model.id = 0;
  validate_candidate(&state, &model).await?;
  let model = state
    .store
    .create_car_model(model)
    .await
    .map_err(ApiError::store)?;
  format.one(StatusCode::CREATED, "car_model", &model)
}

/// `PUT /car_model/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Id>,
  Payload(mut model): Payload<CarModel>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  gate(&state, &caller, Action::Update)?;
  found(
    state.store.get_car_model(id).await.map_err(ApiError::store)?,
    "car model",
  )?;
  model.id = id;
  validate_candidate(&state, &model).await?;
  state
    .store
    .update_car_model(model)
    .await
    .map_err(ApiError::store)?;
  Ok(no_content())
}

/// `DELETE /car_model/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Id>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  gate(&state, &caller, Action::Delete)?;
  found(
    state.store.get_car_model(id).await.map_err(ApiError::store)?,
    "car model",
  )?;
  state
    .store
    .delete_car_model(id)
    .await
    .map_err(ApiError::store)?;
  Ok(no_content())
}

async fn validate_candidate<S: RideshareStore>(
  state: &AppState<S>,
  model: &CarModel,
) -> Result<(), ApiError> {
  let category = state
    .store
    .get_car_category(model.category_id)
    .await
    .map_err(ApiError::store)?;
  let make = state
    .store
    .get_car_make(model.make_id)
    .await
    .map_err(ApiError::store)?;
  model.validate(CarModelContext {
    category: category.as_ref(),
    make:     make.as_ref(),
  })?;
  Ok(())
}
