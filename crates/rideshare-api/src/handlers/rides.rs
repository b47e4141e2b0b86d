//! Handlers for ride endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/rides` | Public |
//! | `GET`    | `/ride/{ride_id}` | Public |
//! | `POST`   | `/ride` | Owner or admin |
//! | `PUT`    | `/ride/{ride_id}` | Owner or admin |
//! | `DELETE` | `/ride/{ride_id}` | Owner or admin |
//! | `GET`    | `/user/{user_id}/rides` | That user or admin |

use axum::{
  extract::State,
  http::StatusCode,
  response::Response,
};
use rideshare_core::{
  guard::{Action, Resource},
  model::{Id, Ride},
  store::RideshareStore,
  validate::{RideContext, Validate as _},
};

use super::{Path, Payload, found, no_content};
use crate::{AppState, auth::Caller, error::ApiError, respond::Format};

const OP: Resource = Resource::Ride;

/// `GET /rides`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let rides = state.store.list_rides().await.map_err(ApiError::store)?;
  format.many("rides", &rides)
}

/// `GET /ride/{ride_id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(ride_id): Path<Id>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let ride = found(
    state.store.get_ride(ride_id).await.map_err(ApiError::store)?,
    "ride",
  )?;
  format.one(StatusCode::OK, "ride", &ride)
}

/// `POST /ride`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
  Payload(mut ride): Payload<Ride>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state
    .guard
    .check(&caller, (OP, Action::Create), &[ride.owner_user_id])?;

  ride.id = 0;
  validate_candidate(&state, &ride).await?;

  let ride = state.store.create_ride(ride).await.map_err(ApiError::store)?;
  tracing::info!(ride_id = ride.id, owner = ride.owner_user_id, "ride created");
  format.one(StatusCode::CREATED, "ride", &ride)
}

/// `PUT /ride/{ride_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(ride_id): Path<Id>,
  Payload(mut ride): Payload<Ride>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let existing = found(
    state.store.get_ride(ride_id).await.map_err(ApiError::store)?,
    "ride",
  )?;
  let op = (OP, Action::Update);
  state.guard.check(&caller, op, &[existing.owner_user_id])?;
  state.guard.check(&caller, op, &[ride.owner_user_id])?;

  ride.id = ride_id;
  validate_candidate(&state, &ride).await?;

  state.store.update_ride(ride).await.map_err(ApiError::store)?;
  Ok(no_content())
}

/// `DELETE /ride/{ride_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(ride_id): Path<Id>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let existing = found(
    state.store.get_ride(ride_id).await.map_err(ApiError::store)?,
    "ride",
  )?;
  state
    .guard
    .check(&caller, (OP, Action::Delete), &[existing.owner_user_id])?;

  state.store.delete_ride(ride_id).await.map_err(ApiError::store)?;
  tracing::info!(ride_id, "ride deleted");
  Ok(no_content())
}

/// `GET /user/{user_id}/rides`
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
    .check(&caller, (OP, Action::ListByOwner), &[user_id])?;
  let rides = state
    .store
    .list_rides_by_owner(user_id)
    .await
    .map_err(ApiError::store)?;
  format.many("rides", &rides)
}

async fn validate_candidate<S: RideshareStore>(
  state: &AppState<S>,
  ride: &Ride,
) -> Result<(), ApiError> {
  let owner = state
    .store
    .get_user(ride.owner_user_id)
    .await
    .map_err(ApiError::store)?;
  let vehicle = state
    .store
    .get_car(ride.vehicle_id)
    .await
    .map_err(ApiError::store)?;
  ride.validate(RideContext {
    owner:   owner.as_ref(),
    vehicle: vehicle.as_ref(),
  })?;
  Ok(())
}
