//! Handlers for ride membership.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/ride/{ride_id}/passengers` | Driver, any passenger, or admin |
//! | `POST`   | `/ride/{ride_id}/passenger/{user_id}` | That user or admin |
//! | `DELETE` | `/ride/{ride_id}/passenger/{user_id}` | That user, the driver, or admin |
//!
//! Joining is validated against the membership list as read, then the store
//! re-checks the seat count at commit time. A join that loses a race for the
//! last seat is reported as a full ride.

use axum::{
  extract::State,
  http::StatusCode,
  response::Response,
};
use chrono::Utc;
use rideshare_core::{
  ValidationError, ValidationKind,
  guard::{Action, Resource},
  model::{Id, Passenger},
  store::RideshareStore,
  validate::{MembershipContext, Validate as _},
};

use super::{Path, found, no_content, ride_capacity, ride_members};
use crate::{AppState, auth::Caller, error::ApiError, respond::Format};

/// `GET /ride/{ride_id}/passengers`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
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
  let passengers = state
    .store
    .list_passengers(ride_id)
    .await
    .map_err(ApiError::store)?;
  state.guard.check(
    &caller,
    (Resource::Passenger, Action::List),
    &ride_members(&ride, &passengers),
  )?;
  format.many("passengers", &passengers)
}

/// `POST /ride/{ride_id}/passenger/{user_id}`
pub async fn join<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path((ride_id, user_id)): Path<(Id, Id)>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let ride = found(
    state.store.get_ride(ride_id).await.map_err(ApiError::store)?,
    "ride",
  )?;
  state
    .guard
    .check(&caller, (Resource::Passenger, Action::Create), &[user_id])?;

  let passenger = state.store.get_user(user_id).await.map_err(ApiError::store)?;
  let existing = state
    .store
    .list_passengers(ride_id)
    .await
    .map_err(ApiError::store)?;
  let capacity = ride_capacity(state.store.as_ref(), &ride).await?;

  let membership = Passenger::new(ride_id, user_id);
  membership.validate(MembershipContext {
    ride: &ride,
    passenger: passenger.as_ref(),
    existing: &existing,
    capacity,
    now: Utc::now(),
  })?;

  let membership = state
    .store
    .add_passenger(membership, capacity)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ValidationError::new(
        "passenger_count",
        ValidationKind::CapacityExceeded,
        "ride is full",
      )
    })?;
  tracing::info!(ride_id, passenger_id = user_id, "passenger joined");
  format.one(StatusCode::CREATED, "passenger", &membership)
}

/// `DELETE /ride/{ride_id}/passenger/{user_id}`
pub async fn leave<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path((ride_id, user_id)): Path<(Id, Id)>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let ride = found(
    state.store.get_ride(ride_id).await.map_err(ApiError::store)?,
    "ride",
  )?;
  found(
    state
      .store
      .get_passenger(ride_id, user_id)
      .await
      .map_err(ApiError::store)?,
    "passenger",
  )?;
  state.guard.check(
    &caller,
    (Resource::Passenger, Action::Delete),
    &[user_id, ride.owner_user_id],
  )?;

  state
    .store
    .remove_passenger(ride_id, user_id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(ride_id, passenger_id = user_id, "passenger left");
  Ok(no_content())
}
