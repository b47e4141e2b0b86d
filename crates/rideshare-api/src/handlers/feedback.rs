//! Handlers for feedback endpoints.
//!
//! Feedback is written by a passenger about a ride. On update the author and
//! ride recorded at creation are kept; whatever the body says about them is
//! ignored.

use axum::{
  extract::State,
  http::StatusCode,
  response::Response,
};
use rideshare_core::{
  claims::Identity,
  guard::{Action, Resource},
  model::{Feedback, Id},
  store::RideshareStore,
  validate::{FeedbackContext, Validate as _},
};

use super::{Path, Payload, found, no_content};
use crate::{AppState, auth::Caller, error::ApiError, respond::Format};

const OP: Resource = Resource::Feedback;

/// `GET /feedback`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::List), &[])?;
  let feedback = state.store.list_feedback().await.map_err(ApiError::store)?;
  format.many("feedback", &feedback)
}

/// `GET /feedback/{feedback_id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(feedback_id): Path<Id>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (OP, Action::Read), &[])?;
  let feedback = found(
    state
      .store
      .get_feedback(feedback_id)
      .await
      .map_err(ApiError::store)?,
    "feedback",
  )?;
  format.one(StatusCode::OK, "feedback", &feedback)
}

/// `POST /feedback`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
  Payload(mut feedback): Payload<Feedback>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state
    .guard
    .check(&caller, (OP, Action::Create), &[feedback.user_id])?;

  feedback.id = 0;
  validate_candidate(&state, &caller, &feedback).await?;

  let feedback = state
    .store
    .create_feedback(feedback)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    feedback_id = feedback.id,
    ride_id = feedback.ride_id,
    score = feedback.score,
    "feedback recorded"
  );
  format.one(StatusCode::CREATED, "feedback", &feedback)
}

/// `PUT /feedback/{feedback_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(feedback_id): Path<Id>,
  Payload(feedback): Payload<Feedback>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let existing = found(
    state
      .store
      .get_feedback(feedback_id)
      .await
      .map_err(ApiError::store)?,
    "feedback",
  )?;
  state
    .guard
    .check(&caller, (OP, Action::Update), &[existing.user_id])?;

  let feedback = feedback.pinned_to(&existing);
  validate_candidate(&state, &caller, &feedback).await?;

  state
    .store
    .update_feedback(feedback)
    .await
    .map_err(ApiError::store)?;
  Ok(no_content())
}

/// `DELETE /feedback/{feedback_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(feedback_id): Path<Id>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let existing = found(
    state
      .store
      .get_feedback(feedback_id)
      .await
      .map_err(ApiError::store)?,
    "feedback",
  )?;
  state
    .guard
    .check(&caller, (OP, Action::Delete), &[existing.user_id])?;

  state
    .store
    .delete_feedback(feedback_id)
    .await
    .map_err(ApiError::store)?;
  Ok(no_content())
}

/// `GET /ride/{ride_id}/feedback`, public.
pub async fn list_by_ride<S>(
  State(state): State<AppState<S>>,
  Path(ride_id): Path<Id>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let feedback = state
    .store
    .list_feedback_by_ride(ride_id)
    .await
    .map_err(ApiError::store)?;
  format.many("feedback", &feedback)
}

/// `GET /user/{user_id}/feedback`
pub async fn list_by_author<S>(
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
  let feedback = state
    .store
    .list_feedback_by_author(user_id)
    .await
    .map_err(ApiError::store)?;
  format.many("feedback", &feedback)
}

/// `GET /user/{user_id}/ride/{ride_id}/feedback`
pub async fn list_by_author_and_ride<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path((user_id, ride_id)): Path<(Id, Id)>,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state
    .guard
    .check(&caller, (OP, Action::ListByOwner), &[user_id])?;
  let feedback = state
    .store
    .list_feedback_by_author_and_ride(user_id, ride_id)
    .await
    .map_err(ApiError::store)?;
  format.many("feedback", &feedback)
}

async fn validate_candidate<S: RideshareStore>(
  state: &AppState<S>,
  caller: &Identity,
  feedback: &Feedback,
) -> Result<(), ApiError> {
  let ride = state
    .store
    .get_ride(feedback.ride_id)
    .await
    .map_err(ApiError::store)?;
  let author = state
    .store
    .get_user(feedback.user_id)
    .await
    .map_err(ApiError::store)?;
  let passengers = match &ride {
    Some(ride) => state
      .store
      .list_passengers(ride.id)
      .await
      .map_err(ApiError::store)?,
    None => Vec::new(),
  };
  feedback.validate(FeedbackContext {
    ride:            ride.as_ref(),
    author:          author.as_ref(),
    passengers:      &passengers,
    acting_as_admin: state.guard.is_admin(caller),
  })?;
  Ok(())
}
