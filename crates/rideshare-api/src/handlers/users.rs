//! Handlers for user endpoints.
//!
//! Passwords arrive in clear text, are hashed before they reach the store,
//! and never leave the server. A body without `role` keeps the stored role
//! on update and creates a plain `user`.

use axum::{
  extract::State,
  http::StatusCode,
  response::Response,
};
use rideshare_core::{
  guard::{Action, Resource},
  model::{Id, User},
  role::Role,
  store::RideshareStore,
  validate::Validate as _,
};
use serde::Deserialize;

use super::{Path, Payload, found, no_content};
use crate::{
  AppState,
  auth::{Caller, hash_password},
  error::ApiError,
  respond::Format,
};

/// A user as accepted on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserBody {
  pub name:     String,
  pub email:    String,
  pub password: String,
  pub role:     Option<Role>,
  pub settings: serde_json::Value,
}

impl UserBody {
  fn into_user(self, id: Id, fallback_role: Role) -> User {
    User {
      id,
      name: self.name,
      email: self.email,
      password: self.password,
      role: self.role.unwrap_or(fallback_role),
      settings: self.settings,
      created_at: None,
    }
  }
}

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state.guard.check(&caller, (Resource::User, Action::List), &[])?;
  let users = state.store.list_users().await.map_err(ApiError::store)?;
  format.many("users", &users)
}

/// `GET /user/{user_id}`
pub async fn get_one<S>(
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
    .check(&caller, (Resource::User, Action::Read), &[user_id])?;
  let user = found(
    state.store.get_user(user_id).await.map_err(ApiError::store)?,
    "user",
  )?;
  format.one(StatusCode::OK, "user", &user)
}

/// `POST /user`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  format: Format,
  Payload(body): Payload<UserBody>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  state
    .guard
    .check(&caller, (Resource::User, Action::Create), &[])?;

  let mut user = body.into_user(0, Role::User);
  user.validate(())?;
  user.password = hash_password(&user.password)?;

  let user = state.store.create_user(user).await.map_err(ApiError::store)?;
  tracing::info!(user_id = user.id, role = %user.role, "user created");
  format.one(StatusCode::CREATED, "user", &user)
}

/// `PUT /user/{user_id}`
///
/// A change of `role` needs the role-change permission on top of the
/// ordinary update permission.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(user_id): Path<Id>,
  Payload(body): Payload<UserBody>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let existing = found(
    state.store.get_user(user_id).await.map_err(ApiError::store)?,
    "user",
  )?;
  state
    .guard
    .check(&caller, (Resource::User, Action::Update), &[existing.id])?;

  let mut user = body.into_user(user_id, existing.role);
  if user.role != existing.role {
    state
      .guard
      .check(&caller, (Resource::User, Action::ChangeRole), &[])?;
  }

  user.validate(())?;
  user.password = hash_password(&user.password)?;

  state.store.update_user(user).await.map_err(ApiError::store)?;
  Ok(no_content())
}

/// `DELETE /user/{user_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(user_id): Path<Id>,
) -> Result<Response, ApiError>
where
  S: RideshareStore + Clone + 'static,
{
  let existing = found(
    state.store.get_user(user_id).await.map_err(ApiError::store)?,
    "user",
  )?;
  state
    .guard
    .check(&caller, (Resource::User, Action::Delete), &[existing.id])?;

  state.store.delete_user(user_id).await.map_err(ApiError::store)?;
  tracing::info!(user_id, "user deleted");
  Ok(no_content())
}
