//! Bearer-token extractor and password hashing.

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use rand_core::OsRng;
use rideshare_core::{AuthenticationError, claims::Identity, store::RideshareStore};

use crate::{AppState, error::ApiError};

/// The authenticated caller. Present in a handler's arguments means the
/// request carried a valid, unexpired bearer token.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthenticationError> {
  let value = headers
    .get(header::AUTHORIZATION)
    .ok_or_else(|| AuthenticationError::Malformed("missing bearer token".into()))?
    .to_str()
    .map_err(|_| AuthenticationError::Malformed("non-ASCII authorization header".into()))?;

  value
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|token| !token.is_empty())
    .ok_or_else(|| AuthenticationError::Malformed("expected a bearer token".into()))
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: RideshareStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;
    let identity = state.decoder.decode(token, Utc::now())?;
    tracing::debug!(subject = identity.subject_id, role = %identity.role, "authenticated");
    Ok(Caller(identity))
  }
}

/// Hash a clear-text password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}
