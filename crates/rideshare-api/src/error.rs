//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use rideshare_core::{
  AuthenticationError, AuthorizationError, ValidationError, store::StoreError,
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Authentication(#[from] AuthenticationError),

  #[error(transparent)]
  Authorization(#[from] AuthorizationError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The primary resource named in the path does not exist.
  #[error("{0} not found")]
  NotFound(&'static str),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Classify a store failure: constraint violations are conflicts, the rest
  /// are server errors.
  pub fn store<E: StoreError>(e: E) -> Self {
    if e.is_conflict() {
      ApiError::Conflict(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
      ApiError::Authorization(_) => StatusCode::FORBIDDEN,
      ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match &self {
      ApiError::Authentication(e) => tracing::debug!(error = %e, "authentication failed"),
      ApiError::Authorization(_) => tracing::warn!("request denied"),
      ApiError::Validation(e) => {
        tracing::debug!(field = e.field, kind = %e.kind, "validation failed: {e}")
      }
      ApiError::Store(e) => tracing::error!(error = %e, "store failure"),
      ApiError::Internal(e) => tracing::error!(error = %e, "internal failure"),
      ApiError::BadRequest(_) | ApiError::NotFound(_) | ApiError::Conflict(_) => {}
    }

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
