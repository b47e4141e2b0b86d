//! Response content negotiation.
//!
//! Every response is JSON unless the request says `Accept: application/xml`
//! exactly, in which case the body is serialised with `quick-xml`. Lists are
//! wrapped in a root element with one `<item>` per entry.

use std::convert::Infallible;

use axum::{
  Json,
  extract::FromRequestParts,
  http::{HeaderValue, StatusCode, header, request::Parts},
  response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

const APPLICATION_XML: &str = "application/xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
  #[default]
  Json,
  Xml,
}

impl<S: Send + Sync> FromRequestParts<S> for Format {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
    let wants_xml = parts
      .headers
      .get(header::ACCEPT)
      .is_some_and(|v| v.as_bytes() == APPLICATION_XML.as_bytes());
    Ok(if wants_xml { Format::Xml } else { Format::Json })
  }
}

#[derive(Serialize)]
struct Items<'a, T> {
  item: &'a [T],
}

impl Format {
  /// Render a single record under the element `root`.
  pub fn one<T: Serialize>(
    self,
    status: StatusCode,
    root: &str,
    value: &T,
  ) -> Result<Response, ApiError> {
    match self {
      Format::Json => Ok((status, Json(value)).into_response()),
      Format::Xml => xml(status, root, value),
    }
  }

  /// Render a list; JSON gets a bare array.
  pub fn many<T: Serialize>(self, root: &str, values: &[T]) -> Result<Response, ApiError> {
    match self {
      Format::Json => Ok((StatusCode::OK, Json(values)).into_response()),
      Format::Xml => xml(StatusCode::OK, root, &Items { item: values }),
    }
  }
}

fn xml<T: Serialize>(status: StatusCode, root: &str, value: &T) -> Result<Response, ApiError> {
  let body = quick_xml::se::to_string_with_root(root, value)
    .map_err(|e| ApiError::Internal(format!("xml error: {e}")))?;
  let mut res = (status, body).into_response();
  res
    .headers_mut()
    .insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_XML));
  Ok(res)
}
