//! Error type for `rideshare-store-sqlite`.

use rideshare_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

impl Error {
  fn sqlite(&self) -> Option<&rusqlite::Error> {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => Some(e),
      Error::Database(_) => None,
    }
  }
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool {
    matches!(
      self.sqlite(),
      Some(rusqlite::Error::SqliteFailure(e, _))
        if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
