//! Error type for `dojo-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] dojo_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Registration hit the unique index on `identities.username`.
  #[error("username already taken: {0:?}")]
  UsernameTaken(String),

  /// Registration hit the unique index on `identities.email`.
  #[error("email already registered: {0:?}")]
  EmailTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
