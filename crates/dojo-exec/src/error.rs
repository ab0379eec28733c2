//! Error type for `dojo-exec`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The execution service could not be reached or answered with a
  /// non-success status. Surfaced verbatim; never retried here.
  #[error("execution service unavailable: {0}")]
  Upstream(String),

  #[error("unsupported language: {0:?}")]
  UnsupportedLanguage(String),

  #[error("malformed execution response: {0}")]
  MalformedResponse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self { Error::Upstream(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
