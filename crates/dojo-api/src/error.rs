//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// An external collaborator (the execution service) was unreachable.
  /// Surfaced verbatim; retrying is the caller's decision.
  #[error("upstream unavailable: {0}")]
  Upstream(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Wrap a backend error for the generic 500 arm.
pub fn store_err(e: impl std::error::Error + Send + Sync + 'static) -> ApiError {
  ApiError::Store(Box::new(e))
}

impl From<dojo_exec::Error> for ApiError {
  fn from(e: dojo_exec::Error) -> Self {
    match e {
      dojo_exec::Error::Upstream(m) => ApiError::Upstream(m),
      dojo_exec::Error::UnsupportedLanguage(l) => {
        ApiError::BadRequest(format!("unsupported language: {l:?}"))
      }
      other => ApiError::Upstream(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_owned())
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Upstream(m) => (StatusCode::BAD_GATEWAY, m.clone()),
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
