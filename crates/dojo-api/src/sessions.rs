//! Handlers for `/sessions` — login and token issuance.

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use dojo_core::store::PlatformStore;
use dojo_exec::ExecutionService;
use serde::Deserialize;
use serde_json::json;

use crate::{
  AppState,
  auth::{issue_token, verify_password},
  error::{ApiError, store_err},
};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  /// Username or email address.
  pub login:    String,
  pub password: String,
}

/// `POST /sessions` — body: `{"login","password"}`
///
/// The token is returned both in the body and as an `HttpOnly` cookie, so
/// browser and non-browser clients get the same flow. An unknown login and a
/// wrong password are indistinguishable: both are a plain 401.
pub async fn login<S, E>(
  State(state): State<AppState<S, E>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let identity = if body.login.contains('@') {
    state.store.identity_by_email(&body.login).await
  } else {
    state.store.identity_by_username(&body.login).await
  }
  .map_err(store_err)?
  .ok_or(ApiError::Unauthorized)?;

  if !verify_password(&body.password, &identity.credential_hash) {
    return Err(ApiError::Unauthorized);
  }

  let token = issue_token(&identity, &state.tokens)?;
  tracing::info!(username = %identity.username, "issued session token");

  let cookie = format!("token={token}; HttpOnly; SameSite=Strict; Path=/");
  Ok((
    [(header::SET_COOKIE, cookie)],
    Json(json!({ "token": token })),
  ))
}
