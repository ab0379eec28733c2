//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Registration. 409 on a taken username or email |
//! | `GET`  | `/users?q=<fragment>` | Case-insensitive name/username search |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use dojo_core::{
  identity::{IdentityRef, NewIdentity, Registration},
  store::PlatformStore,
};
use dojo_exec::ExecutionService;
use serde::Deserialize;

use crate::{
  AppState,
  auth::{Authenticated, hash_password},
  error::{ApiError, store_err},
};

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /users` — body: `{"name","username","email","password"}`
///
/// Uniqueness is pre-checked here for a friendly message; the store's unique
/// indexes remain the actual guarantee, so a lost race still surfaces as an
/// error rather than a duplicate row.
pub async fn register<S, E>(
  State(state): State<AppState<S, E>>,
  Json(body): Json<Registration>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  if state
    .store
    .identity_by_username(&body.username)
    .await
    .map_err(store_err)?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "username {:?} is already taken",
      body.username
    )));
  }
  if state
    .store
    .identity_by_email(&body.email)
    .await
    .map_err(store_err)?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "email {:?} is already registered",
      body.email
    )));
  }

  let credential_hash = hash_password(&body.password)?;
  let identity = state
    .store
    .create_identity(NewIdentity {
      name: body.name,
      username: body.username,
      email: body.email,
      credential_hash,
    })
    .await
    .map_err(store_err)?;

  tracing::info!(username = %identity.username, "registered identity");
  Ok((StatusCode::CREATED, Json(identity)))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q: String,
}

/// `GET /users?q=<fragment>`
pub async fn search<S, E>(
  State(state): State<AppState<S, E>>,
  _auth: Authenticated,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<IdentityRef>>, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  if params.q.trim().is_empty() {
    return Ok(Json(Vec::new()));
  }
  let matches = state
    .store
    .search_identities(&params.q)
    .await
    .map_err(store_err)?;
  Ok(Json(matches.iter().map(IdentityRef::from).collect()))
}
