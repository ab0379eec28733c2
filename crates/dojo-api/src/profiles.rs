//! Handlers for profile views.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profile` | The caller's own assembled profile |
//! | `GET`  | `/profiles/:username` | 404 if the username is unknown |

use axum::{
  Json,
  extract::{Path, State},
};
use dojo_core::{
  profile::{ProfileView, assemble_profile},
  store::PlatformStore,
};
use dojo_exec::ExecutionService;

use crate::{
  AppState,
  auth::Authenticated,
  error::{ApiError, store_err},
};

/// `GET /profile`
pub async fn own<S, E>(
  State(state): State<AppState<S, E>>,
  auth: Authenticated,
) -> Result<Json<ProfileView>, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  // A valid token for a deleted identity falls through to 404.
  let view = assemble_profile(state.store.as_ref(), auth.identity_id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound("profile not found".into()))?;
  Ok(Json(view))
}

/// `GET /profiles/:username`
pub async fn by_username<S, E>(
  State(state): State<AppState<S, E>>,
  _auth: Authenticated,
  Path(username): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let identity = state
    .store
    .identity_by_username(&username)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("no user {username:?}")))?;

  let view = assemble_profile(state.store.as_ref(), identity.identity_id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("no user {username:?}")))?;
  Ok(Json(view))
}
