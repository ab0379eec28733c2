//! Handler for `/follows` — the follow toggle.

use axum::{Json, extract::State};
use dojo_core::store::PlatformStore;
use dojo_exec::ExecutionService;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Authenticated,
  error::{ApiError, store_err},
};

#[derive(Debug, Deserialize)]
pub struct ToggleBody {
  pub following_id: Uuid,
}

/// `POST /follows` — body: `{"following_id": "<uuid>"}`
///
/// One endpoint both follows and unfollows; the response reports which
/// happened: `{"state": "followed" | "unfollowed"}`.
pub async fn toggle<S, E>(
  State(state): State<AppState<S, E>>,
  auth: Authenticated,
  Json(body): Json<ToggleBody>,
) -> Result<Json<Value>, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  if state
    .store
    .identity_by_id(body.following_id)
    .await
    .map_err(store_err)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "no user with id {}",
      body.following_id
    )));
  }

  let follow_state = state
    .store
    .toggle_follow(auth.identity_id, body.following_id)
    .await
    .map_err(store_err)?;

  Ok(Json(json!({ "state": follow_state })))
}
