//! Handlers for the feed and the next-challenge pick.

use axum::{Json, extract::State};
use dojo_core::{
  challenge::AuthoredChallenge,
  feed::{feed_for, pick_unsolved},
  store::PlatformStore,
};
use dojo_exec::ExecutionService;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::Authenticated,
  error::{ApiError, store_err},
};

/// `GET /feed` — challenges authored by people the caller follows, newest
/// first. Following nobody yields `[]`.
pub async fn list<S, E>(
  State(state): State<AppState<S, E>>,
  auth: Authenticated,
) -> Result<Json<Vec<AuthoredChallenge>>, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let items = feed_for(state.store.as_ref(), auth.identity_id)
    .await
    .map_err(store_err)?;
  Ok(Json(items))
}

/// `GET /next-challenge` — `{"challenge_id": "<uuid>" | null}`, picked
/// uniformly at random from the challenges the caller has not solved.
pub async fn next<S, E>(
  State(state): State<AppState<S, E>>,
  auth: Authenticated,
) -> Result<Json<Value>, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let picked = pick_unsolved(state.store.as_ref(), auth.identity_id)
    .await
    .map_err(store_err)?;
  Ok(Json(json!({ "challenge_id": picked })))
}
