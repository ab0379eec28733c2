//! Handlers for `/challenges` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/challenges` | All challenges, newest first, with author fields |
//! | `POST` | `/challenges` | Authoring. Validated before insert |
//! | `GET`  | `/challenges/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use dojo_core::{
  challenge::{AuthoredChallenge, NewChallenge, TestCase},
  store::PlatformStore,
};
use dojo_exec::ExecutionService;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::Authenticated,
  error::{ApiError, store_err},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /challenges`
pub async fn list<S, E>(
  State(state): State<AppState<S, E>>,
  _auth: Authenticated,
) -> Result<Json<Vec<AuthoredChallenge>>, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let challenges = state.store.list_challenges().await.map_err(store_err)?;
  Ok(Json(challenges))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Authoring input; the author is the authenticated caller, never a field.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:         String,
  pub description:   String,
  pub function_name: String,
  pub parameters:    String,
  pub test_cases:    Vec<TestCase>,
}

/// `POST /challenges`
pub async fn create<S, E>(
  State(state): State<AppState<S, E>>,
  auth: Authenticated,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let input = NewChallenge {
    author_id:     auth.identity_id,
    title:         body.title,
    description:   body.description,
    function_name: body.function_name,
    parameters:    body.parameters,
    test_cases:    body.test_cases,
  };
  input
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let challenge = state
    .store
    .create_challenge(input)
    .await
    .map_err(store_err)?;

  tracing::info!(challenge_id = %challenge.challenge_id, "created challenge");
  Ok((StatusCode::CREATED, Json(challenge)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /challenges/:id`
pub async fn get_one<S, E>(
  State(state): State<AppState<S, E>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<AuthoredChallenge>, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let challenge = state
    .store
    .challenge_with_author(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("challenge {id} not found")))?;
  Ok(Json(challenge))
}
