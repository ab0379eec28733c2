//! Handlers for solution submission.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/challenges/:id/submit` | Grade against the challenge's test cases |
//! | `POST` | `/solutions` | Direct upsert, no grading |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use dojo_core::{solution::NewSolution, store::PlatformStore};
use dojo_exec::{ExecutionService, Language, grade::grade};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
  AppState,
  auth::Authenticated,
  error::{ApiError, store_err},
};

// ─── Graded submission ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  /// Solution source, a single function definition.
  pub body:     String,
  pub language: String,
}

/// `POST /challenges/:id/submit` — body: `{"body","language"}`
///
/// Runs the submission against every test case. The solution is persisted
/// only when all cases pass; a wrong answer still returns 200 with the
/// per-case report so the author can see what failed.
pub async fn submit<S, E>(
  State(state): State<AppState<S, E>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<SubmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let challenge = state
    .store
    .challenge_by_id(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("challenge {id} not found")))?;

  let language: Language = body.language.parse()?;
  let report =
    grade(state.exec.as_ref(), language, &challenge, &body.body).await?;

  let solution = if report.passed {
    let stored = state
      .store
      .upsert_solution(NewSolution {
        author_id:    auth.identity_id,
        challenge_id: id,
        body:         body.body,
        language:     language.as_str().to_owned(),
      })
      .await
      .map_err(store_err)?;
    tracing::info!(
      challenge_id = %id,
      language = language.as_str(),
      "accepted solution"
    );
    Some(stored)
  } else {
    None
  };

  Ok(Json(json!({
    "passed": report.passed,
    "cases": report.cases,
    "solution": solution,
  })))
}

// ─── Direct upsert ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpsertBody {
  pub challenge_id: Uuid,
  pub body:         String,
  pub language:     String,
}

/// `POST /solutions` — body: `{"challenge_id","body","language"}`
///
/// Trusted path for already-verified solutions (imports, backfills). The
/// (author, challenge) pair still holds at most one solution.
pub async fn upsert<S, E>(
  State(state): State<AppState<S, E>>,
  auth: Authenticated,
  Json(body): Json<UpsertBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore,
  E: ExecutionService,
{
  let input = NewSolution {
    author_id:    auth.identity_id,
    challenge_id: body.challenge_id,
    body:         body.body,
    language:     body.language,
  };
  input
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  if state
    .store
    .challenge_by_id(body.challenge_id)
    .await
    .map_err(store_err)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "challenge {} not found",
      body.challenge_id
    )));
  }

  let solution = state.store.upsert_solution(input).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(solution)))
}
