//! [`SqliteStore`] — the SQLite implementation of [`PlatformStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use dojo_core::{
  challenge::{AuthoredChallenge, Challenge, NewChallenge},
  follow::FollowState,
  identity::{Identity, NewIdentity},
  solution::{NewSolution, Solution},
  store::PlatformStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAuthoredChallenge, RawChallenge, RawIdentity, RawSolution, encode_dt,
    encode_test_cases, encode_uuid,
  },
  schema::SCHEMA,
};

/// Columns for an authored-challenge row: the challenge joined with its
/// author's display fields.
const AUTHORED_COLUMNS: &str =
  "c.challenge_id, c.author_id, c.title, c.description, c.function_name, \
   c.parameters, c.test_cases, c.created_at, i.name, i.username";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Dojo platform store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row identity query with one string parameter.
  async fn identity_where(
    &self,
    sql: &'static str,
    param: String,
  ) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![param], RawIdentity::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  /// Collect the first column of every row as a Uuid.
  async fn id_column(
    &self,
    sql: &'static str,
    params: Vec<String>,
  ) -> Result<Vec<Uuid>> {
    let raw: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            row.get(0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raw
      .iter()
      .map(|s| Ok(Uuid::parse_str(s)?))
      .collect()
  }

  /// Run an authored-challenge query (challenge LEFT JOIN author).
  async fn authored_where(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<AuthoredChallenge>> {
    let raws: Vec<RawAuthoredChallenge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(params.iter()),
            RawAuthoredChallenge::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAuthoredChallenge::into_authored).collect()
  }
}

// ─── Constraint helpers ──────────────────────────────────────────────────────

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(code, _)
      if code.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

/// The `table.column` named in a UNIQUE-constraint failure, if that is what
/// the error is.
fn unique_violation_column(e: &tokio_rusqlite::Error) -> Option<&str> {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
    code,
    Some(msg),
  )) = e
    && code.code == rusqlite::ErrorCode::ConstraintViolation
  {
    return msg.strip_prefix("UNIQUE constraint failed: ");
  }
  None
}

// ─── PlatformStore impl ──────────────────────────────────────────────────────

impl PlatformStore for SqliteStore {
  type Error = Error;

  // ── Identities ────────────────────────────────────────────────────────────

  async fn create_identity(&self, input: NewIdentity) -> Result<Identity> {
    let identity = Identity {
      identity_id:     Uuid::new_v4(),
      name:            input.name,
      username:        input.username,
      email:           input.email,
      credential_hash: input.credential_hash,
      created_at:      Utc::now(),
    };

    let id_str   = encode_uuid(identity.identity_id);
    let name     = identity.name.clone();
    let username = identity.username.clone();
    let email    = identity.email.clone();
    let hash     = identity.credential_hash.clone();
    let at_str   = encode_dt(identity.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO identities (
             identity_id, name, username, email, credential_hash, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, username, email, hash, at_str],
        )?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(identity),
      Err(e) => match unique_violation_column(&e) {
        Some("identities.username") => {
          Err(Error::UsernameTaken(identity.username))
        }
        Some("identities.email") => Err(Error::EmailTaken(identity.email)),
        _ => Err(e.into()),
      },
    }
  }

  async fn identity_by_id(&self, id: Uuid) -> Result<Option<Identity>> {
    self
      .identity_where(
        "SELECT identity_id, name, username, email, credential_hash, created_at
         FROM identities WHERE identity_id = ?1",
        encode_uuid(id),
      )
      .await
  }

  async fn identity_by_username(
    &self,
    username: &str,
  ) -> Result<Option<Identity>> {
    self
      .identity_where(
        "SELECT identity_id, name, username, email, credential_hash, created_at
         FROM identities WHERE username = ?1",
        username.to_owned(),
      )
      .await
  }

  async fn identity_by_email(&self, email: &str) -> Result<Option<Identity>> {
    self
      .identity_where(
        "SELECT identity_id, name, username, email, credential_hash, created_at
         FROM identities WHERE email = ?1",
        email.to_owned(),
      )
      .await
  }

  async fn identities_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Identity>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawIdentity> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; id_strs.len()].join(", ");
        let sql = format!(
          "SELECT {} FROM identities WHERE identity_id IN ({placeholders})",
          RawIdentity::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(id_strs.iter()),
            RawIdentity::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdentity::into_identity).collect()
  }

  async fn search_identities(&self, fragment: &str) -> Result<Vec<Identity>> {
    let pattern = format!("%{fragment}%");

    let raws: Vec<RawIdentity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT identity_id, name, username, email, credential_hash, created_at
           FROM identities
           WHERE name LIKE ?1 OR username LIKE ?1
           ORDER BY username",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], RawIdentity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdentity::into_identity).collect()
  }

  // ── Follow edges ──────────────────────────────────────────────────────────

  async fn toggle_follow(
    &self,
    follower_id: Uuid,
    following_id: Uuid,
  ) -> Result<FollowState> {
    let edge_id   = encode_uuid(Uuid::new_v4());
    let follower  = encode_uuid(follower_id);
    let following = encode_uuid(following_id);
    let now       = encode_dt(Utc::now());

    let state = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT edge_id FROM follows
             WHERE follower_id = ?1 AND following_id = ?2",
            rusqlite::params![follower, following],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(edge) = existing {
          conn.execute(
            "DELETE FROM follows WHERE edge_id = ?1",
            rusqlite::params![edge],
          )?;
          return Ok(FollowState::Unfollowed);
        }

        match conn.execute(
          "INSERT INTO follows (
             edge_id, follower_id, following_id, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![edge_id, follower, following, now],
        ) {
          Ok(_) => Ok(FollowState::Followed),
          // Lost a race with an identical concurrent follow. The winner's
          // edge stands, which is the state this call asked for.
          Err(e) if is_unique_violation(&e) => Ok(FollowState::Followed),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(state)
  }

  async fn follower_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
    self
      .id_column(
        "SELECT follower_id FROM follows WHERE following_id = ?1",
        vec![encode_uuid(user_id)],
      )
      .await
  }

  async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
    self
      .id_column(
        "SELECT following_id FROM follows WHERE follower_id = ?1",
        vec![encode_uuid(user_id)],
      )
      .await
  }

  // ── Challenges ────────────────────────────────────────────────────────────

  async fn create_challenge(&self, input: NewChallenge) -> Result<Challenge> {
    let challenge = Challenge {
      challenge_id:  Uuid::new_v4(),
      author_id:     input.author_id,
      title:         input.title,
      description:   input.description,
      function_name: input.function_name,
      parameters:    input.parameters,
      test_cases:    input.test_cases,
      created_at:    Utc::now(),
    };

    let id_str        = encode_uuid(challenge.challenge_id);
    let author_str    = encode_uuid(challenge.author_id);
    let title         = challenge.title.clone();
    let description   = challenge.description.clone();
    let function_name = challenge.function_name.clone();
    let parameters    = challenge.parameters.clone();
    let cases_str     = encode_test_cases(&challenge.test_cases)?;
    let at_str        = encode_dt(challenge.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO challenges (
             challenge_id, author_id, title, description, function_name,
             parameters, test_cases, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            author_str,
            title,
            description,
            function_name,
            parameters,
            cases_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(challenge)
  }

  async fn challenge_by_id(&self, id: Uuid) -> Result<Option<Challenge>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawChallenge> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM challenges WHERE challenge_id = ?1",
          RawChallenge::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawChallenge::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawChallenge::into_challenge).transpose()
  }

  async fn challenge_with_author(
    &self,
    id: Uuid,
  ) -> Result<Option<AuthoredChallenge>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAuthoredChallenge> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {AUTHORED_COLUMNS}
           FROM challenges c
           LEFT JOIN identities i ON i.identity_id = c.author_id
           WHERE c.challenge_id = ?1"
        );
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![id_str],
              RawAuthoredChallenge::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAuthoredChallenge::into_authored).transpose()
  }

  async fn challenges_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Challenge>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawChallenge> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; id_strs.len()].join(", ");
        let sql = format!(
          "SELECT {} FROM challenges WHERE challenge_id IN ({placeholders})",
          RawChallenge::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(id_strs.iter()),
            RawChallenge::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChallenge::into_challenge).collect()
  }

  async fn list_challenges(&self) -> Result<Vec<AuthoredChallenge>> {
    self
      .authored_where(
        format!(
          "SELECT {AUTHORED_COLUMNS}
           FROM challenges c
           LEFT JOIN identities i ON i.identity_id = c.author_id
           ORDER BY c.created_at DESC, c.challenge_id"
        ),
        Vec::new(),
      )
      .await
  }

  async fn challenges_by_authors(
    &self,
    author_ids: &[Uuid],
  ) -> Result<Vec<AuthoredChallenge>> {
    if author_ids.is_empty() {
      return Ok(Vec::new());
    }

    let id_strs: Vec<String> =
      author_ids.iter().copied().map(encode_uuid).collect();
    let placeholders = vec!["?"; id_strs.len()].join(", ");

    self
      .authored_where(
        format!(
          "SELECT {AUTHORED_COLUMNS}
           FROM challenges c
           LEFT JOIN identities i ON i.identity_id = c.author_id
           WHERE c.author_id IN ({placeholders})
           ORDER BY c.created_at DESC, c.challenge_id"
        ),
        id_strs,
      )
      .await
  }

  async fn challenges_by_author(
    &self,
    author_id: Uuid,
  ) -> Result<Vec<Challenge>> {
    let author_str = encode_uuid(author_id);

    let raws: Vec<RawChallenge> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM challenges
           WHERE author_id = ?1
           ORDER BY created_at DESC, challenge_id",
          RawChallenge::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![author_str], RawChallenge::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChallenge::into_challenge).collect()
  }

  async fn challenge_ids(&self) -> Result<Vec<Uuid>> {
    self
      .id_column("SELECT challenge_id FROM challenges", Vec::new())
      .await
  }

  // ── Solutions ─────────────────────────────────────────────────────────────

  async fn upsert_solution(&self, input: NewSolution) -> Result<Solution> {
    let NewSolution { author_id, challenge_id, body, language } = input;

    let now          = Utc::now();
    let candidate_id = encode_uuid(Uuid::new_v4());
    let author_str   = encode_uuid(author_id);
    let chal_str     = encode_uuid(challenge_id);
    let body_arg     = body.clone();
    let language_arg = language.clone();
    let at_str       = encode_dt(now);

    let solution_id: String = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT solution_id FROM solutions
             WHERE author_id = ?1 AND challenge_id = ?2",
            rusqlite::params![author_str, chal_str],
            |row| row.get(0),
          )
          .optional()?;

        let solution_id = match existing {
          Some(id) => id,
          None => {
            match conn.execute(
              "INSERT INTO solutions (
                 solution_id, author_id, challenge_id, body, language,
                 created_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![
                candidate_id,
                author_str,
                chal_str,
                body_arg,
                language_arg,
                at_str,
              ],
            ) {
              Ok(_) => return Ok(candidate_id),
              // Lost a race with a concurrent submit for the same pair;
              // fall back to overwriting the row the winner created.
              Err(e) if is_unique_violation(&e) => conn.query_row(
                "SELECT solution_id FROM solutions
                 WHERE author_id = ?1 AND challenge_id = ?2",
                rusqlite::params![author_str, chal_str],
                |row| row.get(0),
              )?,
              Err(e) => return Err(e.into()),
            }
          }
        };

        conn.execute(
          "UPDATE solutions SET body = ?1, language = ?2, created_at = ?3
           WHERE solution_id = ?4",
          rusqlite::params![body_arg, language_arg, at_str, solution_id],
        )?;
        Ok(solution_id)
      })
      .await?;

    Ok(Solution {
      solution_id: Uuid::parse_str(&solution_id)?,
      author_id,
      challenge_id,
      body,
      language,
      created_at: now,
    })
  }

  async fn solutions_by_author(
    &self,
    author_id: Uuid,
  ) -> Result<Vec<Solution>> {
    let author_str = encode_uuid(author_id);

    let raws: Vec<RawSolution> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM solutions
           WHERE author_id = ?1
           ORDER BY created_at DESC, solution_id",
          RawSolution::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![author_str], RawSolution::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSolution::into_solution).collect()
  }

  async fn solved_challenge_ids(&self, author_id: Uuid) -> Result<Vec<Uuid>> {
    self
      .id_column(
        "SELECT challenge_id FROM solutions WHERE author_id = ?1",
        vec![encode_uuid(author_id)],
      )
      .await
  }
}
