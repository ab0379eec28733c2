//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Test cases are stored as
//! compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use dojo_core::{
  challenge::{AuthoredChallenge, Challenge, TestCase},
  identity::Identity,
  solution::Solution,
};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| crate::Error::DateParse(e.to_string()))
}

// ─── Test cases ──────────────────────────────────────────────────────────────

pub fn encode_test_cases(cases: &[TestCase]) -> Result<String> {
  Ok(serde_json::to_string(cases)?)
}

pub fn decode_test_cases(s: &str) -> Result<Vec<TestCase>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id:     String,
  pub name:            String,
  pub username:        String,
  pub email:           String,
  pub credential_hash: String,
  pub created_at:      String,
}

impl RawIdentity {
  pub const COLUMNS: &'static str =
    "identity_id, name, username, email, credential_hash, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      identity_id:     row.get(0)?,
      name:            row.get(1)?,
      username:        row.get(2)?,
      email:           row.get(3)?,
      credential_hash: row.get(4)?,
      created_at:      row.get(5)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      identity_id:     decode_uuid(&self.identity_id)?,
      name:            self.name,
      username:        self.username,
      email:           self.email,
      credential_hash: self.credential_hash,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `challenges` row.
pub struct RawChallenge {
  pub challenge_id:  String,
  pub author_id:     String,
  pub title:         String,
  pub description:   String,
  pub function_name: String,
  pub parameters:    String,
  pub test_cases:    String,
  pub created_at:    String,
}

impl RawChallenge {
  pub const COLUMNS: &'static str =
    "challenge_id, author_id, title, description, function_name, parameters, \
     test_cases, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      challenge_id:  row.get(0)?,
      author_id:     row.get(1)?,
      title:         row.get(2)?,
      description:   row.get(3)?,
      function_name: row.get(4)?,
      parameters:    row.get(5)?,
      test_cases:    row.get(6)?,
      created_at:    row.get(7)?,
    })
  }

  pub fn into_challenge(self) -> Result<Challenge> {
    Ok(Challenge {
      challenge_id:  decode_uuid(&self.challenge_id)?,
      author_id:     decode_uuid(&self.author_id)?,
      title:         self.title,
      description:   self.description,
      function_name: self.function_name,
      parameters:    self.parameters,
      test_cases:    decode_test_cases(&self.test_cases)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// A `challenges` row left-joined with its author's display columns.
pub struct RawAuthoredChallenge {
  pub challenge:       RawChallenge,
  pub author_name:     Option<String>,
  pub author_username: Option<String>,
}

impl RawAuthoredChallenge {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      challenge:       RawChallenge::from_row(row)?,
      author_name:     row.get(8)?,
      author_username: row.get(9)?,
    })
  }

  pub fn into_authored(self) -> Result<AuthoredChallenge> {
    Ok(AuthoredChallenge {
      challenge:       self.challenge.into_challenge()?,
      author_name:     self.author_name.unwrap_or_else(|| "Unknown".to_owned()),
      author_username: self
        .author_username
        .unwrap_or_else(|| "Unknown".to_owned()),
    })
  }
}

/// Raw strings read directly from a `solutions` row.
pub struct RawSolution {
  pub solution_id:  String,
  pub author_id:    String,
  pub challenge_id: String,
  pub body:         String,
  pub language:     String,
  pub created_at:   String,
}

impl RawSolution {
  pub const COLUMNS: &'static str =
    "solution_id, author_id, challenge_id, body, language, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      solution_id:  row.get(0)?,
      author_id:    row.get(1)?,
      challenge_id: row.get(2)?,
      body:         row.get(3)?,
      language:     row.get(4)?,
      created_at:   row.get(5)?,
    })
  }

  pub fn into_solution(self) -> Result<Solution> {
    Ok(Solution {
      solution_id:  decode_uuid(&self.solution_id)?,
      author_id:    decode_uuid(&self.author_id)?,
      challenge_id: decode_uuid(&self.challenge_id)?,
      body:         self.body,
      language:     self.language,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
