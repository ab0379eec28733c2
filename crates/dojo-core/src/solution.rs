//! Solution — a user's latest submitted answer to a challenge.
//!
//! Exactly one solution is retained per `(author, challenge)` pair: a
//! resubmission replaces the body, language, and timestamp in place. There is
//! no version history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A stored solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
  pub solution_id:  Uuid,
  pub author_id:    Uuid,
  pub challenge_id: Uuid,
  pub body:         String,
  /// Language tag, e.g. `"javascript"` or `"python"`. Stored verbatim; the
  /// execution layer decides which tags it can run.
  pub language:     String,
  pub created_at:   DateTime<Utc>,
}

/// Input for [`crate::store::PlatformStore::upsert_solution`].
#[derive(Debug, Clone)]
pub struct NewSolution {
  pub author_id:    Uuid,
  pub challenge_id: Uuid,
  pub body:         String,
  pub language:     String,
}

impl NewSolution {
  pub fn validate(&self) -> Result<()> {
    if self.body.trim().is_empty() {
      return Err(Error::EmptyField("body"));
    }
    if self.language.trim().is_empty() {
      return Err(Error::EmptyField("language"));
    }
    Ok(())
  }
}
