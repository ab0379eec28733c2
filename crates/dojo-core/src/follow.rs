//! Follow edges — the directed social graph.
//!
//! An edge means "follower follows following". At most one edge exists per
//! ordered pair; the backend enforces this with a unique constraint on
//! `(follower_id, following_id)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed follow relation between two identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEdge {
  pub edge_id:      Uuid,
  pub follower_id:  Uuid,
  pub following_id: Uuid,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Result of a follow toggle: the edge state *after* the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowState {
  Followed,
  Unfollowed,
}
