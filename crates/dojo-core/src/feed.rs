//! Feed and next-challenge selection.

use std::collections::HashSet;

use rand::seq::SliceRandom as _;
use uuid::Uuid;

use crate::{challenge::AuthoredChallenge, store::PlatformStore};

/// Challenges authored by identities that `identity_id` follows, newest
/// first. An empty following set yields an empty feed, not an error.
pub async fn feed_for<S>(
  store: &S,
  identity_id: Uuid,
) -> Result<Vec<AuthoredChallenge>, S::Error>
where
  S: PlatformStore,
{
  let following = store.following_ids(identity_id).await?;
  if following.is_empty() {
    return Ok(Vec::new());
  }
  store.challenges_by_authors(&following).await
}

/// Pick, uniformly at random, a challenge `identity_id` has not yet solved.
///
/// The eligible set is computed fresh on every call; nothing is cached.
/// Returns `None` when every existing challenge is already solved.
pub async fn pick_unsolved<S>(
  store: &S,
  identity_id: Uuid,
) -> Result<Option<Uuid>, S::Error>
where
  S: PlatformStore,
{
  let solved: HashSet<Uuid> = store
    .solved_challenge_ids(identity_id)
    .await?
    .into_iter()
    .collect();

  let eligible: Vec<Uuid> = store
    .challenge_ids()
    .await?
    .into_iter()
    .filter(|id| !solved.contains(id))
    .collect();

  Ok(eligible.choose(&mut rand::thread_rng()).copied())
}
