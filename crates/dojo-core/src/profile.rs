//! Profile assembly — the consolidated, denormalised view of one identity.
//!
//! The view is recomputed on every request and never stored. Related rows
//! are resolved with batched lookups: after the identity itself, the
//! assembler issues both edge-list reads, ONE batched identity fetch over
//! the union of edge endpoints, the authored challenges, the solutions, and
//! ONE batched challenge fetch over the solutions' challenge ids. A naive
//! per-edge join would cost a round trip per related row.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  challenge::Challenge,
  identity::{Identity, IdentityRef},
  solution::Solution,
  store::PlatformStore,
};

/// A solution paired with the challenge it solves. The challenge is
/// `Option` because challenge ids are not referentially enforced; a
/// dangling id yields `None` rather than dropping the entry.
#[derive(Debug, Clone, Serialize)]
pub struct SolvedEntry {
  pub solution:  Solution,
  pub challenge: Option<Challenge>,
}

/// The derived profile view. Ephemeral: owned by the requesting call and
/// discarded after serialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
  pub identity_id:         Uuid,
  pub name:                String,
  pub username:            String,
  pub email:               String,
  /// Identities following this one, in stored edge order.
  pub followers:           Vec<IdentityRef>,
  /// Identities this one follows, in stored edge order.
  pub following:           Vec<IdentityRef>,
  /// Challenges authored by this identity, newest first.
  pub authored_challenges: Vec<Challenge>,
  /// Submitted solutions joined with their challenges, newest first.
  pub solved:              Vec<SolvedEntry>,
}

/// Assemble the profile view for `identity_id`.
///
/// Returns `None` when the identity does not exist — never a view with
/// empty collections.
pub async fn assemble_profile<S>(
  store: &S,
  identity_id: Uuid,
) -> Result<Option<ProfileView>, S::Error>
where
  S: PlatformStore,
{
  let identity = match store.identity_by_id(identity_id).await? {
    Some(identity) => identity,
    None => return Ok(None),
  };

  let follower_ids  = store.follower_ids(identity_id).await?;
  let following_ids = store.following_ids(identity_id).await?;

  // One batched fetch covers both edge directions.
  let mut endpoint_ids = Vec::with_capacity(follower_ids.len() + following_ids.len());
  endpoint_ids.extend_from_slice(&follower_ids);
  endpoint_ids.extend_from_slice(&following_ids);
  endpoint_ids.sort_unstable();
  endpoint_ids.dedup();

  let endpoints: HashMap<Uuid, Identity> = store
    .identities_by_ids(&endpoint_ids)
    .await?
    .into_iter()
    .map(|identity| (identity.identity_id, identity))
    .collect();

  let resolve_refs = |ids: &[Uuid]| -> Vec<IdentityRef> {
    ids
      .iter()
      .filter_map(|id| endpoints.get(id).map(IdentityRef::from))
      .collect()
  };
  let followers = resolve_refs(&follower_ids);
  let following = resolve_refs(&following_ids);

  let authored_challenges = store.challenges_by_author(identity_id).await?;
  let solutions           = store.solutions_by_author(identity_id).await?;

  let mut solved_challenge_ids: Vec<Uuid> =
    solutions.iter().map(|s| s.challenge_id).collect();
  solved_challenge_ids.sort_unstable();
  solved_challenge_ids.dedup();

  let solved_challenges: HashMap<Uuid, Challenge> = store
    .challenges_by_ids(&solved_challenge_ids)
    .await?
    .into_iter()
    .map(|challenge| (challenge.challenge_id, challenge))
    .collect();

  let solved = solutions
    .into_iter()
    .map(|solution| {
      let challenge = solved_challenges.get(&solution.challenge_id).cloned();
      SolvedEntry { solution, challenge }
    })
    .collect();

  Ok(Some(ProfileView {
    identity_id: identity.identity_id,
    name: identity.name,
    username: identity.username,
    email: identity.email,
    followers,
    following,
    authored_challenges,
    solved,
  }))
}
