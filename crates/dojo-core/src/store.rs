//! The `PlatformStore` trait — the four logical stores behind one handle.
//!
//! The trait is implemented by storage backends (e.g. `dojo-store-sqlite`).
//! Higher layers (the profile assembler, the selectors, `dojo-api`) depend on
//! this abstraction, not on any concrete backend.
//!
//! Absent entities are `Option`; the associated error type is reserved for
//! storage faults and the typed registration conflicts. The batched lookups
//! (`identities_by_ids`, `challenges_by_ids`) exist so view assembly stays at
//! a handful of round trips instead of one query per related row.

use std::future::Future;

use uuid::Uuid;

use crate::{
  challenge::{AuthoredChallenge, Challenge, NewChallenge},
  follow::FollowState,
  identity::{Identity, NewIdentity},
  solution::{NewSolution, Solution},
};

/// Abstraction over a Dojo platform store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PlatformStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identities ────────────────────────────────────────────────────────

  /// Persist a new identity. The backend enforces username and email
  /// uniqueness and reports violations as typed errors.
  fn create_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  fn identity_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  fn identity_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  fn identity_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Batched lookup. Returns the identities that exist, in no particular
  /// order; missing ids are silently absent.
  fn identities_by_ids<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Identity>, Self::Error>> + Send + 'a;

  /// Case-insensitive substring search over name and username.
  fn search_identities<'a>(
    &'a self,
    fragment: &'a str,
  ) -> impl Future<Output = Result<Vec<Identity>, Self::Error>> + Send + 'a;

  // ── Follow edges ──────────────────────────────────────────────────────

  /// Toggle the edge for the exact ordered pair: create it if absent,
  /// delete it if present. Returns the state *after* the call. A losing
  /// insert race is treated as the edge existing.
  fn toggle_follow(
    &self,
    follower_id: Uuid,
    following_id: Uuid,
  ) -> impl Future<Output = Result<FollowState, Self::Error>> + Send + '_;

  /// Ids of identities following `user_id`, in stored order.
  fn follower_ids(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  /// Ids of identities `user_id` follows, in stored order.
  fn following_ids(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Challenges ────────────────────────────────────────────────────────

  fn create_challenge(
    &self,
    input: NewChallenge,
  ) -> impl Future<Output = Result<Challenge, Self::Error>> + Send + '_;

  fn challenge_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Challenge>, Self::Error>> + Send + '_;

  /// Single challenge with its author's display fields resolved.
  fn challenge_with_author(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AuthoredChallenge>, Self::Error>> + Send + '_;

  /// Batched lookup; missing ids are silently absent.
  fn challenges_by_ids<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Challenge>, Self::Error>> + Send + 'a;

  /// All challenges with author display fields, newest-created first.
  fn list_challenges(
    &self,
  ) -> impl Future<Output = Result<Vec<AuthoredChallenge>, Self::Error>> + Send + '_;

  /// Challenges authored by any of `author_ids`, newest-created first.
  fn challenges_by_authors<'a>(
    &'a self,
    author_ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<AuthoredChallenge>, Self::Error>> + Send + 'a;

  /// Challenges authored by one identity, newest-created first.
  fn challenges_by_author(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Challenge>, Self::Error>> + Send + '_;

  /// Every challenge id in the store.
  fn challenge_ids(
    &self,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Solutions ─────────────────────────────────────────────────────────

  /// Insert or replace the single solution for `(author, challenge)`.
  /// A replacement keeps the original solution id but takes the new body,
  /// language, and timestamp. A losing insert race falls back to
  /// overwriting the row the winner created.
  fn upsert_solution(
    &self,
    input: NewSolution,
  ) -> impl Future<Output = Result<Solution, Self::Error>> + Send + '_;

  /// Solutions authored by one identity, newest-created first.
  fn solutions_by_author(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Solution>, Self::Error>> + Send + '_;

  /// Ids of challenges `author_id` has solved.
  fn solved_challenge_ids(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;
}
