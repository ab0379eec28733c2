//! Integration tests for `SqliteStore` against an in-memory database.

use dojo_core::{
  challenge::{NewChallenge, TestCase},
  feed::{feed_for, pick_unsolved},
  follow::FollowState,
  identity::{Identity, NewIdentity},
  profile::assemble_profile,
  solution::NewSolution,
  store::PlatformStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn register(s: &SqliteStore, username: &str) -> Identity {
  s.create_identity(NewIdentity {
    name:            format!("{username} Example"),
    username:        username.to_owned(),
    email:           format!("{username}@example.com"),
    credential_hash: "$argon2id$stub".to_owned(),
  })
  .await
  .unwrap()
}

fn new_challenge(author: Uuid, title: &str) -> NewChallenge {
  NewChallenge {
    author_id:     author,
    title:         title.to_owned(),
    description:   "Add the two arguments.".to_owned(),
    function_name: "sum".to_owned(),
    parameters:    "a, b".to_owned(),
    test_cases:    vec![TestCase {
      input:           "1, 2".to_owned(),
      expected_output: "3".to_owned(),
    }],
  }
}

fn new_solution(author: Uuid, challenge: Uuid, language: &str) -> NewSolution {
  NewSolution {
    author_id:    author,
    challenge_id: challenge,
    body:         format!("// {language} solution"),
    language:     language.to_owned(),
  }
}

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_identity() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  let by_id = s.identity_by_id(alice.identity_id).await.unwrap().unwrap();
  assert_eq!(by_id.username, "alice");

  let by_username = s.identity_by_username("alice").await.unwrap().unwrap();
  assert_eq!(by_username.identity_id, alice.identity_id);

  let by_email = s
    .identity_by_email("alice@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(by_email.identity_id, alice.identity_id);
}

#[tokio::test]
async fn missing_identity_returns_none() {
  let s = store().await;
  assert!(s.identity_by_id(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.identity_by_username("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_a_typed_error() {
  let s = store().await;
  register(&s, "alice").await;

  let err = s
    .create_identity(NewIdentity {
      name:            "Other Alice".to_owned(),
      username:        "alice".to_owned(),
      email:           "other@example.com".to_owned(),
      credential_hash: "$argon2id$stub".to_owned(),
    })
    .await
    .unwrap_err();

  assert!(matches!(err, Error::UsernameTaken(u) if u == "alice"));
}

#[tokio::test]
async fn duplicate_email_is_a_typed_error() {
  let s = store().await;
  register(&s, "alice").await;

  let err = s
    .create_identity(NewIdentity {
      name:            "Other Alice".to_owned(),
      username:        "alice2".to_owned(),
      email:           "alice@example.com".to_owned(),
      credential_hash: "$argon2id$stub".to_owned(),
    })
    .await
    .unwrap_err();

  assert!(matches!(err, Error::EmailTaken(e) if e == "alice@example.com"));
}

#[tokio::test]
async fn identities_by_ids_is_batched_and_tolerant() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;

  let ids = [alice.identity_id, Uuid::new_v4(), bob.identity_id];
  let found = s.identities_by_ids(&ids).await.unwrap();
  assert_eq!(found.len(), 2);

  assert!(s.identities_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_matches_name_and_username_case_insensitively() {
  let s = store().await;
  register(&s, "alice").await;
  register(&s, "bob").await;

  let hits = s.search_identities("ALI").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].username, "alice");

  // "Example" appears in every display name.
  let hits = s.search_identities("example").await.unwrap();
  assert_eq!(hits.len(), 2);
}

// ─── Follow edges ────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_follow_flips_state() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;

  let state = s
    .toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();
  assert_eq!(state, FollowState::Followed);

  let state = s
    .toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();
  assert_eq!(state, FollowState::Unfollowed);
}

#[tokio::test]
async fn toggle_twice_restores_the_original_edge_state() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;

  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();
  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();

  assert!(s.following_ids(alice.identity_id).await.unwrap().is_empty());
  assert!(s.follower_ids(bob.identity_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn followed_state_is_visible_from_both_directions() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;

  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();

  assert_eq!(
    s.following_ids(alice.identity_id).await.unwrap(),
    vec![bob.identity_id]
  );
  assert_eq!(
    s.follower_ids(bob.identity_id).await.unwrap(),
    vec![alice.identity_id]
  );

  // The reverse direction has no edge.
  assert!(s.following_ids(bob.identity_id).await.unwrap().is_empty());
  assert!(s.follower_ids(alice.identity_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn follow_is_directional_and_pairwise() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;
  let carol = register(&s, "carol").await;

  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();
  s.toggle_follow(carol.identity_id, bob.identity_id)
    .await
    .unwrap();

  let followers = s.follower_ids(bob.identity_id).await.unwrap();
  assert_eq!(followers, vec![alice.identity_id, carol.identity_id]);

  // Unfollowing one pair leaves the other untouched.
  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();
  assert_eq!(
    s.follower_ids(bob.identity_id).await.unwrap(),
    vec![carol.identity_id]
  );
}

// ─── Challenges ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_challenge() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  let created = s
    .create_challenge(new_challenge(alice.identity_id, "Sum of two"))
    .await
    .unwrap();

  let fetched = s
    .challenge_by_id(created.challenge_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.title, "Sum of two");
  assert_eq!(fetched.test_cases, created.test_cases);

  let authored = s
    .challenge_with_author(created.challenge_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(authored.author_name, "alice Example");
  assert_eq!(authored.author_username, "alice");
}

#[tokio::test]
async fn challenge_author_falls_back_to_unknown() {
  let s = store().await;

  // Author id that no identity row backs; ids are not referentially
  // enforced.
  let created = s
    .create_challenge(new_challenge(Uuid::new_v4(), "Orphaned"))
    .await
    .unwrap();

  let authored = s
    .challenge_with_author(created.challenge_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(authored.author_name, "Unknown");
  assert_eq!(authored.author_username, "Unknown");
}

#[tokio::test]
async fn list_challenges_is_newest_first() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  let first  = s
    .create_challenge(new_challenge(alice.identity_id, "first"))
    .await
    .unwrap();
  let second = s
    .create_challenge(new_challenge(alice.identity_id, "second"))
    .await
    .unwrap();

  let all = s.list_challenges().await.unwrap();
  assert_eq!(all.len(), 2);
  // Created within the same instant at worst; newest-first with id tiebreak
  // still puts a strictly-later row first.
  assert!(
    all[0].challenge.created_at >= all[1].challenge.created_at,
    "expected newest-first ordering"
  );
  let ids: Vec<Uuid> = all.iter().map(|c| c.challenge.challenge_id).collect();
  assert!(ids.contains(&first.challenge_id));
  assert!(ids.contains(&second.challenge_id));
}

#[tokio::test]
async fn challenges_by_authors_restricts_to_the_given_set() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;
  let carol = register(&s, "carol").await;

  s.create_challenge(new_challenge(alice.identity_id, "from alice"))
    .await
    .unwrap();
  s.create_challenge(new_challenge(bob.identity_id, "from bob"))
    .await
    .unwrap();
  s.create_challenge(new_challenge(carol.identity_id, "from carol"))
    .await
    .unwrap();

  let authors = [alice.identity_id, bob.identity_id];
  let subset = s.challenges_by_authors(&authors).await.unwrap();
  assert_eq!(subset.len(), 2);
  assert!(
    subset
      .iter()
      .all(|c| authors.contains(&c.challenge.author_id))
  );

  assert!(s.challenges_by_authors(&[]).await.unwrap().is_empty());
}

// ─── Solutions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_keeps_exactly_one_row_per_pair() {
  let s = store().await;
  let carol = register(&s, "carol").await;
  let challenge = s
    .create_challenge(new_challenge(carol.identity_id, "C2"))
    .await
    .unwrap();

  let first = s
    .upsert_solution(new_solution(
      carol.identity_id,
      challenge.challenge_id,
      "python",
    ))
    .await
    .unwrap();

  let second = s
    .upsert_solution(new_solution(
      carol.identity_id,
      challenge.challenge_id,
      "javascript",
    ))
    .await
    .unwrap();

  // The replacement keeps the original row id but the new body/language.
  assert_eq!(second.solution_id, first.solution_id);
  assert_eq!(second.language, "javascript");

  let all = s.solutions_by_author(carol.identity_id).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].language, "javascript");
  assert_eq!(all[0].body, "// javascript solution");
}

#[tokio::test]
async fn solutions_for_different_challenges_do_not_collide() {
  let s = store().await;
  let carol = register(&s, "carol").await;
  let c1 = s
    .create_challenge(new_challenge(carol.identity_id, "C1"))
    .await
    .unwrap();
  let c2 = s
    .create_challenge(new_challenge(carol.identity_id, "C2"))
    .await
    .unwrap();

  s.upsert_solution(new_solution(carol.identity_id, c1.challenge_id, "python"))
    .await
    .unwrap();
  s.upsert_solution(new_solution(carol.identity_id, c2.challenge_id, "python"))
    .await
    .unwrap();

  let solved = s.solved_challenge_ids(carol.identity_id).await.unwrap();
  assert_eq!(solved.len(), 2);
  assert!(solved.contains(&c1.challenge_id));
  assert!(solved.contains(&c2.challenge_id));
}

// ─── Profile assembly ────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_for_missing_identity_is_none() {
  let s = store().await;
  assert!(assemble_profile(&s, Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn profile_joins_all_four_stores() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;
  let carol = register(&s, "carol").await;

  // bob and carol follow alice; alice follows bob.
  s.toggle_follow(bob.identity_id, alice.identity_id)
    .await
    .unwrap();
  s.toggle_follow(carol.identity_id, alice.identity_id)
    .await
    .unwrap();
  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();

  let authored = s
    .create_challenge(new_challenge(alice.identity_id, "alice's"))
    .await
    .unwrap();
  let bobs = s
    .create_challenge(new_challenge(bob.identity_id, "bob's"))
    .await
    .unwrap();
  s.upsert_solution(new_solution(
    alice.identity_id,
    bobs.challenge_id,
    "python",
  ))
  .await
  .unwrap();

  let profile = assemble_profile(&s, alice.identity_id)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(profile.username, "alice");

  let follower_names: Vec<&str> =
    profile.followers.iter().map(|f| f.username.as_str()).collect();
  assert_eq!(follower_names, vec!["bob", "carol"]);

  let following_names: Vec<&str> =
    profile.following.iter().map(|f| f.username.as_str()).collect();
  assert_eq!(following_names, vec!["bob"]);

  assert_eq!(profile.authored_challenges.len(), 1);
  assert_eq!(
    profile.authored_challenges[0].challenge_id,
    authored.challenge_id
  );

  assert_eq!(profile.solved.len(), 1);
  assert_eq!(profile.solved[0].solution.challenge_id, bobs.challenge_id);
  let joined = profile.solved[0].challenge.as_ref().unwrap();
  assert_eq!(joined.title, "bob's");
}

#[tokio::test]
async fn profile_tolerates_a_dangling_solution_challenge() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  s.upsert_solution(new_solution(alice.identity_id, Uuid::new_v4(), "python"))
    .await
    .unwrap();

  let profile = assemble_profile(&s, alice.identity_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(profile.solved.len(), 1);
  assert!(profile.solved[0].challenge.is_none());
}

// ─── Feed ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn feed_is_empty_without_followings() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;
  s.create_challenge(new_challenge(bob.identity_id, "from bob"))
    .await
    .unwrap();

  assert!(feed_for(&s, alice.identity_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn feed_follows_the_follow_toggle() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;

  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();
  let c1 = s
    .create_challenge(new_challenge(bob.identity_id, "C1"))
    .await
    .unwrap();

  let feed = feed_for(&s, alice.identity_id).await.unwrap();
  assert_eq!(feed.len(), 1);
  assert_eq!(feed[0].challenge.challenge_id, c1.challenge_id);
  assert_eq!(feed[0].author_username, "bob");

  // Unfollow empties the feed again.
  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();
  assert!(feed_for(&s, alice.identity_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn feed_never_includes_unfollowed_authors() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob   = register(&s, "bob").await;
  let carol = register(&s, "carol").await;

  s.toggle_follow(alice.identity_id, bob.identity_id)
    .await
    .unwrap();
  s.create_challenge(new_challenge(bob.identity_id, "from bob"))
    .await
    .unwrap();
  s.create_challenge(new_challenge(carol.identity_id, "from carol"))
    .await
    .unwrap();

  let feed = feed_for(&s, alice.identity_id).await.unwrap();
  assert_eq!(feed.len(), 1);
  assert!(feed.iter().all(|c| c.challenge.author_id == bob.identity_id));
}

// ─── Next-challenge selection ────────────────────────────────────────────────

#[tokio::test]
async fn pick_unsolved_excludes_the_solved_set() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let solved = s
    .create_challenge(new_challenge(alice.identity_id, "solved"))
    .await
    .unwrap();
  let open = s
    .create_challenge(new_challenge(alice.identity_id, "open"))
    .await
    .unwrap();
  s.upsert_solution(new_solution(
    alice.identity_id,
    solved.challenge_id,
    "python",
  ))
  .await
  .unwrap();

  // The selection is random; any draw must land on the one open challenge.
  for _ in 0..10 {
    let pick = pick_unsolved(&s, alice.identity_id).await.unwrap();
    assert_eq!(pick, Some(open.challenge_id));
  }
}

#[tokio::test]
async fn pick_unsolved_is_none_when_everything_is_solved() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let only = s
    .create_challenge(new_challenge(alice.identity_id, "only"))
    .await
    .unwrap();
  s.upsert_solution(new_solution(
    alice.identity_id,
    only.challenge_id,
    "python",
  ))
  .await
  .unwrap();

  assert_eq!(pick_unsolved(&s, alice.identity_id).await.unwrap(), None);
}

#[tokio::test]
async fn pick_unsolved_is_none_with_no_challenges_at_all() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  assert_eq!(pick_unsolved(&s, alice.identity_id).await.unwrap(), None);
}
