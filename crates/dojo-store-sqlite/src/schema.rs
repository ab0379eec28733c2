//! SQL schema for the Dojo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Author and follower ids reference `identities` by convention only: the
/// platform never deletes identities or challenges, and callers are trusted
/// to supply valid ids. The natural-key UNIQUE constraints are load-bearing:
/// `follows(follower_id, following_id)` and
/// `solutions(author_id, challenge_id)` are what make the toggle and the
/// upsert safe under concurrent identical calls.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS identities (
    identity_id     TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    username        TEXT NOT NULL UNIQUE,
    email           TEXT NOT NULL UNIQUE,
    credential_hash TEXT NOT NULL,
    created_at      TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS follows (
    edge_id      TEXT PRIMARY KEY,
    follower_id  TEXT NOT NULL,
    following_id TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    UNIQUE (follower_id, following_id)
);

CREATE TABLE IF NOT EXISTS challenges (
    challenge_id  TEXT PRIMARY KEY,
    author_id     TEXT NOT NULL,
    title         TEXT NOT NULL,
    description   TEXT NOT NULL,
    function_name TEXT NOT NULL,
    parameters    TEXT NOT NULL,
    test_cases    TEXT NOT NULL,   -- JSON array of {input, expected_output}
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS solutions (
    solution_id  TEXT PRIMARY KEY,
    author_id    TEXT NOT NULL,
    challenge_id TEXT NOT NULL,
    body         TEXT NOT NULL,
    language     TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    UNIQUE (author_id, challenge_id)
);

CREATE INDEX IF NOT EXISTS follows_following_idx  ON follows(following_id);
CREATE INDEX IF NOT EXISTS challenges_author_idx  ON challenges(author_id);
CREATE INDEX IF NOT EXISTS challenges_created_idx ON challenges(created_at);
CREATE INDEX IF NOT EXISTS solutions_author_idx   ON solutions(author_id);

PRAGMA user_version = 1;
";
