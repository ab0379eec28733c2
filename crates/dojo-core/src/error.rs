//! Error types for `dojo-core`.
//!
//! Absent entities are expressed as `Option` in the store API; this enum
//! covers boundary validation failures.

use thiserror::Error;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("a challenge needs at least one test case")]
  NoTestCases,

  #[error("test case {0} has an empty input or expected output")]
  BlankTestCase(usize),

  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),

  #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
  PasswordTooShort,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
