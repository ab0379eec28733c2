//! Challenge — an authored programming problem with test cases.
//!
//! Challenges are immutable after creation: there is no update or delete
//! operation anywhere in the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// One test case. Input and expected output are opaque strings interpreted
/// by the execution layer, not validated here beyond non-emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
  pub input:           String,
  pub expected_output: String,
}

/// A stored challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
  pub challenge_id:  Uuid,
  pub author_id:     Uuid,
  pub title:         String,
  pub description:   String,
  pub function_name: String,
  /// Comma-separated parameter list, verbatim as authored
  /// (e.g. `"a, b"` for a two-argument function).
  pub parameters:    String,
  pub test_cases:    Vec<TestCase>,
  pub created_at:    DateTime<Utc>,
}

/// A challenge joined with its author's display fields. Listing queries
/// resolve the author in the same round trip; a missing author row (ids are
/// not referentially enforced) shows up as `"Unknown"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthoredChallenge {
  #[serde(flatten)]
  pub challenge:       Challenge,
  pub author_name:     String,
  pub author_username: String,
}

/// Input for [`crate::store::PlatformStore::create_challenge`].
#[derive(Debug, Clone)]
pub struct NewChallenge {
  pub author_id:     Uuid,
  pub title:         String,
  pub description:   String,
  pub function_name: String,
  pub parameters:    String,
  pub test_cases:    Vec<TestCase>,
}

impl NewChallenge {
  /// Boundary validation (the store itself assumes validated input):
  /// every text field non-empty, at least one test case, and no test case
  /// with a blank input or expected output.
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("title", &self.title),
      ("description", &self.description),
      ("function_name", &self.function_name),
      ("parameters", &self.parameters),
    ] {
      if value.trim().is_empty() {
        return Err(Error::EmptyField(field));
      }
    }

    if self.test_cases.is_empty() {
      return Err(Error::NoTestCases);
    }
    for (i, case) in self.test_cases.iter().enumerate() {
      if case.input.trim().is_empty() || case.expected_output.trim().is_empty()
      {
        return Err(Error::BlankTestCase(i));
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_challenge() -> NewChallenge {
    NewChallenge {
      author_id:     Uuid::new_v4(),
      title:         "Sum of two".into(),
      description:   "Add two numbers.".into(),
      function_name: "sum".into(),
      parameters:    "a, b".into(),
      test_cases:    vec![TestCase {
        input:           "1, 2".into(),
        expected_output: "3".into(),
      }],
    }
  }

  #[test]
  fn valid_challenge_passes() {
    assert!(new_challenge().validate().is_ok());
  }

  #[test]
  fn empty_title_rejected() {
    let mut c = new_challenge();
    c.title = String::new();
    assert_eq!(c.validate(), Err(Error::EmptyField("title")));
  }

  #[test]
  fn no_test_cases_rejected() {
    let mut c = new_challenge();
    c.test_cases.clear();
    assert_eq!(c.validate(), Err(Error::NoTestCases));
  }

  #[test]
  fn blank_expected_output_rejected() {
    let mut c = new_challenge();
    c.test_cases.push(TestCase {
      input:           "4, 5".into(),
      expected_output: "   ".into(),
    });
    assert_eq!(c.validate(), Err(Error::BlankTestCase(1)));
  }
}
