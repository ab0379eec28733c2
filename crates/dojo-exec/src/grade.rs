//! Grading: run a submitted solution against every test case of a challenge.
//!
//! Sequential, single-request orchestration: one execution-service call per
//! test case, trimmed-stdout comparison against the expected output. The
//! caller persists the solution only when [`GradeReport::passed`] is set.

use dojo_core::challenge::Challenge;
use serde::Serialize;

use crate::{ExecutionService, Language, Result, snippet::build_snippet};

/// Outcome of one test case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
  /// Zero-based test-case index.
  pub index:    usize,
  pub passed:   bool,
  /// Trimmed stdout the run produced.
  pub got:      String,
  pub expected: String,
}

/// Outcome of a full grading run.
#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
  pub cases:  Vec<CaseResult>,
  /// `true` only when every test case passed.
  pub passed: bool,
}

/// Run `source` against every test case of `challenge`.
///
/// Fails fast on an execution-service error; a wrong answer is a result,
/// not an error.
pub async fn grade<E>(
  exec: &E,
  language: Language,
  challenge: &Challenge,
  source: &str,
) -> Result<GradeReport>
where
  E: ExecutionService,
{
  let mut cases = Vec::with_capacity(challenge.test_cases.len());

  for (index, case) in challenge.test_cases.iter().enumerate() {
    let program =
      build_snippet(language, &challenge.function_name, source, &case.input);
    let output = exec.run(language, &program).await?;

    let got = output.stdout.trim().to_owned();
    let passed = got == case.expected_output;
    cases.push(CaseResult {
      index,
      passed,
      got,
      expected: case.expected_output.clone(),
    });
  }

  let passed = cases.iter().all(|c| c.passed);
  Ok(GradeReport { cases, passed })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Error, RunOutput};
  use chrono::Utc;
  use dojo_core::challenge::TestCase;
  use std::collections::HashMap;
  use uuid::Uuid;

  /// Scripted fake: maps expected program text fragments to outputs.
  struct ScriptedExec {
    by_fragment: HashMap<&'static str, &'static str>,
    fail:        bool,
  }

  impl ExecutionService for ScriptedExec {
    async fn run(&self, _: Language, source: &str) -> Result<RunOutput> {
      if self.fail {
        return Err(Error::Upstream("connection refused".into()));
      }
      let stdout = self
        .by_fragment
        .iter()
        .find(|(fragment, _)| source.contains(**fragment))
        .map(|(_, out)| (*out).to_owned())
        .unwrap_or_default();
      Ok(RunOutput { stdout, stderr: String::new() })
    }
  }

  fn challenge(cases: Vec<TestCase>) -> Challenge {
    Challenge {
      challenge_id:  Uuid::new_v4(),
      author_id:     Uuid::new_v4(),
      title:         "Sum".into(),
      description:   "Add.".into(),
      function_name: "sum".into(),
      parameters:    "a, b".into(),
      test_cases:    cases,
      created_at:    Utc::now(),
    }
  }

  fn case(input: &str, expected: &str) -> TestCase {
    TestCase {
      input:           input.into(),
      expected_output: expected.into(),
    }
  }

  #[tokio::test]
  async fn all_cases_passing_sets_the_flag() {
    let exec = ScriptedExec {
      by_fragment: HashMap::from([("sum(1, 2)", "3\n"), ("sum(2, 3)", "5\n")]),
      fail:        false,
    };
    let challenge = challenge(vec![case("1, 2", "3"), case("2, 3", "5")]);

    let report = grade(&exec, Language::Javascript, &challenge, "src")
      .await
      .unwrap();
    assert!(report.passed);
    assert_eq!(report.cases.len(), 2);
    assert!(report.cases.iter().all(|c| c.passed));
  }

  #[tokio::test]
  async fn one_wrong_answer_fails_the_report_but_keeps_all_results() {
    let exec = ScriptedExec {
      by_fragment: HashMap::from([("sum(1, 2)", "3\n"), ("sum(2, 3)", "6\n")]),
      fail:        false,
    };
    let challenge = challenge(vec![case("1, 2", "3"), case("2, 3", "5")]);

    let report = grade(&exec, Language::Javascript, &challenge, "src")
      .await
      .unwrap();
    assert!(!report.passed);
    assert!(report.cases[0].passed);
    assert!(!report.cases[1].passed);
    assert_eq!(report.cases[1].got, "6");
    assert_eq!(report.cases[1].expected, "5");
  }

  #[tokio::test]
  async fn upstream_failure_is_an_error_not_a_fail() {
    let exec = ScriptedExec { by_fragment: HashMap::new(), fail: true };
    let challenge = challenge(vec![case("1, 2", "3")]);

    let err = grade(&exec, Language::Python, &challenge, "src")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Upstream(_)));
  }
}
