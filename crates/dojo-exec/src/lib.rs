//! Remote code execution and solution grading.
//!
//! The execution service is an external collaborator reached over HTTP, one
//! call per test case. This crate owns the consumed interface
//! ([`ExecutionService`]), the Piston-compatible client, the snippet harness
//! that turns a challenge's opaque test input into a runnable program, and
//! the grading loop. Nothing here retries: an unreachable service surfaces
//! as [`Error::Upstream`] and retry policy belongs to the caller.

#![allow(async_fn_in_trait)]

pub mod error;
pub mod grade;
pub mod piston;
pub mod snippet;

pub use error::{Error, Result};
pub use grade::{CaseResult, GradeReport, grade};
pub use piston::PistonClient;

use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the snippet harness can build programs for. Solutions store
/// their language tag as a free string; parsing it into this enum is where
/// unsupported tags are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  Javascript,
  Python,
}

impl Language {
  pub fn as_str(self) -> &'static str {
    match self {
      Language::Javascript => "javascript",
      Language::Python => "python",
    }
  }

  /// Runtime version requested from the execution service.
  pub fn version(self) -> &'static str {
    match self {
      Language::Javascript => "18.15.0",
      Language::Python => "3.10.0",
    }
  }
}

impl FromStr for Language {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "javascript" => Ok(Language::Javascript),
      "python" => Ok(Language::Python),
      other => Err(Error::UnsupportedLanguage(other.to_owned())),
    }
  }
}

/// What one run of a program produced.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
  pub stdout: String,
  pub stderr: String,
}

/// A sandboxed remote execution backend. One call runs one program to
/// completion and returns its captured streams.
pub trait ExecutionService: Send + Sync {
  fn run<'a>(
    &'a self,
    language: Language,
    source: &'a str,
  ) -> impl Future<Output = Result<RunOutput>> + Send + 'a;
}
