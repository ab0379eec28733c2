//! HTTP client for a Piston-compatible execution service.
//!
//! Wire format: `POST {base_url}/api/v2/execute` with
//! `{"language", "version", "files": [{"content"}]}`; the response carries
//! the run's combined output and stderr under `run`.

use serde::{Deserialize, Serialize};

use crate::{Error, ExecutionService, Language, Result, RunOutput};

/// A remote execution backend speaking the Piston API.
#[derive(Clone)]
pub struct PistonClient {
  http:     reqwest::Client,
  base_url: String,
}

impl PistonClient {
  /// `base_url` without a trailing slash, e.g. `http://localhost:2000`.
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      http:     reqwest::Client::new(),
      base_url: base_url.into(),
    }
  }
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
  language: &'a str,
  version:  &'a str,
  files:    Vec<ExecuteFile<'a>>,
}

#[derive(Serialize)]
struct ExecuteFile<'a> {
  content: &'a str,
}

#[derive(Deserialize)]
struct ExecuteResponse {
  run: RunDetail,
}

#[derive(Deserialize)]
struct RunDetail {
  #[serde(default)]
  output: String,
  #[serde(default)]
  stderr: String,
}

impl ExecutionService for PistonClient {
  async fn run(&self, language: Language, source: &str) -> Result<RunOutput> {
    let request = ExecuteRequest {
      language: language.as_str(),
      version:  language.version(),
      files:    vec![ExecuteFile { content: source }],
    };

    let response = self
      .http
      .post(format!("{}/api/v2/execute", self.base_url))
      .json(&request)
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(Error::Upstream(format!(
        "execute returned {}",
        response.status()
      )));
    }

    let body: ExecuteResponse = response.json().await?;
    Ok(RunOutput {
      stdout: body.run.output,
      stderr: body.run.stderr,
    })
  }
}
