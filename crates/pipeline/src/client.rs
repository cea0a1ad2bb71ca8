//! HTTP client for the remote command-execution server.

use serde::{Deserialize, Serialize};

/// HTTP client for one remote pipeline server.
pub struct PipelineClient {
    client: reqwest::Client,
    base_url: String,
}

/// Response returned by the `/run-command` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Captured stdout.
    pub output: String,
    /// Captured stderr.
    pub error: String,
    /// Process exit code.
    pub returncode: i32,
}

/// Errors from the pipeline HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Pipeline server error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl PipelineClient {
    /// Create a new client for a pipeline server.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://pipeline-host:8000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Base URL of the pipeline server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a shell command for execution.
    ///
    /// Sends `POST /run-command` with `{"command": ...}` and returns the
    /// captured stdout, stderr, and exit code. No retry is attempted; the
    /// caller decides how to surface a failure.
    pub async fn run_command(&self, command: &str) -> Result<CommandOutput, PipelineError> {
        let body = serde_json::json!({ "command": command });

        let response = self
            .client
            .post(format!("{}/run-command", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Check whether the pipeline server is reachable and healthy.
    pub async fn health(&self) -> Result<(), PipelineError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PipelineError::ApiError {
                status: status.as_u16(),
                body,
            })
        }
    }
}
