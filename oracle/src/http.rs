//! HTTP client for the match oracle.

use crate::wire::{MatchOutcome, MatchRequest, MatchResponse};
use crate::{MatchOracle, OracleError};
use std::time::Duration;

/// Default bound on a single face-match round trip. The oracle does model
/// inference server-side, so this is generous compared to a plain API call.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for a face-match oracle endpoint.
pub struct HttpMatchOracle {
    /// Base URL of the oracle service.
    base_url: String,
    /// Reusable HTTP client.
    client: reqwest::Client,
    /// Per-request timeout.
    timeout: Duration,
}

impl HttpMatchOracle {
    /// Create a client pointing at the given oracle base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/api/face-match", self.base_url)
    }

    async fn post_match(&self, request: &MatchRequest) -> Result<MatchResponse, OracleError> {
        let resp = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(OracleError::Transport(format!(
                "HTTP {} from {}",
                resp.status(),
                self.endpoint()
            )));
        }

        resp.json()
            .await
            .map_err(|e| OracleError::Decode(e.to_string()))
    }
}

impl MatchOracle for HttpMatchOracle {
    async fn face_match(&self, request: &MatchRequest) -> Result<MatchOutcome, OracleError> {
        self.post_match(request).await?.classify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let oracle = HttpMatchOracle::new("https://verify.example.org/");
        assert_eq!(oracle.base_url, "https://verify.example.org");
        assert_eq!(oracle.endpoint(), "https://verify.example.org/api/face-match");
    }

    #[test]
    fn timeout_is_overridable() {
        let oracle =
            HttpMatchOracle::new("https://verify.example.org").with_timeout(Duration::from_secs(5));
        assert_eq!(oracle.timeout, Duration::from_secs(5));
    }
}
