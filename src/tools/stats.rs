//! Government Statistics Client
//!
//! Thin wrapper over a configured structured-data endpoint for official
//! statistics. The exchange is treated as opaque JSON: a question goes in,
//! an answer string comes out. With no endpoint configured every call
//! degrades to an error envelope, which makes the government specialist
//! fall back to farming advice.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{http_client, CallStatus, ClientFault};

/// Envelope for a statistics query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsOutcome {
    pub status: CallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub answer: String,
}

impl StatsOutcome {
    pub fn success(answer: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Success,
            message: None,
            answer: answer.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Error,
            message: Some(message.into()),
            answer: String::new(),
        }
    }
}

/// Client for the statistics endpoint.
#[derive(Clone)]
pub struct StatsClient {
    client: reqwest::Client,
    base_url: Option<String>,
    token: Option<String>,
}

impl StatsClient {
    pub fn new(base_url: Option<String>, token: Option<String>) -> Self {
        Self {
            client: http_client(),
            base_url,
            token,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Ask the statistics service a question in English.
    pub async fn ask(&self, question: &str) -> StatsOutcome {
        match self.request(question).await {
            Ok(answer) => StatsOutcome::success(answer),
            Err(fault) => {
                warn!("statistics query failed: {fault}");
                StatsOutcome::error(fault.to_string())
            }
        }
    }

    async fn request(&self, question: &str) -> Result<String, ClientFault> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(ClientFault::MissingCredential("MOSPI_STATS_URL"))?;

        let mut request = self
            .client
            .post(format!("{}/query", base_url.trim_end_matches('/')))
            .json(&serde_json::json!({ "query": question }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientFault::Shape(e.to_string()))?;

        let answer = payload["answer"]
            .as_str()
            .map(str::trim)
            .unwrap_or_default();
        if answer.is_empty() {
            return Err(ClientFault::NoData(
                "No statistics found for the query".to_string(),
            ));
        }
        Ok(answer.to_string())
    }
}
