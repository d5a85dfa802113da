//! Remote Service Clients
//!
//! Typed wrappers around the external providers the assistant depends on:
//! translation, geocoding, weather forecasts, mandi prices, chat completion,
//! and the optional government-statistics endpoint.
//!
//! Every client call returns a flat envelope struct carrying a
//! [`CallStatus`] discriminant. Faults never escape as `Err`: transport
//! failures, malformed responses, missing credentials, and empty result
//! sets are all mapped into `status: error` with a human-readable message,
//! and callers branch on the status before touching payload fields.

mod chat;
mod geocode;
mod market;
mod stats;
mod translation;
mod weather;

pub use chat::{ChatClient, ChatOutcome, FARMING_SYSTEM_PROMPT};
pub use geocode::{GeoOutcome, GeocodeClient};
pub use market::{MandiClient, MandiOutcome, MandiRecord, DEFAULT_MANDI_LIMIT};
pub use stats::{StatsClient, StatsOutcome};
pub use translation::{TranslateClient, TranslationOutcome};
pub use weather::{ForecastClient, ForecastOutcome, TemperatureSummary};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Fixed per-request timeout; a timeout becomes an error envelope, never a
/// retry.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Envelope discriminant shared by every client response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Success,
    Error,
}

impl CallStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, CallStatus::Success)
    }
}

/// Internal fault taxonomy. Clients classify failures with this enum and
/// render it into the envelope message at the boundary.
#[derive(Debug, Error)]
pub enum ClientFault {
    /// Required credential absent at construction or first use.
    #[error("{0} is not set")]
    MissingCredential(&'static str),
    /// Network or HTTP-status failure talking to the provider.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with JSON we cannot make sense of.
    #[error("unexpected response shape: {0}")]
    Shape(String),
    /// Well-formed response with zero usable records.
    #[error("{0}")]
    NoData(String),
}

/// Shared `reqwest` client with the fixed timeout applied.
pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}
