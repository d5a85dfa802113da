//! Mandi Price Client
//!
//! Queries the data.gov.in commodity-price resource. State and commodity
//! are required filters, district narrows the result, and an empty record
//! set is reported as its own error distinct from transport failures.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{http_client, CallStatus, ClientFault};

const DEFAULT_BASE_URL: &str = "https://api.data.gov.in";
const RESOURCE_PATH: &str = "/resource/9ef84268-d588-465a-a308-a864a43d0070";

/// Default number of records a price lookup asks for.
pub const DEFAULT_MANDI_LIMIT: usize = 10;

/// One mandi price record as the open-data resource reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MandiRecord {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub commodity: String,
    #[serde(default)]
    pub variety: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub arrival_date: String,
    #[serde(default)]
    pub min_price: String,
    #[serde(default)]
    pub max_price: String,
    #[serde(default)]
    pub modal_price: String,
}

/// Envelope for a mandi price query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandiOutcome {
    pub status: CallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub count: u64,
    pub total: Option<u64>,
    pub records: Vec<MandiRecord>,
}

impl MandiOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Error,
            message: Some(message.into()),
            count: 0,
            total: None,
            records: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MandiApiResponse {
    #[serde(default)]
    records: Vec<MandiRecord>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
}

/// Client for the commodity-price open-data provider.
#[derive(Clone)]
pub struct MandiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl MandiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetch prices for a commodity in a state, optionally narrowed to a
    /// district. Missing required filters fail locally, before any call.
    pub async fn prices(
        &self,
        state: &str,
        district: Option<&str>,
        commodity: &str,
        limit: usize,
    ) -> MandiOutcome {
        let state = state.trim();
        let commodity = commodity.trim();
        let district = district.map(str::trim).filter(|d| !d.is_empty());

        if state.is_empty() || commodity.is_empty() {
            return MandiOutcome::error("state and commodity are required");
        }

        match self.fetch(state, district, commodity, limit).await {
            Ok(outcome) => {
                debug!(state, commodity, count = outcome.count, "mandi records fetched");
                outcome
            }
            Err(fault) => {
                warn!(state, commodity, "mandi lookup failed: {fault}");
                MandiOutcome::error(fault.to_string())
            }
        }
    }

    async fn fetch(
        &self,
        state: &str,
        district: Option<&str>,
        commodity: &str,
        limit: usize,
    ) -> Result<MandiOutcome, ClientFault> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClientFault::MissingCredential("MANDI_API_KEY"))?;

        let limit = limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("api-key", api_key),
            ("format", "json"),
            ("filters[state.keyword]", state),
            ("filters[commodity]", commodity),
            ("limit", &limit),
        ];
        if let Some(district) = district {
            query.push(("filters[district]", district));
        }

        let response = self
            .client
            .get(format!(
                "{}{}",
                self.base_url.trim_end_matches('/'),
                RESOURCE_PATH
            ))
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        let payload: MandiApiResponse = response
            .json()
            .await
            .map_err(|e| ClientFault::Shape(e.to_string()))?;

        if payload.records.is_empty() {
            return Err(ClientFault::NoData(
                "No mandi price records found for the given filters".to_string(),
            ));
        }

        let count = payload.count.unwrap_or(payload.records.len() as u64);
        Ok(MandiOutcome {
            status: CallStatus::Success,
            message: None,
            count,
            total: payload.total,
            records: payload.records,
        })
    }
}
