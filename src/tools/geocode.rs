//! Geocoding Client
//!
//! Resolves a free-text place name to coordinates via the OpenWeather
//! direct-geocoding endpoint, first match only.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{http_client, CallStatus, ClientFault};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Envelope for a geocoding lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoOutcome {
    pub status: CallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoOutcome {
    pub fn success(location: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            status: CallStatus::Success,
            message: None,
            location: location.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Error,
            message: Some(message.into()),
            location: location.into(),
            latitude: None,
            longitude: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    lat: f64,
    lon: f64,
}

/// Client for the geocoding provider.
#[derive(Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeocodeClient {
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

    /// Look up coordinates for a place name. All failure modes, including
    /// "no match", come back as an error envelope.
    pub async fn lookup(&self, location: &str) -> GeoOutcome {
        if location.trim().is_empty() {
            return GeoOutcome::error(location, "Location is required");
        }

        match self.fetch(location).await {
            Ok(hit) => {
                debug!(location, lat = hit.lat, lon = hit.lon, "geocoded");
                GeoOutcome::success(location, hit.lat, hit.lon)
            }
            Err(fault) => {
                warn!(location, "geocoding failed: {fault}");
                GeoOutcome::error(location, fault.to_string())
            }
        }
    }

    async fn fetch(&self, location: &str) -> Result<GeoMatch, ClientFault> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClientFault::MissingCredential("OPENWEATHER_API_KEY"))?;

        let response = self
            .client
            .get(format!(
                "{}/geo/1.0/direct",
                self.base_url.trim_end_matches('/')
            ))
            .query(&[("q", location), ("limit", "1"), ("appid", api_key)])
            .send()
            .await?
            .error_for_status()?;

        let matches: Vec<GeoMatch> = response
            .json()
            .await
            .map_err(|e| ClientFault::Shape(e.to_string()))?;

        matches.into_iter().next().ok_or_else(|| {
            ClientFault::NoData(format!(
                "Could not find coordinates for location: {location}"
            ))
        })
    }
}
