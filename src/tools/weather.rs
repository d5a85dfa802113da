//! Forecast Client
//!
//! Fetches the 3-hourly forecast series for a geocoded point and folds it
//! into a single-day summary: temperature min/max/avg in Celsius, condition
//! categories in first-seen order, and mean humidity and wind speed.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{http_client, CallStatus, ClientFault, GeoOutcome};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const KELVIN_OFFSET: f64 = 273.15;

/// Aggregated temperatures for the summarized day, in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub unit: String,
}

/// Envelope for a single-day forecast summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub status: CallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub location: String,
    pub date: String,
    pub temperature: Option<TemperatureSummary>,
    pub conditions: Vec<String>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub text_summary: String,
}

impl ForecastOutcome {
    pub fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Error,
            message: Some(message.into()),
            location: location.into(),
            date: String::new(),
            temperature: None,
            conditions: Vec::new(),
            humidity: None,
            wind_speed: None,
            text_summary: String::new(),
        }
    }
}

/// One 3-hourly entry of the provider's forecast series.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastEntry {
    pub dt_txt: String,
    pub main: EntryMain,
    #[serde(default)]
    pub weather: Vec<EntryCondition>,
    #[serde(default)]
    pub wind: Option<EntryWind>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntryMain {
    /// Kelvin, as the provider reports it.
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntryCondition {
    pub main: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntryWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    #[serde(default)]
    list: Vec<ForecastEntry>,
    #[serde(default)]
    city: Option<CityInfo>,
}

#[derive(Debug, Deserialize)]
struct CityInfo {
    #[serde(default)]
    name: String,
}

/// Client for the forecast provider.
#[derive(Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl ForecastClient {
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

    /// Summarize the first forecast day for a geocoded point.
    ///
    /// Consumes the geocoding envelope directly so a failed lookup or
    /// missing coordinates become a forecast error instead of a panic.
    pub async fn day_summary(&self, point: &GeoOutcome) -> ForecastOutcome {
        let label = if point.location.is_empty() {
            "Unknown location".to_string()
        } else {
            point.location.clone()
        };

        let (lat, lon) = match (point.latitude, point.longitude) {
            (Some(lat), Some(lon)) if point.status.is_success() => (lat, lon),
            _ => {
                return ForecastOutcome::error(
                    &label,
                    format!("Missing coordinates for location: {label}"),
                )
            }
        };

        match self.fetch(lat, lon).await {
            Ok((entries, city)) => {
                let label = city.filter(|c| !c.is_empty()).unwrap_or(label);
                match summarize(&entries, &label) {
                    Ok(outcome) => outcome,
                    Err(fault) => {
                        warn!(location = %label, "forecast aggregation failed: {fault}");
                        ForecastOutcome::error(&label, fault.to_string())
                    }
                }
            }
            Err(fault) => {
                warn!(location = %label, "forecast fetch failed: {fault}");
                ForecastOutcome::error(&label, fault.to_string())
            }
        }
    }

    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<(Vec<ForecastEntry>, Option<String>), ClientFault> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClientFault::MissingCredential("OPENWEATHER_API_KEY"))?;

        let response = self
            .client
            .get(format!(
                "{}/data/2.5/forecast",
                self.base_url.trim_end_matches('/')
            ))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: ForecastPayload = response
            .json()
            .await
            .map_err(|e| ClientFault::Shape(e.to_string()))?;

        Ok((payload.list, payload.city.map(|c| c.name)))
    }
}

/// Fold a forecast series into a summary of its first calendar date.
pub(crate) fn summarize(
    entries: &[ForecastEntry],
    location: &str,
) -> Result<ForecastOutcome, ClientFault> {
    let first_date = entries
        .first()
        .and_then(|e| e.dt_txt.split(' ').next())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ClientFault::NoData("No weather data found".to_string()))?
        .to_string();

    let day: Vec<&ForecastEntry> = entries
        .iter()
        .filter(|e| e.dt_txt.starts_with(&first_date))
        .collect();

    let temps: Vec<f64> = day.iter().map(|e| e.main.temp - KELVIN_OFFSET).collect();
    let min = round1(temps.iter().cloned().fold(f64::INFINITY, f64::min));
    let max = round1(temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
    let average = round1(temps.iter().sum::<f64>() / temps.len() as f64);

    // Condition categories, deduplicated in first-seen order.
    let mut conditions: Vec<String> = Vec::new();
    for entry in &day {
        for condition in &entry.weather {
            if !conditions.contains(&condition.main) {
                conditions.push(condition.main.clone());
            }
        }
    }

    let humidity = round1(day.iter().map(|e| e.main.humidity).sum::<f64>() / day.len() as f64);
    let wind_speed = round1(
        day.iter()
            .map(|e| e.wind.as_ref().map(|w| w.speed).unwrap_or(0.0))
            .sum::<f64>()
            / day.len() as f64,
    );

    let text_summary = format!(
        "Weather forecast for {location} on {first_date}:\n\
         Temperature: {min}°C to {max}°C (avg: {average}°C)\n\
         Conditions: {}\n\
         Humidity: {humidity}%\n\
         Wind Speed: {wind_speed} m/s\n",
        conditions.join(", "),
    );

    Ok(ForecastOutcome {
        status: CallStatus::Success,
        message: None,
        location: location.to_string(),
        date: first_date,
        temperature: Some(TemperatureSummary {
            min,
            max,
            average,
            unit: "°C".to_string(),
        }),
        conditions,
        humidity: Some(humidity),
        wind_speed: Some(wind_speed),
        text_summary,
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dt_txt: &str, temp_k: f64, humidity: f64, wind: Option<f64>) -> ForecastEntry {
        ForecastEntry {
            dt_txt: dt_txt.to_string(),
            main: EntryMain {
                temp: temp_k,
                humidity,
            },
            weather: vec![EntryCondition {
                main: "Clouds".to_string(),
            }],
            wind: wind.map(|speed| EntryWind { speed }),
        }
    }

    #[test]
    fn test_kelvin_series_aggregates_to_celsius() {
        let series = vec![
            entry("2026-08-07 06:00:00", 290.15, 60.0, Some(3.0)),
            entry("2026-08-07 09:00:00", 300.15, 70.0, Some(4.0)),
            entry("2026-08-07 12:00:00", 295.15, 80.0, Some(5.0)),
        ];

        let outcome = summarize(&series, "Mumbai").unwrap();
        let temperature = outcome.temperature.unwrap();
        assert_eq!(temperature.min, 17.0);
        assert_eq!(temperature.max, 27.0);
        assert_eq!(temperature.average, 22.0);
        assert_eq!(temperature.unit, "°C");
        assert_eq!(outcome.humidity, Some(70.0));
        assert_eq!(outcome.wind_speed, Some(4.0));
        assert_eq!(outcome.date, "2026-08-07");
    }

    #[test]
    fn test_only_first_date_is_aggregated() {
        let series = vec![
            entry("2026-08-07 18:00:00", 290.15, 50.0, Some(2.0)),
            entry("2026-08-07 21:00:00", 292.15, 60.0, Some(2.0)),
            entry("2026-08-08 00:00:00", 310.15, 90.0, Some(9.0)),
        ];

        let outcome = summarize(&series, "Pune").unwrap();
        let temperature = outcome.temperature.unwrap();
        assert_eq!(temperature.min, 17.0);
        assert_eq!(temperature.max, 19.0);
        assert_eq!(outcome.humidity, Some(55.0));
    }

    #[test]
    fn test_missing_wind_defaults_to_zero() {
        let series = vec![
            entry("2026-08-07 06:00:00", 290.15, 60.0, Some(4.0)),
            entry("2026-08-07 09:00:00", 290.15, 60.0, None),
        ];

        let outcome = summarize(&series, "Nashik").unwrap();
        assert_eq!(outcome.wind_speed, Some(2.0));
    }

    #[test]
    fn test_conditions_deduplicate_in_first_seen_order() {
        let mut series = vec![
            entry("2026-08-07 06:00:00", 290.15, 60.0, Some(1.0)),
            entry("2026-08-07 09:00:00", 290.15, 60.0, Some(1.0)),
        ];
        series[0].weather = vec![
            EntryCondition {
                main: "Rain".to_string(),
            },
            EntryCondition {
                main: "Clouds".to_string(),
            },
        ];
        series[1].weather = vec![
            EntryCondition {
                main: "Clouds".to_string(),
            },
            EntryCondition {
                main: "Clear".to_string(),
            },
        ];

        let outcome = summarize(&series, "Indore").unwrap();
        assert_eq!(outcome.conditions, vec!["Rain", "Clouds", "Clear"]);
        assert!(outcome.text_summary.contains("Rain, Clouds, Clear"));
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let fault = summarize(&[], "Mumbai").unwrap_err();
        assert_eq!(fault.to_string(), "No weather data found");
    }

    #[tokio::test]
    async fn test_failed_geocode_becomes_missing_coordinates_error() {
        let client =
            ForecastClient::new(Some("key".to_string())).with_base_url("http://127.0.0.1:1");
        let point = GeoOutcome::error("Mumbai", "Could not find coordinates");
        let outcome = client.day_summary(&point).await;

        assert_eq!(outcome.status, CallStatus::Error);
        assert_eq!(
            outcome.message.as_deref(),
            Some("Missing coordinates for location: Mumbai")
        );
    }

    #[tokio::test]
    async fn test_full_fetch_and_summary() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data/2.5/forecast")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "city": {"name": "Mumbai"},
                    "list": [
                        {"dt_txt": "2026-08-07 06:00:00",
                         "main": {"temp": 290.15, "humidity": 60},
                         "weather": [{"main": "Clouds"}],
                         "wind": {"speed": 3.0}},
                        {"dt_txt": "2026-08-07 09:00:00",
                         "main": {"temp": 300.15, "humidity": 70},
                         "weather": [{"main": "Rain"}],
                         "wind": {"speed": 5.0}}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = ForecastClient::new(Some("key".to_string())).with_base_url(server.url());
        let point = GeoOutcome::success("Bombay", 19.08, 72.88);
        let outcome = client.day_summary(&point).await;

        assert_eq!(outcome.status, CallStatus::Success);
        // The provider's city name wins over the caller's label.
        assert_eq!(outcome.location, "Mumbai");
        assert_eq!(outcome.temperature.unwrap().max, 27.0);
        assert!(outcome.text_summary.contains("Weather forecast for Mumbai"));
    }

    #[tokio::test]
    async fn test_empty_list_from_provider_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data/2.5/forecast")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"city": {"name": "Mumbai"}, "list": []}"#)
            .create_async()
            .await;

        let client = ForecastClient::new(Some("key".to_string())).with_base_url(server.url());
        let point = GeoOutcome::success("Mumbai", 19.08, 72.88);
        let outcome = client.day_summary(&point).await;

        assert_eq!(outcome.status, CallStatus::Error);
        assert_eq!(outcome.message.as_deref(), Some("No weather data found"));
    }
}
