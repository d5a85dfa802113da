//! Weather Specialist
//!
//! Geocodes the routed location, fetches the single-day forecast summary,
//! and renders it as farmer-friendly English. Any client error turns into
//! a request for a clearer location instead of a broken summary.

use async_trait::async_trait;
use tracing::debug;

use super::Specialist;
use crate::orchestrator::RoutingDecision;
use crate::tools::{ForecastClient, GeocodeClient};

pub struct WeatherSpecialist {
    geocode: GeocodeClient,
    forecast: ForecastClient,
}

impl WeatherSpecialist {
    pub fn new(geocode: GeocodeClient, forecast: ForecastClient) -> Self {
        Self { geocode, forecast }
    }
}

#[async_trait]
impl Specialist for WeatherSpecialist {
    fn name(&self) -> &str {
        "weather"
    }

    async fn respond(&self, _query: &str, decision: &RoutingDecision) -> String {
        let location = decision.location.trim();
        if location.is_empty() {
            return "Which city or village should I check the weather for?".to_string();
        }

        let point = self.geocode.lookup(location).await;
        if !point.status.is_success() {
            debug!(location, "geocoding failed, asking for a clearer location");
            return format!(
                "I couldn't find \"{location}\" on the map. Could you share the \
                 nearest town or city, for example \"Nashik, MH\"?"
            );
        }

        let forecast = self.forecast.day_summary(&point).await;
        if !forecast.status.is_success() {
            debug!(location, "forecast failed, asking for a clearer location");
            return format!(
                "I couldn't fetch the forecast for {location} right now. \
                 Could you try again with a nearby larger town?"
            );
        }

        let mut reply = format!(
            "Weather forecast for {} on {}:",
            forecast.location, forecast.date
        );
        if let Some(t) = &forecast.temperature {
            reply.push_str(&format!(
                "\nTemperature: {}°C to {}°C (avg: {}°C)",
                t.min, t.max, t.average
            ));
        }
        if !forecast.conditions.is_empty() {
            reply.push_str(&format!("\nConditions: {}", forecast.conditions.join(", ")));
        }
        if let Some(humidity) = forecast.humidity {
            reply.push_str(&format!("\nHumidity: {humidity}%"));
        }
        if let Some(wind) = forecast.wind_speed {
            reply.push_str(&format!("\nWind Speed: {wind} m/s"));
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::Intent;

    fn decision_for(location: &str) -> RoutingDecision {
        RoutingDecision::dispatch(Intent::Weather).with_location(location)
    }

    #[tokio::test]
    async fn test_empty_location_asks_for_one() {
        let specialist = WeatherSpecialist::new(
            GeocodeClient::new(Some("key".to_string())).with_base_url("http://127.0.0.1:1"),
            ForecastClient::new(Some("key".to_string())).with_base_url("http://127.0.0.1:1"),
        );

        let reply = specialist
            .respond("weather please", &decision_for("  "))
            .await;
        assert!(reply.contains("Which city or village"));
    }

    #[tokio::test]
    async fn test_geocode_failure_asks_for_clearer_location() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/geo/1.0/direct")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let specialist = WeatherSpecialist::new(
            GeocodeClient::new(Some("key".to_string())).with_base_url(server.url()),
            ForecastClient::new(Some("key".to_string())).with_base_url(server.url()),
        );

        let reply = specialist
            .respond("weather in Xyzzyville", &decision_for("Xyzzyville"))
            .await;
        assert!(reply.contains("couldn't find"));
        assert!(reply.contains("Xyzzyville"));
    }

    #[tokio::test]
    async fn test_successful_forecast_renders_all_fields() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/geo/1.0/direct")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "Mumbai", "lat": 19.08, "lon": 72.88}]"#)
            .create_async()
            .await;
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
                         "main": {"temp": 300.15, "humidity": 80},
                         "weather": [{"main": "Rain"}],
                         "wind": {"speed": 5.0}}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let specialist = WeatherSpecialist::new(
            GeocodeClient::new(Some("key".to_string())).with_base_url(server.url()),
            ForecastClient::new(Some("key".to_string())).with_base_url(server.url()),
        );

        let reply = specialist
            .respond("What's the weather in Mumbai?", &decision_for("Mumbai"))
            .await;

        assert!(reply.contains("Mumbai"));
        assert!(reply.contains("17°C to 27°C"));
        assert!(reply.contains("Clouds, Rain"));
        assert!(reply.contains("Humidity: 70%"));
        assert!(reply.contains("Wind Speed: 4 m/s"));
    }
}
