//! Configuration
//!
//! Environment-backed settings for the assistant. Every credential is
//! optional at this layer: a missing key degrades the owning client to its
//! error envelope instead of failing the process.

use std::env;

pub const DEFAULT_APP_NAME: &str = "farmer_assistant_app";
pub const DEFAULT_CHAT_MODEL: &str = "sarvam-m";

const DEFAULT_SARVAM_TRANSLATE_URL: &str = "https://api.sarvam.ai";
const DEFAULT_SARVAM_CHAT_URL: &str = "https://api.sarvam.ai/v1";
const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org";
const DEFAULT_MANDI_URL: &str = "https://api.data.gov.in";

/// Runtime configuration, sourced from the process environment and `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    /// Subscription key for the translation and chat provider.
    pub sarvam_api_key: Option<String>,
    /// Key for the geocoding + forecast provider.
    pub openweather_api_key: Option<String>,
    /// Key for the commodity-price open-data provider.
    pub mandi_api_key: Option<String>,
    pub chat_model: String,
    pub sarvam_translate_url: String,
    pub sarvam_chat_url: String,
    pub openweather_url: String,
    pub mandi_url: String,
    /// Government-statistics endpoint; the government specialist is only
    /// registered when this is set.
    pub stats_url: Option<String>,
    pub stats_token: Option<String>,
}

impl Config {
    /// Load configuration, reading `.env` first so the process environment
    /// can still override it.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            app_name: env_or("APP_NAME", DEFAULT_APP_NAME),
            sarvam_api_key: env_opt("SARVAM_API_KEY"),
            openweather_api_key: env_opt("OPENWEATHER_API_KEY"),
            mandi_api_key: env_opt("MANDI_API_KEY"),
            chat_model: env_or("SARVAM_CHAT_MODEL", DEFAULT_CHAT_MODEL),
            sarvam_translate_url: env_or("SARVAM_TRANSLATE_URL", DEFAULT_SARVAM_TRANSLATE_URL),
            sarvam_chat_url: env_or("SARVAM_CHAT_URL", DEFAULT_SARVAM_CHAT_URL),
            openweather_url: env_or("OPENWEATHER_URL", DEFAULT_OPENWEATHER_URL),
            mandi_url: env_or("MANDI_URL", DEFAULT_MANDI_URL),
            stats_url: env_opt("MOSPI_STATS_URL"),
            stats_token: env_opt("MOSPI_AUTH_TOKEN"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            sarvam_api_key: None,
            openweather_api_key: None,
            mandi_api_key: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            sarvam_translate_url: DEFAULT_SARVAM_TRANSLATE_URL.to_string(),
            sarvam_chat_url: DEFAULT_SARVAM_CHAT_URL.to_string(),
            openweather_url: DEFAULT_OPENWEATHER_URL.to_string(),
            mandi_url: DEFAULT_MANDI_URL.to_string(),
            stats_url: None,
            stats_token: None,
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}
