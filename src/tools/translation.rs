//! Translation Client
//!
//! Wraps the Sarvam text-translation endpoint. The `translate_if_needed`
//! entry point is what the boundary agents call: it short-circuits without
//! any network traffic when source and target languages match.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{http_client, CallStatus, ClientFault};
use crate::language::LanguageCode;

const DEFAULT_BASE_URL: &str = "https://api.sarvam.ai";
const DEFAULT_SPEAKER_GENDER: &str = "Male";
const DEFAULT_MODE: &str = "classic-colloquial";

/// Envelope for a translation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub status: CallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub translated_text: String,
    /// True when the call was answered locally because source == target.
    #[serde(default)]
    pub skipped: bool,
}

impl TranslationOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Success,
            error_message: None,
            translated_text: text.into(),
            skipped: false,
        }
    }

    pub fn skipped(text: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Success,
            error_message: None,
            translated_text: text.into(),
            skipped: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Error,
            error_message: Some(message.into()),
            translated_text: String::new(),
            skipped: false,
        }
    }
}

/// Client for the translation provider.
#[derive(Clone)]
pub struct TranslateClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    speaker_gender: String,
    mode: String,
}

impl TranslateClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            speaker_gender: DEFAULT_SPEAKER_GENDER.to_string(),
            mode: DEFAULT_MODE.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[allow(dead_code)]
    pub fn with_speaker_gender(mut self, gender: impl Into<String>) -> Self {
        self.speaker_gender = gender.into();
        self
    }

    #[allow(dead_code)]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Translate only when the languages differ; otherwise echo the text
    /// back as a skipped success with zero network calls.
    pub async fn translate_if_needed(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
    ) -> TranslationOutcome {
        if text.is_empty() {
            return TranslationOutcome::error("text is required");
        }
        if source == target {
            debug!(language = %source, "translation skipped, languages match");
            return TranslationOutcome::skipped(text);
        }
        self.translate(text, source, target).await
    }

    /// Unconditional translation call.
    pub async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
    ) -> TranslationOutcome {
        match self.request(text, source, target).await {
            Ok(translated) => TranslationOutcome::success(translated),
            Err(fault) => {
                warn!(%source, %target, "translation failed: {fault}");
                TranslationOutcome::error(fault.to_string())
            }
        }
    }

    async fn request(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
    ) -> Result<String, ClientFault> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClientFault::MissingCredential("SARVAM_API_KEY"))?;

        let body = json!({
            "input": text,
            "source_language_code": source.as_tag(),
            "target_language_code": target.as_tag(),
            "speaker_gender": self.speaker_gender,
            "mode": self.mode,
        });

        let response = self
            .client
            .post(format!("{}/translate", self.base_url.trim_end_matches('/')))
            .header("api-subscription-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        payload["translated_text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ClientFault::Shape("missing translated_text".to_string()))
    }
}
