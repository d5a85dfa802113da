//! Chat Completion Client
//!
//! OpenAI-compatible chat endpoint used for farming advice, the LLM-backed
//! router, and language detection. An error envelope always carries a
//! canned user-facing apology in `response` so downstream formatting never
//! sees an empty result.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{http_client, CallStatus, ClientFault};

const DEFAULT_BASE_URL: &str = "https://api.sarvam.ai/v1";
const DEFAULT_MODEL: &str = "sarvam-m";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.7;

/// Shown to the user whenever the chat provider cannot answer.
pub(crate) const FALLBACK_APOLOGY: &str = "I'm sorry, I couldn't process your farming query \
    at the moment. Please try again later or ask a different question about farming.";

/// System prompt applied by `farming_advice`.
pub const FARMING_SYSTEM_PROMPT: &str = "\
You are a knowledgeable farming assistant that helps farmers with their questions.
Provide accurate, practical, and helpful information about:
- Crop cultivation techniques and best practices
- Pest and disease management
- Soil health and fertilization
- Water management and irrigation
- Sustainable farming practices
- Agricultural tools and equipment
- Seasonal farming advice
- Market trends and crop selection

Keep your responses concise, practical, and tailored to the farmer's specific question.";

/// Envelope for a chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub status: CallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The model's reply on success, a canned apology on error.
    pub response: String,
}

impl ChatOutcome {
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Success,
            message: None,
            response: response.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Error,
            message: Some(message.into()),
            response: FALLBACK_APOLOGY.to_string(),
        }
    }
}

/// Client for the chat-completion provider.
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ChatClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Answer a farming question with the fixed advisory system prompt.
    pub async fn farming_advice(&self, query: &str) -> ChatOutcome {
        self.complete(query, FARMING_SYSTEM_PROMPT).await
    }

    /// Free-form completion with a caller-supplied system prompt.
    pub async fn complete(&self, query: &str, system: &str) -> ChatOutcome {
        match self.request(query, system).await {
            Ok(content) => {
                debug!(preview = %content.chars().take(80).collect::<String>(), "chat reply");
                ChatOutcome::success(content)
            }
            Err(fault) => {
                warn!("chat completion failed: {fault}");
                ChatOutcome::error(fault.to_string())
            }
        }
    }

    async fn request(&self, query: &str, system: &str) -> Result<String, ClientFault> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClientFault::MissingCredential("SARVAM_API_KEY"))?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": query },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientFault::Shape(e.to_string()))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ClientFault::Shape("missing choices[0].message.content".to_string())
            })
    }
}
