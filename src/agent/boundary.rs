//! Translation Boundary Agents
//!
//! The input boundary detects the query language and translates it to
//! English; the output boundary translates the English response back.
//! English queries pass through both sides untouched, with zero translation
//! calls, and every translation failure falls back to the untranslated
//! text rather than failing the turn.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::language::{detect_script, LanguageCode};
use crate::tools::{ChatClient, TranslateClient};

/// Pluggable language detection over the fixed 11-code set.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> LanguageCode;
}

/// Deterministic detector keyed on the dominant Unicode script. The
/// default: no credentials, no latency, and good enough for every
/// supported language except the Hindi/Marathi split.
pub struct ScriptLanguageDetector;

#[async_trait]
impl LanguageDetector for ScriptLanguageDetector {
    async fn detect(&self, text: &str) -> LanguageCode {
        detect_script(text)
    }
}

const DETECT_SYSTEM_PROMPT: &str = "\
You are a language detection agent. Identify which language the user's text
is written in. Only consider these options:
en-IN (English), hi-IN (Hindi), bn-IN (Bengali), gu-IN (Gujarati),
kn-IN (Kannada), ml-IN (Malayalam), mr-IN (Marathi), od-IN (Odia),
pa-IN (Punjabi), ta-IN (Tamil), te-IN (Telugu).
Return ONLY the language code, nothing else. If unsure, return en-IN.";

/// LLM-backed detector. Falls back to script detection when the provider
/// is unavailable or answers with something unrecognizable.
pub struct LlmLanguageDetector {
    chat: ChatClient,
}

impl LlmLanguageDetector {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl LanguageDetector for LlmLanguageDetector {
    async fn detect(&self, text: &str) -> LanguageCode {
        let outcome = self.chat.complete(text, DETECT_SYSTEM_PROMPT).await;
        if !outcome.status.is_success() {
            debug!("LLM detection unavailable, using script detection");
            return detect_script(text);
        }

        // The model is told to answer with a bare code; tolerate stray
        // prose around it.
        outcome
            .response
            .split_whitespace()
            .map(LanguageCode::parse)
            .find(|code| !code.is_english())
            .unwrap_or(LanguageCode::English)
    }
}

/// The query after the input boundary has run.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundQuery {
    pub detected_language: LanguageCode,
    pub translated_query: String,
}

/// Input-side boundary: detect, then translate to English.
pub struct InputBoundary {
    detector: Box<dyn LanguageDetector>,
    translator: TranslateClient,
}

impl InputBoundary {
    pub fn new(detector: Box<dyn LanguageDetector>, translator: TranslateClient) -> Self {
        Self {
            detector,
            translator,
        }
    }

    pub async fn process(&self, query: &str) -> InboundQuery {
        let detected = self.detector.detect(query).await;
        if detected.is_english() {
            return InboundQuery {
                detected_language: detected,
                translated_query: query.to_string(),
            };
        }

        let outcome = self
            .translator
            .translate_if_needed(query, detected, LanguageCode::English)
            .await;

        let translated_query = if outcome.status.is_success() && !outcome.translated_text.is_empty()
        {
            outcome.translated_text
        } else {
            warn!(language = %detected, "input translation failed, using original query");
            query.to_string()
        };

        InboundQuery {
            detected_language: detected,
            translated_query,
        }
    }
}

/// Output-side boundary: translate the English response back to the
/// user's language.
pub struct OutputBoundary {
    translator: TranslateClient,
}

impl OutputBoundary {
    pub fn new(translator: TranslateClient) -> Self {
        Self { translator }
    }

    pub async fn render(&self, english_response: &str, language: LanguageCode) -> String {
        if language.is_english() {
            return english_response.to_string();
        }

        let outcome = self
            .translator
            .translate_if_needed(english_response, LanguageCode::English, language)
            .await;

        if outcome.status.is_success() && !outcome.translated_text.is_empty() {
            outcome.translated_text
        } else {
            warn!(language = %language, "output translation failed, returning English text");
            english_response.to_string()
        }
    }
}
