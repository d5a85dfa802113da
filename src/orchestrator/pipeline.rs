//! Pipeline Orchestrator
//!
//! Composes the boundary agents, router, and specialists into the fixed
//! per-turn sequence and owns the session store. The pipeline is built
//! once per process at the call site and reused; there are no
//! module-level singletons.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::agent::{
    FarmingSpecialist, GovernmentSpecialist, InputBoundary, LanguageDetector, MarketSpecialist,
    OutputBoundary, ScriptLanguageDetector, Specialist, WeatherSpecialist,
};
use crate::config::Config;
use crate::language::LanguageCode;
use crate::orchestrator::router::{
    Intent, IntentClassifier, LlmIntentClassifier, RoutingDecision,
};
use crate::orchestrator::session::{SessionKey, SessionStore};
use crate::tools::{
    ChatClient, ForecastClient, GeocodeClient, MandiClient, StatsClient, TranslateClient,
};

const FALLBACK_QUESTION: &str = "Could you tell me a bit more about what you need help with?";

/// The typed fields one turn produces. Mirrored into the session store
/// under the same names so later turns (and callers) can read them back.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub detected_language: LanguageCode,
    pub translated_query: String,
    pub routing_decision: RoutingDecision,
    pub english_response: String,
    pub final_response: String,
}

/// The per-process assistant pipeline.
pub struct Pipeline {
    app_name: String,
    sessions: SessionStore,
    inbound: InputBoundary,
    outbound: OutputBoundary,
    classifier: Box<dyn IntentClassifier>,
    specialists: HashMap<Intent, Box<dyn Specialist>>,
}

impl Pipeline {
    /// Wire the default pipeline from configuration: script-based language
    /// detection, LLM routing with keyword fallback, and the weather,
    /// farming, and market specialists. The government specialist joins
    /// only when its endpoint is configured.
    pub fn new(config: &Config) -> Self {
        let translator = TranslateClient::new(config.sarvam_api_key.clone())
            .with_base_url(config.sarvam_translate_url.clone());
        let chat = ChatClient::new(config.sarvam_api_key.clone())
            .with_base_url(config.sarvam_chat_url.clone())
            .with_model(config.chat_model.clone());
        let geocode = GeocodeClient::new(config.openweather_api_key.clone())
            .with_base_url(config.openweather_url.clone());
        let forecast = ForecastClient::new(config.openweather_api_key.clone())
            .with_base_url(config.openweather_url.clone());
        let mandi = MandiClient::new(config.mandi_api_key.clone())
            .with_base_url(config.mandi_url.clone());

        let mut specialists: HashMap<Intent, Box<dyn Specialist>> = HashMap::new();
        specialists.insert(
            Intent::Weather,
            Box::new(WeatherSpecialist::new(geocode, forecast)),
        );
        specialists.insert(
            Intent::Farming,
            Box::new(FarmingSpecialist::new(chat.clone())),
        );
        specialists.insert(
            Intent::Market,
            Box::new(MarketSpecialist::new(mandi, chat.clone())),
        );

        let stats = StatsClient::new(config.stats_url.clone(), config.stats_token.clone());
        if stats.is_configured() {
            specialists.insert(
                Intent::Government,
                Box::new(GovernmentSpecialist::new(
                    stats,
                    FarmingSpecialist::new(chat.clone()),
                )),
            );
        }

        Self {
            app_name: config.app_name.clone(),
            sessions: SessionStore::new(),
            inbound: InputBoundary::new(Box::new(ScriptLanguageDetector), translator.clone()),
            outbound: OutputBoundary::new(translator),
            classifier: Box::new(LlmIntentClassifier::new(chat)),
            specialists,
        }
    }

    /// Swap the intent classifier (rule-based for offline setups, mocks in
    /// tests).
    pub fn with_classifier(mut self, classifier: impl IntentClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Swap the language detector feeding the input boundary.
    pub fn with_detector(
        mut self,
        detector: impl LanguageDetector + 'static,
        config: &Config,
    ) -> Self {
        let translator = TranslateClient::new(config.sarvam_api_key.clone())
            .with_base_url(config.sarvam_translate_url.clone());
        self.inbound = InputBoundary::new(Box::new(detector), translator);
        self
    }

    /// Register or replace a specialist for an intent.
    pub fn with_specialist(mut self, intent: Intent, specialist: impl Specialist + 'static) -> Self {
        self.specialists.insert(intent, Box::new(specialist));
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run one turn: create the session if needed, translate in, route,
    /// dispatch at most one specialist, translate out, and format the
    /// reply. Provider failures degrade to polite text; `Err` is reserved
    /// for programmer error.
    pub async fn call(&self, query: &str, user_id: &str, session_id: &str) -> Result<String> {
        let key = SessionKey::new(&self.app_name, user_id, session_id);
        self.sessions.create(&key).await;

        let inbound = self.inbound.process(query).await;
        debug!(language = %inbound.detected_language, "input boundary done");

        let decision = self.classifier.classify(&inbound.translated_query).await;
        info!(intent = %decision.intent, clarify = decision.needs_clarification, "routed");

        let english_response = if decision.needs_clarification {
            if decision.clarification_question.is_empty() {
                FALLBACK_QUESTION.to_string()
            } else {
                decision.clarification_question.clone()
            }
        } else {
            self.dispatch(&inbound.translated_query, &decision).await
        };

        let final_response = self
            .outbound
            .render(&english_response, inbound.detected_language)
            .await;

        let record = TurnRecord {
            detected_language: inbound.detected_language,
            translated_query: inbound.translated_query,
            routing_decision: decision,
            english_response,
            final_response,
        };
        self.record_turn(&key, &record).await;

        Ok(format_reply(&record))
    }

    /// Exactly one specialist runs per turn. `general` goes to the farming
    /// specialist, as does any intent with no registered specialist.
    async fn dispatch(&self, query: &str, decision: &RoutingDecision) -> String {
        let intent = match decision.intent {
            Intent::General => Intent::Farming,
            other => other,
        };

        let specialist = self
            .specialists
            .get(&intent)
            .or_else(|| self.specialists.get(&Intent::Farming));

        match specialist {
            Some(specialist) => {
                debug!(specialist = specialist.name(), "dispatching");
                specialist.respond(query, decision).await
            }
            None => FALLBACK_QUESTION.to_string(),
        }
    }

    async fn record_turn(&self, key: &SessionKey, record: &TurnRecord) {
        self.sessions
            .set_field(key, "detected_language", json!(record.detected_language))
            .await;
        self.sessions
            .set_field(key, "translated_query", json!(record.translated_query))
            .await;
        self.sessions
            .set_field(key, "routing_decision", json!(record.routing_decision))
            .await;
        self.sessions
            .set_field(key, "english_response", json!(record.english_response))
            .await;
        self.sessions
            .set_field(key, "final_response", json!(record.final_response))
            .await;
    }
}

/// Format the user-facing reply: detected language header, the English
/// response, and (for non-English turns) the translated response block.
fn format_reply(record: &TurnRecord) -> String {
    let language = record.detected_language;
    let mut blocks = vec![format!(
        "Detected Language: {} ({})",
        language.language_name(),
        language.as_tag()
    )];

    blocks.push(format!("\nEnglish Response:\n{}", record.english_response));

    if !language.is_english() {
        blocks.push(format!(
            "\n{} Response:\n{}",
            language.language_name(),
            record.final_response
        ));
    }

    blocks.join("\n")
}
