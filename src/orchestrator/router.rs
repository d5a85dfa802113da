//! Router
//!
//! Classifies the translated English query into an intent and decides
//! whether a clarification is needed before any specialist runs.
//!
//! Classification sits behind [`IntentClassifier`] so the underlying
//! mechanism stays swappable: the default is one LLM call producing a
//! strict JSON decision, with deterministic keyword rules as the fallback
//! (and as a standalone classifier for offline use and tests).

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::tools::ChatClient;

/// The specialist domains a query can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Weather,
    Farming,
    Market,
    Government,
    General,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Intent::Weather => "weather",
            Intent::Farming => "farming",
            Intent::Market => "market",
            Intent::Government => "government",
            Intent::General => "general",
        };
        write!(f, "{name}")
    }
}

/// Outcome of the routing step for one turn.
///
/// When `needs_clarification` is set, the clarification question is the
/// turn's answer and no specialist is invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub intent: Intent,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub needs_clarification: bool,
    #[serde(default)]
    pub clarification_question: String,
}

impl RoutingDecision {
    pub fn dispatch(intent: Intent) -> Self {
        Self {
            intent,
            location: String::new(),
            needs_clarification: false,
            clarification_question: String::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn clarify(intent: Intent, question: impl Into<String>) -> Self {
        Self {
            intent,
            location: String::new(),
            needs_clarification: true,
            clarification_question: question.into(),
        }
    }
}

/// Pluggable intent classification.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, query: &str) -> RoutingDecision;
}

const LOCATION_QUESTION: &str = "Which city or village are you asking about?";
const AMBIGUOUS_QUESTION: &str = "I can help with weather, farming advice, mandi prices, \
    or government statistics. What would you like to know?";

// ──────────────────────────────────────────────────────────────────────────
// KEYWORD CLASSIFIER
// ──────────────────────────────────────────────────────────────────────────

/// Deterministic keyword rules. Used directly in tests and offline setups,
/// and as the fallback when the LLM classifier cannot produce a decision.
pub struct KeywordIntentClassifier {
    location_re: Regex,
}

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self {
            // Text after "in"/"at"/"near", stopping at sentence punctuation.
            location_re: Regex::new(r"(?i)\b(?:in|at|near)\s+([^?.!,;]+)")
                .expect("location pattern is valid"),
        }
    }

    fn is_weather_related(&self, query: &str) -> bool {
        const KEYWORDS: [&str; 9] = [
            "weather", "temperature", "rain", "forecast", "humidity", "wind", "climate",
            "monsoon", "heatwave",
        ];
        KEYWORDS.iter().any(|k| query.contains(k))
    }

    fn is_market_related(&self, query: &str) -> bool {
        const KEYWORDS: [&str; 6] = ["price", "mandi", "market", "rate", "sell", "msp"];
        KEYWORDS.iter().any(|k| query.contains(k))
    }

    fn is_government_related(&self, query: &str) -> bool {
        const KEYWORDS: [&str; 9] = [
            "cpi", "wpi", "iip", "inflation", "statistics", "census", "gdp", "survey",
            "official data",
        ];
        KEYWORDS.iter().any(|k| query.contains(k))
    }

    fn is_farming_related(&self, query: &str) -> bool {
        const KEYWORDS: [&str; 16] = [
            "crop", "pest", "soil", "irrigation", "fertilizer", "fertiliser", "seed",
            "harvest", "farm", "sowing", "yield", "tractor", "disease", "manure",
            "pesticide", "wheat",
        ];
        KEYWORDS.iter().any(|k| query.contains(k))
    }

    fn is_greeting(&self, query: &str) -> bool {
        const GREETINGS: [&str; 7] = [
            "hi", "hello", "hey", "namaste", "good morning", "good afternoon", "good evening",
        ];
        GREETINGS.iter().any(|g| {
            query == *g
                || (query.starts_with(g)
                    && query[g.len()..].starts_with([' ', ',', '!', '.']))
        })
    }

    /// Pull a place name out of the query, trimming trailing filler words.
    pub(crate) fn extract_location(&self, query: &str) -> String {
        const FILLER: [&str; 6] = ["today", "tomorrow", "tonight", "now", "please", "currently"];

        let Some(captures) = self.location_re.captures(query) else {
            return String::new();
        };
        let mut words: Vec<&str> = captures[1].split_whitespace().collect();
        while let Some(last) = words.last() {
            if FILLER.contains(&last.to_lowercase().as_str()) {
                words.pop();
            } else {
                break;
            }
        }
        words.join(" ")
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, query: &str) -> RoutingDecision {
        let q = query.to_lowercase();

        if self.is_weather_related(&q) {
            let location = self.extract_location(query);
            if location.is_empty() {
                return RoutingDecision::clarify(Intent::Weather, LOCATION_QUESTION);
            }
            return RoutingDecision::dispatch(Intent::Weather).with_location(location);
        }
        if self.is_market_related(&q) {
            return RoutingDecision::dispatch(Intent::Market);
        }
        if self.is_government_related(&q) {
            return RoutingDecision::dispatch(Intent::Government);
        }
        if self.is_farming_related(&q) {
            return RoutingDecision::dispatch(Intent::Farming);
        }
        if self.is_greeting(&q) {
            return RoutingDecision::dispatch(Intent::General);
        }

        // Nothing to go on: ask rather than guess.
        RoutingDecision::clarify(Intent::General, AMBIGUOUS_QUESTION)
    }
}

// ──────────────────────────────────────────────────────────────────────────
// LLM CLASSIFIER
// ──────────────────────────────────────────────────────────────────────────

const ROUTER_SYSTEM_PROMPT: &str = "\
You are a routing agent for a farmer assistant. Read the user's English query
and answer with a single strict JSON object, no extra text:
{
  \"intent\": \"weather\" | \"farming\" | \"market\" | \"government\" | \"general\",
  \"location\": \"<string or empty>\",
  \"needs_clarification\": true | false,
  \"clarification_question\": \"<string or empty>\"
}

Rules:
- \"weather\" for weather, temperature, rain, forecast, humidity, wind, or climate.
- \"farming\" for crops, pests, soil, irrigation, fertilizer, equipment, or practices.
- \"market\" for mandi prices, commodity rates, or selling produce.
- \"government\" for official statistics such as CPI, WPI, IIP, or surveys.
- \"general\" only for greetings or clearly unrelated questions.
- If intent is \"weather\" and the location is missing or ambiguous, set
  needs_clarification=true and ask a short question like
  \"Which city or village are you asking about?\".
- Keep location a plain place name if present (e.g., \"Mumbai, MH, IN\").
- If unsure between \"general\" and a domain, pick the domain.";

/// One-call LLM classification with keyword fallback.
pub struct LlmIntentClassifier {
    chat: ChatClient,
    fallback: KeywordIntentClassifier,
}

impl LlmIntentClassifier {
    pub fn new(chat: ChatClient) -> Self {
        Self {
            chat,
            fallback: KeywordIntentClassifier::new(),
        }
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn classify(&self, query: &str) -> RoutingDecision {
        let outcome = self.chat.complete(query, ROUTER_SYSTEM_PROMPT).await;
        if !outcome.status.is_success() {
            debug!("LLM routing unavailable, using keyword rules");
            return self.fallback.classify(query).await;
        }

        match parse_decision(&outcome.response) {
            Some(decision) => decision,
            None => {
                debug!("unparsable routing reply, using keyword rules");
                self.fallback.classify(query).await
            }
        }
    }
}

/// Extract the decision object from a model reply that may carry prose
/// around the JSON. Unknown intent labels resolve to farming, never to
/// small talk.
pub(crate) fn parse_decision(reply: &str) -> Option<RoutingDecision> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    let value: Value = serde_json::from_str(&reply[start..=end]).ok()?;

    let intent = match value["intent"]
        .as_str()
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("weather") => Intent::Weather,
        Some("market") => Intent::Market,
        Some("government") => Intent::Government,
        Some("general") => Intent::General,
        _ => Intent::Farming,
    };

    Some(RoutingDecision {
        intent,
        location: value["location"].as_str().unwrap_or_default().to_string(),
        needs_clarification: value["needs_clarification"].as_bool().unwrap_or(false),
        clarification_question: value["clarification_question"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
    })
}
