//! Market Specialist
//!
//! Answers mandi price queries. State and commodity are extracted from the
//! query itself: one chat call with a strict-JSON extraction prompt,
//! falling back to keyword vocabularies when the provider is unavailable.
//! Missing required fields produce a clarification request and no remote
//! call at all.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::Specialist;
use crate::orchestrator::RoutingDecision;
use crate::tools::{ChatClient, MandiClient, DEFAULT_MANDI_LIMIT};

const EXTRACT_SYSTEM_PROMPT: &str = "\
You extract mandi price query fields for a farmer assistant. From the user's
English query, answer with a single strict JSON object, no extra text:
{\"state\": \"<string or empty>\", \"district\": \"<string or empty>\",
 \"commodity\": \"<string or empty>\"}
Use official Indian state names. Leave a field empty rather than guessing.";

/// Fallback vocabularies for offline extraction.
const STATES: [&str; 20] = [
    "Andhra Pradesh",
    "Bihar",
    "Chhattisgarh",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Tamil Nadu",
    "Telangana",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Assam",
];

const COMMODITIES: [&str; 20] = [
    "Wheat", "Rice", "Paddy", "Maize", "Onion", "Potato", "Tomato", "Cotton", "Soyabean",
    "Mustard", "Groundnut", "Gram", "Tur", "Moong", "Bajra", "Jowar", "Sugarcane", "Banana",
    "Chilli", "Turmeric",
];

#[derive(Debug, Default, Clone, PartialEq)]
struct MarketQuery {
    state: String,
    district: String,
    commodity: String,
}

pub struct MarketSpecialist {
    mandi: MandiClient,
    chat: ChatClient,
}

impl MarketSpecialist {
    pub fn new(mandi: MandiClient, chat: ChatClient) -> Self {
        Self { mandi, chat }
    }

    async fn extract(&self, query: &str) -> MarketQuery {
        let outcome = self.chat.complete(query, EXTRACT_SYSTEM_PROMPT).await;
        if outcome.status.is_success() {
            if let Some(extracted) = parse_extraction(&outcome.response) {
                return extracted;
            }
        }
        debug!("chat extraction unavailable, using keyword vocabularies");
        keyword_extract(query)
    }

    fn render(&self, fields: &MarketQuery, records: &[crate::tools::MandiRecord]) -> String {
        let mut lines = vec![format!(
            "Latest mandi prices for {} in {}:",
            fields.commodity, fields.state
        )];
        for record in records {
            lines.push(format!(
                "{} | {} | {} ({}): ₹{}–₹{} per quintal, modal ₹{}",
                record.arrival_date,
                record.market,
                record.variety,
                record.grade,
                record.min_price,
                record.max_price,
                record.modal_price,
            ));
        }
        if fields.district.is_empty() {
            lines.push(
                "These are statewide results; mention a district for more precise prices."
                    .to_string(),
            );
        }
        lines.join("\n")
    }
}

#[async_trait]
impl Specialist for MarketSpecialist {
    fn name(&self) -> &str {
        "market"
    }

    async fn respond(&self, query: &str, _decision: &RoutingDecision) -> String {
        let fields = self.extract(query).await;

        if fields.state.is_empty() || fields.commodity.is_empty() {
            return "To look up mandi prices I need the state and the commodity \
                    (district is optional). For example: \"onion prices in Maharashtra\"."
                .to_string();
        }

        let district = (!fields.district.is_empty()).then_some(fields.district.as_str());
        let outcome = self
            .mandi
            .prices(&fields.state, district, &fields.commodity, DEFAULT_MANDI_LIMIT)
            .await;

        if !outcome.status.is_success() {
            return format!(
                "Sorry, I couldn't find mandi prices for {} in {} right now. \
                 Could you check the commodity and state names and try again?",
                fields.commodity, fields.state
            );
        }

        self.render(&fields, &outcome.records)
    }
}

/// Parse the extraction reply, tolerating prose around the JSON object.
fn parse_extraction(reply: &str) -> Option<MarketQuery> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    let value: Value = serde_json::from_str(&reply[start..=end]).ok()?;

    Some(MarketQuery {
        state: value["state"].as_str().unwrap_or_default().trim().to_string(),
        district: value["district"].as_str().unwrap_or_default().trim().to_string(),
        commodity: value["commodity"].as_str().unwrap_or_default().trim().to_string(),
    })
}

/// Deterministic fallback: scan the query against known state and
/// commodity names. Districts are left empty here.
fn keyword_extract(query: &str) -> MarketQuery {
    let q = query.to_lowercase();

    let state = STATES
        .iter()
        .find(|s| q.contains(&s.to_lowercase()))
        .map(|s| s.to_string())
        .unwrap_or_default();
    let commodity = COMMODITIES
        .iter()
        .find(|c| q.contains(&c.to_lowercase()))
        .map(|c| c.to_string())
        .unwrap_or_default();

    MarketQuery {
        state,
        district: String::new(),
        commodity,
    }
}
