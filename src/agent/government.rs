//! Government Data Specialist
//!
//! Answers official-statistics questions through the configured
//! structured-data endpoint and never fabricates figures: when the
//! endpoint errors or is absent, the turn falls back to the farming
//! specialist's chat-based behavior.

use async_trait::async_trait;
use tracing::debug;

use super::{FarmingSpecialist, Specialist};
use crate::orchestrator::RoutingDecision;
use crate::tools::StatsClient;

pub struct GovernmentSpecialist {
    stats: StatsClient,
    fallback: FarmingSpecialist,
}

impl GovernmentSpecialist {
    pub fn new(stats: StatsClient, fallback: FarmingSpecialist) -> Self {
        Self { stats, fallback }
    }
}

#[async_trait]
impl Specialist for GovernmentSpecialist {
    fn name(&self) -> &str {
        "government"
    }

    async fn respond(&self, query: &str, decision: &RoutingDecision) -> String {
        let outcome = self.stats.ask(query).await;
        if outcome.status.is_success() {
            return outcome.answer;
        }

        debug!("statistics endpoint unavailable, falling back to farming advice");
        self.fallback.respond(query, decision).await
    }
}
