//! Farming Specialist
//!
//! Delegates the English query straight to the chat provider under the
//! fixed farming-advice system prompt. On an error envelope the user sees
//! the canned apology plus a follow-up question, never the provider's
//! error text.

use async_trait::async_trait;

use super::Specialist;
use crate::orchestrator::RoutingDecision;
use crate::tools::ChatClient;

const FOLLOW_UP: &str =
    "Could you tell me which crop and region you're asking about so I can try again?";

#[derive(Clone)]
pub struct FarmingSpecialist {
    chat: ChatClient,
}

impl FarmingSpecialist {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Specialist for FarmingSpecialist {
    fn name(&self) -> &str {
        "farming"
    }

    async fn respond(&self, query: &str, _decision: &RoutingDecision) -> String {
        let outcome = self.chat.farming_advice(query).await;
        if outcome.status.is_success() {
            outcome.response
        } else {
            // The envelope's response field already carries the apology.
            format!("{} {FOLLOW_UP}", outcome.response)
        }
    }
}
