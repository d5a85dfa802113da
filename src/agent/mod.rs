//! Agent Module
//!
//! The specialist response units and the translation boundary agents that
//! wrap them. Specialists never fail a turn: every client error is absorbed
//! into apology or clarification text.

mod boundary;
mod farming;
mod government;
mod market;
mod weather;

pub use boundary::{
    InboundQuery, InputBoundary, LanguageDetector, LlmLanguageDetector, OutputBoundary,
    ScriptLanguageDetector,
};
pub use farming::FarmingSpecialist;
pub use government::GovernmentSpecialist;
pub use market::MarketSpecialist;
pub use weather::WeatherSpecialist;

use async_trait::async_trait;

use crate::orchestrator::RoutingDecision;

/// A domain-specific response unit.
///
/// `respond` consumes the translated English query plus the routing
/// decision and returns the English response text. Implementations own
/// their degradation paths, so the return is plain text rather than a
/// `Result`.
#[async_trait]
pub trait Specialist: Send + Sync {
    fn name(&self) -> &str;

    async fn respond(&self, query: &str, decision: &RoutingDecision) -> String;
}
