//! Orchestrator Module
//!
//! Session state, intent routing, and the pipeline that composes the
//! boundary agents and specialists into one turn.

pub mod pipeline;
pub mod router;
pub mod session;

pub use pipeline::{Pipeline, TurnRecord};
pub use router::{
    Intent, IntentClassifier, KeywordIntentClassifier, LlmIntentClassifier, RoutingDecision,
};
pub use session::{SessionKey, SessionStore};
