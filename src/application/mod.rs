//! Application layer - Turn orchestration across routing, booking flows,
//! and session persistence.

mod orchestrator;

pub use orchestrator::{TurnOrchestrator, TurnOutcome};
