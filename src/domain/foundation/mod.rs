//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, enums, message types, and error types
//! that form the vocabulary of the Travel Companion domain.

mod errors;
mod ids;
mod message;
mod state_machine;
mod travel_domain;

pub use errors::ValidationError;
pub use ids::{OfferingId, SessionId};
pub use message::{MessageRole, TurnMessage};
pub use state_machine::StateMachine;
pub use travel_domain::TravelDomain;
