//! Session module.
//!
//! The session is the full persisted state for one user's ongoing
//! multi-turn conversation across all domains.

mod session;

pub use session::Session;
