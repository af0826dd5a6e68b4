//! Travel domains supported by the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A booking domain the conversation can be routed to.
///
/// Each domain owns an independent booking context within a session;
/// the router decides per turn which one the latest message pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelDomain {
    /// Flight search and booking.
    Flight,
    /// Hotel search and booking.
    Hotel,
}

impl TravelDomain {
    /// All supported domains, in dispatch order.
    pub fn all() -> [TravelDomain; 2] {
        [TravelDomain::Flight, TravelDomain::Hotel]
    }

    /// Returns a short label for logs and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Flight => "flight",
            Self::Hotel => "hotel",
        }
    }
}

impl fmt::Display for TravelDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
