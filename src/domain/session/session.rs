//! Session aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingContext;
use crate::domain::foundation::{TravelDomain, TurnMessage};

/// The persisted state of one conversation session.
///
/// Created on the first turn for a session id, mutated on every turn,
/// never explicitly deleted (the backing store may expire it). History is
/// append-only; each supported domain owns an independent context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Ordered turn messages, append-only.
    pub history: Vec<TurnMessage>,
    /// The currently active domain, if one has been routed to.
    pub active_domain: Option<TravelDomain>,
    /// Flight booking context.
    pub flight: BookingContext,
    /// Hotel booking context.
    pub hotel: BookingContext,
    /// When this session was created.
    pub created_at: DateTime<Utc>,
    /// When this session was last saved.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session: no history, no active domain, default
    /// contexts for both domains.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            history: Vec::new(),
            active_domain: None,
            flight: BookingContext::new(),
            hotel: BookingContext::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message to the history and bumps the updated timestamp.
    pub fn append(&mut self, message: TurnMessage) {
        self.history.push(message);
        self.updated_at = Utc::now();
    }

    /// Returns the context for `domain`.
    pub fn context(&self, domain: TravelDomain) -> &BookingContext {
        match domain {
            TravelDomain::Flight => &self.flight,
            TravelDomain::Hotel => &self.hotel,
        }
    }

    /// Returns the mutable context for `domain`.
    pub fn context_mut(&mut self, domain: TravelDomain) -> &mut BookingContext {
        match domain {
            TravelDomain::Flight => &mut self.flight,
            TravelDomain::Hotel => &mut self.hotel,
        }
    }

    /// Replaces the context for `domain` with the post-turn context.
    pub fn set_context(&mut self, domain: TravelDomain, context: BookingContext) {
        *self.context_mut(domain) = context;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
