//! HTTP DTOs for the chat endpoint.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::TurnOutcome;
use crate::domain::booking::{BookingContext, Offering};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One chat turn from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// The reply and post-turn state snapshot for one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_domain: Option<String>,
    pub flight_context: ContextResponse,
    pub hotel_context: ContextResponse,
}

impl From<TurnOutcome> for ChatResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            reply: outcome.reply,
            active_domain: outcome.active_domain.map(|d| d.label().to_string()),
            flight_context: outcome.flight.into(),
            hotel_context: outcome.hotel.into(),
        }
    }
}

/// One domain's booking context, as exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ContextResponse {
    pub flow_state: String,
    pub slots: serde_json::Value,
    pub results: Vec<OfferingResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_details: Option<String>,
    pub confirmed: bool,
}

impl From<BookingContext> for ContextResponse {
    fn from(context: BookingContext) -> Self {
        Self {
            flow_state: serde_json::to_value(context.flow_state)
                .ok()
                .and_then(|v| v.as_str().map(String::from))
                .unwrap_or_default(),
            slots: serde_json::to_value(&context.slots).unwrap_or_default(),
            results: context.results.into_iter().map(Into::into).collect(),
            selection_id: context.selection_id.map(|id| id.to_string()),
            transaction_details: context.transaction_details,
            confirmed: context.confirmed,
        }
    }
}

/// One search result, as exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct OfferingResponse {
    pub id: String,
    pub title: String,
    pub detail: String,
    pub price: f64,
    pub cancellation_policy: String,
}

impl From<Offering> for OfferingResponse {
    fn from(offering: Offering) -> Self {
        Self {
            id: offering.id.to_string(),
            title: offering.title,
            detail: offering.detail,
            price: offering.price,
            cancellation_policy: offering.cancellation_policy,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
        }
    }
}
