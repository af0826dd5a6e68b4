//! Extraction Oracle Port - Interface to the language-understanding capability.
//!
//! The oracle turns raw conversation text into structured slot candidates
//! plus a user-facing reply, and classifies which domain the latest turn
//! pertains to. It is nondeterministic, potentially slow, and may fail;
//! callers must treat every invocation as a remote call.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::booking::{BookingContext, DomainSpec, SlotValues};
use crate::domain::foundation::{TravelDomain, TurnMessage};

/// Candidate values extracted from one conversation turn.
///
/// Every field is partial: the oracle only returns what the latest turn
/// supports, and omission carries no meaning beyond "nothing new".
#[derive(Debug, Clone, Default)]
pub struct SlotExtraction {
    /// Candidate slot values (non-empty candidates overwrite context slots).
    pub slots: SlotValues,
    /// Raw selection identifier, if the user picked an offering.
    pub selection_id: Option<String>,
    /// Finalize-time details (passenger names, guest details), if supplied.
    pub transaction_details: Option<String>,
    /// Default turn reply, used unless a stage transition overrides it.
    pub reply: String,
}

/// Port for the extraction oracle.
#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    /// Classifies which domain the latest turn pertains to.
    ///
    /// `previous` is the session's currently active domain; the oracle may
    /// keep it, switch away from it, or return `None` when no domain can
    /// be determined (e.g. an ambiguous first turn).
    async fn classify_domain(
        &self,
        history: &[TurnMessage],
        previous: Option<TravelDomain>,
    ) -> Result<Option<TravelDomain>, OracleError>;

    /// Extracts candidate slot values and a default reply for one turn.
    ///
    /// The domain spec supplies the slot vocabulary and the context is the
    /// pre-turn state, serialized into the prompt so the oracle does not
    /// re-ask for known values.
    async fn extract(
        &self,
        spec: &DomainSpec,
        context: &BookingContext,
        history: &[TurnMessage],
    ) -> Result<SlotExtraction, OracleError>;
}

/// Errors from the extraction oracle.
///
/// All variants abort the current turn without mutating session state;
/// the user sees a transient-retry message and may safely resend.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("Oracle request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("Oracle authentication failed")]
    AuthenticationFailed,

    #[error("Oracle returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl OracleError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a rate-limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Returns true for transient failures worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Unavailable(_) | Self::RateLimited { .. } | Self::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_error_displays_duration() {
        let err = OracleError::Timeout { timeout_secs: 30 };
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn unavailable_error_carries_message() {
        let err = OracleError::unavailable("upstream 503");
        assert!(err.to_string().contains("upstream 503"));
    }

    #[test]
    fn auth_and_malformed_errors_are_not_retryable() {
        assert!(!OracleError::AuthenticationFailed.is_retryable());
        assert!(!OracleError::malformed("bad json").is_retryable());
        assert!(OracleError::unavailable("503").is_retryable());
        assert!(OracleError::Timeout { timeout_secs: 30 }.is_retryable());
    }

    #[test]
    fn extraction_default_is_empty() {
        let extraction = SlotExtraction::default();
        assert!(extraction.slots.is_empty());
        assert!(extraction.selection_id.is_none());
        assert!(extraction.transaction_details.is_none());
        assert!(extraction.reply.is_empty());
    }
}
