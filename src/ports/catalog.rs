//! Catalog Service Port - Interface to domain catalog and booking services.
//!
//! One instance exists per domain (flight, hotel). Architecturally these
//! are remote services; the reference adapters are mocked data sources.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::booking::{Offering, SlotValues};
use crate::domain::foundation::OfferingId;

/// Port for catalog search and transaction finalization.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Searches the catalog with a complete set of slot values.
    ///
    /// Returned offering ids are unique within this response only.
    async fn search(&self, criteria: &SlotValues) -> Result<Vec<Offering>, CatalogError>;

    /// Finalizes a transaction for a previously returned offering.
    async fn finalize(&self, selection: &OfferingId, details: &str) -> Result<(), CatalogError>;
}

/// Errors from catalog search or finalize calls.
///
/// These are non-fatal to the turn: the flow stays in its current stage
/// and the reply invites a retry.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

impl CatalogError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a rejected-transaction error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}
