//! Domain router.
//!
//! A pure function of (history, previous active domain, oracle
//! classification). Holds no state of its own.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{TravelDomain, TurnMessage};
use crate::ports::{ExtractionOracle, OracleError};

/// The routing decision for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The turn pertains to this domain.
    Domain(TravelDomain),
    /// No domain could be determined; the orchestrator treats the turn
    /// as a terminal no-op and replies with a clarification.
    Undetermined,
}

/// Routes each turn to the domain it pertains to.
pub struct DomainRouter {
    oracle: Arc<dyn ExtractionOracle>,
}

impl DomainRouter {
    /// Creates a router with its injected classification capability.
    pub fn new(oracle: Arc<dyn ExtractionOracle>) -> Self {
        Self { oracle }
    }

    /// Decides the active domain for the latest turn.
    ///
    /// Mid-conversation switches are always honored: when the
    /// classification disagrees with `previous`, the classified domain
    /// wins. When the oracle cannot determine a domain, the previous one
    /// is NOT silently kept; the outcome is `Undetermined` only if there
    /// is no previous domain to fall back to.
    pub async fn route(
        &self,
        history: &[TurnMessage],
        previous: Option<TravelDomain>,
    ) -> Result<RouteOutcome, OracleError> {
        let classified = self.oracle.classify_domain(history, previous).await?;

        let outcome = match (classified, previous) {
            (Some(domain), _) => RouteOutcome::Domain(domain),
            (None, Some(domain)) => RouteOutcome::Domain(domain),
            (None, None) => RouteOutcome::Undetermined,
        };

        debug!(?classified, ?previous, ?outcome, "routed turn");
        Ok(outcome)
    }
}
