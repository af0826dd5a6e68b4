//! Booking flow engine.
//!
//! One generic state machine drives every domain's booking conversation.
//! Each turn: ask the oracle for candidate slots and a default reply, run
//! the invalidation pass, merge slots, then apply stage logic. The engine
//! is a pure function of (context, history, oracle response, catalog
//! responses); it holds no session-crossing state.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::foundation::{OfferingId, StateMachine, TurnMessage, ValidationError};
use crate::ports::{CatalogService, ExtractionOracle, OracleError};

use super::{BookingContext, DomainSpec, FlowState};

/// Errors that abort a turn without committing any state.
///
/// Catalog failures are not here: they are recovered inside the engine
/// into retry replies, because the merged slots of the turn are still
/// worth persisting.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    InvalidTransition(#[from] ValidationError),
}

/// The booking flow state machine, instantiated once per domain.
pub struct BookingFlowEngine {
    spec: DomainSpec,
    oracle: Arc<dyn ExtractionOracle>,
    catalog: Arc<dyn CatalogService>,
}

impl BookingFlowEngine {
    /// Creates an engine for one domain with its injected collaborators.
    pub fn new(
        spec: DomainSpec,
        oracle: Arc<dyn ExtractionOracle>,
        catalog: Arc<dyn CatalogService>,
    ) -> Self {
        Self {
            spec,
            oracle,
            catalog,
        }
    }

    /// Returns the domain spec this engine was configured with.
    pub fn spec(&self) -> &DomainSpec {
        &self.spec
    }

    /// Advances the flow by one turn.
    ///
    /// Returns the post-turn context and the single reply for this turn.
    /// Engine-generated stage messages take priority over the oracle's
    /// default reply once a stage transition fires; otherwise the oracle's
    /// reply is authoritative.
    pub async fn advance(
        &self,
        context: &BookingContext,
        history: &[TurnMessage],
    ) -> Result<(BookingContext, String), FlowError> {
        let extraction = self.oracle.extract(&self.spec, context, history).await?;

        let mut ctx = context.clone();

        // Invalidation runs against pre-turn values, before the merge,
        // and regardless of the current stage.
        let locked = self.spec.locked_slot_names();
        let invalidated = ctx.invalidate_if_changed(&locked, &extraction.slots);
        if invalidated {
            debug!(domain = %self.spec.domain, "locked slot changed, flow reset to search");
        }

        ctx.merge_candidates(&extraction.slots);

        let mut reply = extraction.reply;

        match ctx.flow_state {
            FlowState::Search => {
                if ctx.slots.is_complete(self.spec.required_slot_names()) {
                    match self.catalog.search(&ctx.slots).await {
                        Ok(results) if !results.is_empty() => {
                            debug!(
                                domain = %self.spec.domain,
                                count = results.len(),
                                "search complete, presenting results"
                            );
                            ctx.record_results(results);
                            ctx.flow_state = ctx.flow_state.transition_to(FlowState::Verify)?;
                            reply = self.spec.format_results(&ctx.results);
                        }
                        Ok(_) => {
                            reply = self.spec.no_results_message.to_string();
                        }
                        Err(err) => {
                            warn!(domain = %self.spec.domain, error = %err, "catalog search failed");
                            reply = self.spec.search_retry_message.to_string();
                        }
                    }
                }
            }

            FlowState::Verify => {
                if let Some(raw_id) = extraction.selection_id {
                    let id = OfferingId::new(raw_id);
                    // An id outside the current results is ignored; the
                    // oracle's reply already explains the rejection.
                    let prompt = ctx.select(&id).map(|o| (self.spec.selection_prompt)(o));
                    if let Some(prompt) = prompt {
                        ctx.flow_state = ctx.flow_state.transition_to(FlowState::Book)?;
                        reply = prompt;
                    }
                }
            }

            FlowState::Book => {
                if let Some(details) = extraction.transaction_details {
                    if ctx.confirmed {
                        // A context that was completed, invalidated, and
                        // re-driven to Book never finalizes twice.
                        reply = self.spec.already_booked_message.to_string();
                    } else if let Some(selection) = ctx.selection_id.clone() {
                        ctx.transaction_details = Some(details.clone());
                        match self.catalog.finalize(&selection, &details).await {
                            Ok(()) => {
                                debug!(domain = %self.spec.domain, %selection, "booking finalized");
                                ctx.mark_confirmed();
                                ctx.flow_state =
                                    ctx.flow_state.transition_to(FlowState::Completed)?;
                                reply = self.spec.confirmation_message.to_string();
                            }
                            Err(err) => {
                                warn!(
                                    domain = %self.spec.domain,
                                    error = %err,
                                    "finalize failed, staying in book stage"
                                );
                                reply = self.spec.finalize_retry_message.to_string();
                            }
                        }
                    }
                }
            }

            // Open-ended follow-up; only the invalidation pass above can
            // move the flow out of this stage.
            FlowState::Completed => {}
        }

        Ok((ctx, reply))
    }
}
