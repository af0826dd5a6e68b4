//! Turn orchestrator.
//!
//! Owns the full lifecycle of one chat turn: load the session, route the
//! turn to a domain, advance that domain's booking flow, and persist the
//! result atomically. Turns for the same session are serialized; turns
//! for different sessions run concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::booking::{BookingContext, BookingFlowEngine};
use crate::domain::foundation::{SessionId, TravelDomain, TurnMessage};
use crate::domain::routing::{DomainRouter, RouteOutcome};
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// Reply when no domain can be determined and none is active yet.
const CLARIFICATION_REPLY: &str =
    "I can help you book flights and hotels. Which would you like to do?";

/// Reply when the oracle is unreachable or the turn times out. The turn
/// is not persisted, so the user can simply resend their message.
const ORACLE_RETRY_REPLY: &str =
    "I'm having trouble processing that right now. Please try again in a moment.";

/// The result of one orchestrated turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The single reply for this turn.
    pub reply: String,
    /// Active domain after the turn.
    pub active_domain: Option<TravelDomain>,
    /// Flight context snapshot after the turn.
    pub flight: BookingContext,
    /// Hotel context snapshot after the turn.
    pub hotel: BookingContext,
}

impl TurnOutcome {
    fn from_session(reply: String, session: &Session) -> Self {
        Self {
            reply,
            active_domain: session.active_domain,
            flight: session.flight.clone(),
            hotel: session.hotel.clone(),
        }
    }
}

/// Orchestrates chat turns over the router, the per-domain engines, and
/// the session store.
pub struct TurnOrchestrator {
    store: Arc<dyn SessionStore>,
    router: DomainRouter,
    flight_engine: BookingFlowEngine,
    hotel_engine: BookingFlowEngine,
    turn_timeout: Duration,
    /// Per-session turn locks. The outer mutex only guards map access and
    /// is never held across an await.
    session_locks: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl TurnOrchestrator {
    /// Creates an orchestrator with its injected collaborators.
    pub fn new(
        store: Arc<dyn SessionStore>,
        router: DomainRouter,
        flight_engine: BookingFlowEngine,
        hotel_engine: BookingFlowEngine,
    ) -> Self {
        Self {
            store,
            router,
            flight_engine,
            hotel_engine,
            turn_timeout: Duration::from_secs(60),
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the per-turn timeout covering the engine advance.
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Handles one chat turn for `session_id`.
    ///
    /// Store failures are the only fatal errors; oracle failures and
    /// timeouts are recovered into a retry reply with the turn discarded.
    pub async fn handle_turn(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<TurnOutcome, SessionStoreError> {
        let lock = self.session_lock(session_id)?;
        let outcome = {
            let _turn_guard = lock.lock().await;
            self.run_turn(session_id, message).await
        };
        self.release_session_lock(session_id, &lock);
        outcome
    }

    async fn run_turn(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<TurnOutcome, SessionStoreError> {
        let mut session = self.store.load(session_id).await?;
        let previous_domain = session.active_domain;
        session.append(TurnMessage::user(message));

        let routed = match self.router.route(&session.history, previous_domain).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "routing failed, turn discarded");
                return Ok(TurnOutcome::from_session(
                    ORACLE_RETRY_REPLY.to_string(),
                    &session,
                ));
            }
        };

        let domain = match routed {
            RouteOutcome::Domain(domain) => domain,
            RouteOutcome::Undetermined => {
                // Nothing to advance; persist the exchange so the next
                // turn sees the clarification in history.
                session.append(TurnMessage::assistant(CLARIFICATION_REPLY));
                self.store.save(session_id, &session).await?;
                return Ok(TurnOutcome::from_session(
                    CLARIFICATION_REPLY.to_string(),
                    &session,
                ));
            }
        };

        session.active_domain = Some(domain);

        let engine = self.engine_for(domain);
        let context = session.context(domain).clone();
        let advanced =
            tokio::time::timeout(self.turn_timeout, engine.advance(&context, &session.history))
                .await;

        let (context, reply) = match advanced {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!(session_id = %session_id, %domain, error = %err, "turn aborted");
                return Ok(TurnOutcome::from_session(
                    ORACLE_RETRY_REPLY.to_string(),
                    &session,
                ));
            }
            Err(_) => {
                error!(session_id = %session_id, %domain, "turn timed out");
                return Ok(TurnOutcome::from_session(
                    ORACLE_RETRY_REPLY.to_string(),
                    &session,
                ));
            }
        };

        session.set_context(domain, context);
        session.append(TurnMessage::assistant(&reply));
        self.store.save(session_id, &session).await?;

        info!(session_id = %session_id, %domain, "turn committed");
        Ok(TurnOutcome::from_session(reply, &session))
    }

    fn engine_for(&self, domain: TravelDomain) -> &BookingFlowEngine {
        match domain {
            TravelDomain::Flight => &self.flight_engine,
            TravelDomain::Hotel => &self.hotel_engine,
        }
    }

    fn session_lock(
        &self,
        id: &SessionId,
    ) -> Result<Arc<tokio::sync::Mutex<()>>, SessionStoreError> {
        let mut locks = self
            .session_locks
            .lock()
            .map_err(|_| SessionStoreError::io("session lock map poisoned"))?;
        Ok(locks.entry(id.clone()).or_default().clone())
    }

    /// Drops the map entry for `id` once no other turn holds or awaits the
    /// lock, so the map does not grow with every session id ever seen.
    fn release_session_lock(&self, id: &SessionId, lock: &Arc<tokio::sync::Mutex<()>>) {
        if let Ok(mut locks) = self.session_locks.lock() {
            // Two references left means the map entry plus our own handle;
            // the map mutex keeps new clones out during the check.
            if Arc::strong_count(lock) <= 2 {
                locks.remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::ScriptedOracle;
    use crate::adapters::catalog::{MockFlightCatalog, MockHotelCatalog};
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::booking::{flight_spec, hotel_spec, FlowState, SlotValue, SlotValues};
    use crate::ports::{OracleError, SlotExtraction};

    fn orchestrator(oracle: ScriptedOracle) -> TurnOrchestrator {
        orchestrator_with_store(oracle, Arc::new(InMemorySessionStore::new()))
    }

    fn orchestrator_with_store(
        oracle: ScriptedOracle,
        store: Arc<dyn SessionStore>,
    ) -> TurnOrchestrator {
        let oracle = Arc::new(oracle);
        TurnOrchestrator::new(
            store,
            DomainRouter::new(oracle.clone()),
            BookingFlowEngine::new(flight_spec(), oracle.clone(), Arc::new(MockFlightCatalog::new())),
            BookingFlowEngine::new(hotel_spec(), oracle, Arc::new(MockHotelCatalog::new())),
        )
    }

    fn session_id(raw: &str) -> SessionId {
        SessionId::new(raw).unwrap()
    }

    fn full_flight_slots() -> SlotValues {
        let mut slots = SlotValues::new();
        slots.set("origin", SlotValue::text("Delhi"));
        slots.set("destination", SlotValue::text("Goa"));
        slots.set("travel_dates", SlotValue::text("2026-09-12"));
        slots.set("passengers", SlotValue::Count(2));
        slots
    }

    #[tokio::test]
    async fn ambiguous_first_turn_asks_for_clarification() {
        let oracle = ScriptedOracle::new().with_domain(None);
        let orchestrator = orchestrator(oracle);

        let outcome = orchestrator
            .handle_turn(&session_id("s1"), "hello")
            .await
            .unwrap();

        assert_eq!(outcome.reply, CLARIFICATION_REPLY);
        assert!(outcome.active_domain.is_none());
    }

    #[tokio::test]
    async fn clarification_turn_is_persisted() {
        let store = Arc::new(InMemorySessionStore::new());
        let oracle = ScriptedOracle::new().with_domain(None);
        let orchestrator = orchestrator_with_store(oracle, store.clone());
        let id = session_id("s1");

        orchestrator.handle_turn(&id, "hello").await.unwrap();

        let session = store.load(&id).await.unwrap();
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[1].content, CLARIFICATION_REPLY);
    }

    #[tokio::test]
    async fn complete_criteria_turn_presents_results_and_persists() {
        let store = Arc::new(InMemorySessionStore::new());
        let oracle = ScriptedOracle::new()
            .with_domain(Some(TravelDomain::Flight))
            .with_extraction(SlotExtraction {
                slots: full_flight_slots(),
                reply: "Searching.".to_string(),
                ..Default::default()
            });
        let orchestrator = orchestrator_with_store(oracle, store.clone());
        let id = session_id("s1");

        let outcome = orchestrator
            .handle_turn(&id, "Delhi to Goa on 2026-09-12 for 2")
            .await
            .unwrap();

        assert_eq!(outcome.active_domain, Some(TravelDomain::Flight));
        assert_eq!(outcome.flight.flow_state, FlowState::Verify);
        assert_eq!(outcome.flight.results.len(), 3);
        assert!(outcome.reply.starts_with("Here are the flights I found:"));

        let session = store.load(&id).await.unwrap();
        assert_eq!(session.flight.flow_state, FlowState::Verify);
        assert_eq!(session.history.len(), 2);
    }

    #[tokio::test]
    async fn oracle_failure_discards_the_turn() {
        let store = Arc::new(InMemorySessionStore::new());
        let oracle = ScriptedOracle::new().with_error(OracleError::unavailable("down"));
        let orchestrator = orchestrator_with_store(oracle, store.clone());
        let id = session_id("s1");

        let outcome = orchestrator.handle_turn(&id, "hello").await.unwrap();

        assert_eq!(outcome.reply, ORACLE_RETRY_REPLY);
        // Nothing was saved: the retry turn left no trace.
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn extraction_failure_after_routing_discards_the_turn() {
        let store = Arc::new(InMemorySessionStore::new());
        let oracle = ScriptedOracle::new()
            .with_domain(Some(TravelDomain::Hotel))
            .with_error(OracleError::unavailable("down"));
        let orchestrator = orchestrator_with_store(oracle, store.clone());

        let outcome = orchestrator
            .handle_turn(&session_id("s1"), "hotel in Mumbai")
            .await
            .unwrap();

        assert_eq!(outcome.reply, ORACLE_RETRY_REPLY);
        assert!(store.is_empty());
    }

    /// Oracle whose extraction never resolves, for exercising the turn
    /// timeout.
    struct StalledOracle;

    #[async_trait::async_trait]
    impl crate::ports::ExtractionOracle for StalledOracle {
        async fn classify_domain(
            &self,
            _history: &[TurnMessage],
            _previous: Option<TravelDomain>,
        ) -> Result<Option<TravelDomain>, OracleError> {
            Ok(Some(TravelDomain::Flight))
        }

        async fn extract(
            &self,
            _spec: &crate::domain::booking::DomainSpec,
            _context: &BookingContext,
            _history: &[TurnMessage],
        ) -> Result<SlotExtraction, OracleError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn slow_turn_times_out_without_persisting() {
        let store = Arc::new(InMemorySessionStore::new());
        let oracle = Arc::new(StalledOracle);
        let orchestrator = TurnOrchestrator::new(
            store.clone(),
            DomainRouter::new(oracle.clone()),
            BookingFlowEngine::new(flight_spec(), oracle.clone(), Arc::new(MockFlightCatalog::new())),
            BookingFlowEngine::new(hotel_spec(), oracle, Arc::new(MockHotelCatalog::new())),
        )
        .with_turn_timeout(Duration::from_millis(10));

        let outcome = orchestrator
            .handle_turn(&session_id("s1"), "Delhi to Goa")
            .await
            .unwrap();

        assert_eq!(outcome.reply, ORACLE_RETRY_REPLY);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn session_locks_are_released_after_the_turn() {
        let oracle = ScriptedOracle::new()
            .with_domain(Some(TravelDomain::Flight))
            .with_domain(Some(TravelDomain::Hotel));
        let orchestrator = orchestrator(oracle);

        orchestrator.handle_turn(&session_id("a"), "hello").await.unwrap();
        orchestrator.handle_turn(&session_id("b"), "hello").await.unwrap();

        assert!(orchestrator.session_locks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn domain_switch_keeps_both_contexts_independent() {
        let store = Arc::new(InMemorySessionStore::new());
        let oracle = ScriptedOracle::new()
            // Turn 1: flight, partial slots.
            .with_domain(Some(TravelDomain::Flight))
            .with_extraction(SlotExtraction {
                slots: [("origin".to_string(), SlotValue::text("Delhi"))]
                    .into_iter()
                    .collect(),
                reply: "Where to?".to_string(),
                ..Default::default()
            })
            // Turn 2: switch to hotels.
            .with_domain(Some(TravelDomain::Hotel))
            .with_extraction(SlotExtraction {
                slots: [("city".to_string(), SlotValue::text("Mumbai"))]
                    .into_iter()
                    .collect(),
                reply: "When do you check in?".to_string(),
                ..Default::default()
            });
        let orchestrator = orchestrator_with_store(oracle, store.clone());
        let id = session_id("s1");

        orchestrator.handle_turn(&id, "flight from Delhi").await.unwrap();
        let outcome = orchestrator
            .handle_turn(&id, "actually, a hotel in Mumbai")
            .await
            .unwrap();

        assert_eq!(outcome.active_domain, Some(TravelDomain::Hotel));
        assert_eq!(outcome.flight.slot("origin"), Some(&SlotValue::text("Delhi")));
        assert_eq!(outcome.hotel.slot("city"), Some(&SlotValue::text("Mumbai")));
        assert_eq!(outcome.flight.flow_state, FlowState::Search);
    }

    #[tokio::test]
    async fn unclassified_follow_up_stays_in_active_domain() {
        let oracle = ScriptedOracle::new()
            .with_domain(Some(TravelDomain::Hotel))
            .with_extraction(SlotExtraction {
                reply: "Which city?".to_string(),
                ..Default::default()
            })
            .with_domain(None)
            .with_extraction(SlotExtraction {
                reply: "Got it, Mumbai.".to_string(),
                ..Default::default()
            });
        let orchestrator = orchestrator(oracle);
        let id = session_id("s1");

        orchestrator.handle_turn(&id, "I need a hotel").await.unwrap();
        let outcome = orchestrator.handle_turn(&id, "Mumbai").await.unwrap();

        assert_eq!(outcome.active_domain, Some(TravelDomain::Hotel));
        assert_eq!(outcome.reply, "Got it, Mumbai.");
    }

    #[tokio::test]
    async fn turns_accumulate_history_across_saves() {
        let store = Arc::new(InMemorySessionStore::new());
        let oracle = ScriptedOracle::new()
            .with_domain(Some(TravelDomain::Flight))
            .with_domain(Some(TravelDomain::Flight));
        let orchestrator = orchestrator_with_store(oracle, store.clone());
        let id = session_id("s1");

        orchestrator.handle_turn(&id, "first").await.unwrap();
        orchestrator.handle_turn(&id, "second").await.unwrap();

        let session = store.load(&id).await.unwrap();
        let contents: Vec<&str> = session.history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "Okay.", "second", "Okay."]);
    }
}
