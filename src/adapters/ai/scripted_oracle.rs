//! Scripted extraction oracle for testing.
//!
//! Provides a configurable implementation of the ExtractionOracle port,
//! allowing tests to run without calling a real model.
//!
//! # Features
//!
//! - Pre-configured classifications and extractions (consumed in order)
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let oracle = ScriptedOracle::new()
//!     .with_domain(Some(TravelDomain::Flight))
//!     .with_extraction(SlotExtraction { reply: "From where?".into(), ..Default::default() });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::booking::{BookingContext, DomainSpec};
use crate::domain::foundation::{TravelDomain, TurnMessage};
use crate::ports::{ExtractionOracle, OracleError, SlotExtraction};

/// Scripted oracle for tests.
///
/// Classification and extraction responses queue independently; each call
/// consumes the next entry of its queue, falling back to a neutral
/// response when the queue is empty.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    classifications: Arc<Mutex<VecDeque<Result<Option<TravelDomain>, OracleError>>>>,
    extractions: Arc<Mutex<VecDeque<Result<SlotExtraction, OracleError>>>>,
    classify_calls: Arc<Mutex<usize>>,
    extract_calls: Arc<Mutex<Vec<TravelDomain>>>,
}

impl ScriptedOracle {
    /// Creates a scripted oracle with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a classification result.
    pub fn with_domain(self, domain: Option<TravelDomain>) -> Self {
        self.classifications.lock().unwrap().push_back(Ok(domain));
        self
    }

    /// Queues an extraction result.
    pub fn with_extraction(self, extraction: SlotExtraction) -> Self {
        self.extractions.lock().unwrap().push_back(Ok(extraction));
        self
    }

    /// Queues the same error for whichever call comes next.
    pub fn with_error(self, error: OracleError) -> Self {
        self.classifications
            .lock()
            .unwrap()
            .push_back(Err(error.clone()));
        self.extractions.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of classification calls made.
    pub fn classify_call_count(&self) -> usize {
        *self.classify_calls.lock().unwrap()
    }

    /// Domains the extraction calls were made for, in order.
    pub fn extract_call_domains(&self) -> Vec<TravelDomain> {
        self.extract_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionOracle for ScriptedOracle {
    async fn classify_domain(
        &self,
        _history: &[TurnMessage],
        previous: Option<TravelDomain>,
    ) -> Result<Option<TravelDomain>, OracleError> {
        *self.classify_calls.lock().unwrap() += 1;
        self.classifications
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(previous))
    }

    async fn extract(
        &self,
        spec: &DomainSpec,
        _context: &BookingContext,
        _history: &[TurnMessage],
    ) -> Result<SlotExtraction, OracleError> {
        self.extract_calls.lock().unwrap().push(spec.domain);
        self.extractions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(SlotExtraction {
                    reply: "Okay.".to_string(),
                    ..Default::default()
                })
            })
    }
}
