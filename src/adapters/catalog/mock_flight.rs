//! Mock flight inventory.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::booking::{Offering, SlotValues};
use crate::domain::foundation::OfferingId;
use crate::ports::{CatalogError, CatalogService};

/// Mocked flight catalog returning a fixed set of airlines.
///
/// Offering ids are freshly generated per search, so a selection made
/// against an earlier result set never matches a later one.
#[derive(Debug, Clone, Default)]
pub struct MockFlightCatalog;

impl MockFlightCatalog {
    pub fn new() -> Self {
        Self
    }

    fn offering_id() -> OfferingId {
        let raw = Uuid::new_v4().to_string();
        OfferingId::new(&raw[..8])
    }
}

#[async_trait]
impl CatalogService for MockFlightCatalog {
    async fn search(&self, criteria: &SlotValues) -> Result<Vec<Offering>, CatalogError> {
        info!(
            origin = %criteria.get("origin").map(ToString::to_string).unwrap_or_default(),
            destination = %criteria.get("destination").map(ToString::to_string).unwrap_or_default(),
            "searching flights"
        );

        Ok(vec![
            Offering::new(Self::offering_id(), "Air India", "08:00 AM", 6000.0)
                .with_cancellation_policy("Refundable up to 24h before departure."),
            Offering::new(Self::offering_id(), "IndiGo", "11:30 AM", 3900.0)
                .with_cancellation_policy("Non-refundable"),
            Offering::new(Self::offering_id(), "Vistara", "06:00 PM", 8250.0)
                .with_cancellation_policy("Refundable up to 24h before departure."),
        ])
    }

    async fn finalize(&self, selection: &OfferingId, details: &str) -> Result<(), CatalogError> {
        info!(offering = %selection, %details, "finalizing flight booking");
        Ok(())
    }
}
