//! Mock hotel inventory.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::booking::{Offering, SlotValues};
use crate::domain::foundation::OfferingId;
use crate::ports::{CatalogError, CatalogService};

/// Mocked hotel catalog returning a fixed set of properties.
#[derive(Debug, Clone, Default)]
pub struct MockHotelCatalog;

impl MockHotelCatalog {
    pub fn new() -> Self {
        Self
    }

    fn offering_id() -> OfferingId {
        let raw = Uuid::new_v4().to_string();
        OfferingId::new(&raw[..8])
    }
}

#[async_trait]
impl CatalogService for MockHotelCatalog {
    async fn search(&self, criteria: &SlotValues) -> Result<Vec<Offering>, CatalogError> {
        info!(
            city = %criteria.get("city").map(ToString::to_string).unwrap_or_default(),
            "searching hotels"
        );

        Ok(vec![
            Offering::new(Self::offering_id(), "Taj Palace Hotel", "Luxury Suite", 15500.0)
                .with_cancellation_policy("Free cancellation 48h prior to check-in."),
            Offering::new(Self::offering_id(), "Lemon Tree Hotel", "Standard Room", 4500.0)
                .with_cancellation_policy("Free cancellation 48h prior to check-in."),
            Offering::new(Self::offering_id(), "The Leela Palace", "Royal Club Parlour", 22000.0)
                .with_cancellation_policy("Non-refundable within 7 days of check-in."),
        ])
    }

    async fn finalize(&self, selection: &OfferingId, details: &str) -> Result<(), CatalogError> {
        info!(offering = %selection, %details, "finalizing hotel booking");
        Ok(())
    }
}
