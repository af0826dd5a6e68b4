//! Catalog search results.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OfferingId;

/// One catalog search result (a flight or hotel option).
///
/// Immutable once returned by a search. Identity is the `id`, which is
/// unique within one search response but not across searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    /// Stable id within the search response that produced this offering.
    pub id: OfferingId,
    /// Primary display name (airline or hotel name).
    pub title: String,
    /// Secondary display detail (departure time, room type).
    pub detail: String,
    /// Price in the catalog's currency (rupees in the reference catalogs).
    pub price: f64,
    /// Cancellation terms, shown when the user asks about refundability.
    pub cancellation_policy: String,
}

impl Offering {
    /// Creates a new offering.
    pub fn new(
        id: impl Into<OfferingId>,
        title: impl Into<String>,
        detail: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            detail: detail.into(),
            price,
            cancellation_policy: String::new(),
        }
    }

    /// Sets the cancellation policy.
    pub fn with_cancellation_policy(mut self, policy: impl Into<String>) -> Self {
        self.cancellation_policy = policy.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let offering = Offering::new("f1", "IndiGo", "11:30 AM", 3750.0)
            .with_cancellation_policy("Non-refundable");

        assert_eq!(offering.id.as_str(), "f1");
        assert_eq!(offering.title, "IndiGo");
        assert_eq!(offering.cancellation_policy, "Non-refundable");
    }
}
