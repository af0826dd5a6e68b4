//! Catalog adapters - Mocked flight and hotel inventory services.
//!
//! These stand in for the remote inventory systems a production deployment
//! would call. Each search fabricates a fixed set of offerings with fresh
//! ids, matching how real inventory responses are only valid per search.

mod mock_flight;
mod mock_hotel;

pub use mock_flight::MockFlightCatalog;
pub use mock_hotel::MockHotelCatalog;
