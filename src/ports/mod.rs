//! Ports - Interfaces to external collaborators.
//!
//! The domain layer depends only on these traits; adapters provide the
//! concrete implementations (live oracle, mock catalogs, session stores).

mod catalog;
mod extraction_oracle;
mod session_store;

pub use catalog::{CatalogError, CatalogService};
pub use extraction_oracle::{ExtractionOracle, OracleError, SlotExtraction};
pub use session_store::{SessionStore, SessionStoreError};
