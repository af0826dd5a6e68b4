//! Routing module.
//!
//! Decides, per turn, which domain workflow is active.

mod router;

pub use router::{DomainRouter, RouteOutcome};
