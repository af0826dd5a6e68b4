//! Domain layer - Pure booking and routing logic.
//!
//! No I/O lives here; external collaborators (extraction oracle, catalogs,
//! session store) are reached only through the traits in `crate::ports`.

pub mod booking;
pub mod foundation;
pub mod routing;
pub mod session;
