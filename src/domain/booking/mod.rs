//! Booking domain module.
//!
//! One generic slot-filling state machine drives every booking workflow:
//! collect search criteria, search a catalog, verify a selection, finalize.
//! Per-domain differences (slot names, locked slots, reply wording) live in
//! a `DomainSpec` configuration record, not in bespoke per-domain code.

mod context;
mod engine;
mod flow_state;
mod offering;
mod slots;
mod spec;

pub use context::BookingContext;
pub use engine::{BookingFlowEngine, FlowError};
pub use flow_state::FlowState;
pub use offering::Offering;
pub use slots::{SlotValue, SlotValues};
pub use spec::{flight_spec, hotel_spec, DomainSpec, SlotSpec};
