//! Per-domain configuration for the booking flow engine.
//!
//! The engine itself is domain-agnostic; everything that differs between
//! flights and hotels (slot names, which slots invalidate on change, how
//! replies are worded) is declared here as data and callbacks.

use crate::domain::foundation::TravelDomain;

use super::Offering;

/// One named piece of search criteria the oracle should extract.
#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    /// Slot name used in the context map and oracle prompts.
    pub name: &'static str,
    /// Human-readable description, embedded in the extraction prompt.
    pub description: &'static str,
    /// Whether changing this slot after it is set invalidates prior
    /// results and selection.
    pub locked: bool,
    /// Whether the oracle should extract this slot as a number.
    pub numeric: bool,
}

/// Configuration record parameterizing the generic booking flow for one
/// domain: required slots, locked subset, and reply formatting.
#[derive(Clone)]
pub struct DomainSpec {
    /// The domain this spec configures.
    pub domain: TravelDomain,
    /// Ordered list of required search slots.
    pub slots: &'static [SlotSpec],
    /// Heading line above a formatted result listing.
    pub results_heading: &'static str,
    /// Formats one offering line in a result listing.
    pub format_offering: fn(&Offering) -> String,
    /// Confirmation-of-selection prompt asking for finalize-time details.
    pub selection_prompt: fn(&Offering) -> String,
    /// Reply once the finalize call succeeds.
    pub confirmation_message: &'static str,
    /// Reply when the finalize call fails (flow stays in Book).
    pub finalize_retry_message: &'static str,
    /// Reply when the catalog search fails (flow stays in Search).
    pub search_retry_message: &'static str,
    /// Reply when a search completes with no offerings.
    pub no_results_message: &'static str,
    /// Reply when the user tries to book again after completion.
    pub already_booked_message: &'static str,
}

impl DomainSpec {
    /// Names of all required slots, in spec order.
    pub fn required_slot_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.name)
    }

    /// Names of the locked slots (the invalidation triggers).
    pub fn locked_slot_names(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|slot| slot.locked)
            .map(|slot| slot.name)
            .collect()
    }

    /// Formats the full result listing: heading, one line per offering,
    /// and a selection prompt.
    pub fn format_results(&self, results: &[Offering]) -> String {
        let lines: Vec<String> = results.iter().map(|o| (self.format_offering)(o)).collect();
        format!(
            "{}\n{}\nWhich one would you like to select?",
            self.results_heading,
            lines.join("\n")
        )
    }
}

impl std::fmt::Debug for DomainSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainSpec")
            .field("domain", &self.domain)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

const FLIGHT_SLOTS: [SlotSpec; 4] = [
    SlotSpec {
        name: "origin",
        description: "Departure city",
        locked: true,
        numeric: false,
    },
    SlotSpec {
        name: "destination",
        description: "Arrival city",
        locked: true,
        numeric: false,
    },
    SlotSpec {
        name: "travel_dates",
        description: "Dates of travel",
        locked: true,
        numeric: false,
    },
    SlotSpec {
        name: "passengers",
        description: "Number of passengers",
        locked: false,
        numeric: true,
    },
];

const HOTEL_SLOTS: [SlotSpec; 4] = [
    SlotSpec {
        name: "city",
        description: "City for hotel stay",
        locked: true,
        numeric: false,
    },
    SlotSpec {
        name: "check_in",
        description: "Check-in date",
        locked: true,
        numeric: false,
    },
    SlotSpec {
        name: "check_out",
        description: "Check-out date",
        locked: true,
        numeric: false,
    },
    SlotSpec {
        name: "guests",
        description: "Number of guests",
        locked: false,
        numeric: true,
    },
];

/// The flight booking flow configuration.
pub fn flight_spec() -> DomainSpec {
    DomainSpec {
        domain: TravelDomain::Flight,
        slots: &FLIGHT_SLOTS,
        results_heading: "Here are the flights I found:",
        format_offering: |o| format!("- {}: {}, {}, ₹{}", o.id, o.title, o.detail, o.price),
        selection_prompt: |o| {
            format!(
                "Great, you selected {} for ₹{}. To book, please provide the passenger names.",
                o.title, o.price
            )
        },
        confirmation_message:
            "Booking confirmed! Simulating payment success. Your flight is booked. How else can I help?",
        finalize_retry_message:
            "I couldn't complete the flight booking just now. Please try again in a moment.",
        search_retry_message:
            "I couldn't reach the flight search service just now. Please try again in a moment.",
        no_results_message:
            "I couldn't find any flights for those criteria. Try different dates or cities.",
        already_booked_message:
            "This flight is already booked. Change the route or dates if you'd like a new search.",
    }
}

/// The hotel booking flow configuration.
pub fn hotel_spec() -> DomainSpec {
    DomainSpec {
        domain: TravelDomain::Hotel,
        slots: &HOTEL_SLOTS,
        results_heading: "Here are the hotels I found:",
        format_offering: |o| format!("- {}: {}, {}, ₹{}/night", o.id, o.title, o.detail, o.price),
        selection_prompt: |o| {
            format!(
                "Great, you selected {} for ₹{}/night. To book, please provide the guest details.",
                o.title, o.price
            )
        },
        confirmation_message:
            "Booking confirmed! Simulating payment success. Your hotel is booked. How else can I help?",
        finalize_retry_message:
            "I couldn't complete the hotel booking just now. Please try again in a moment.",
        search_retry_message:
            "I couldn't reach the hotel search service just now. Please try again in a moment.",
        no_results_message:
            "I couldn't find any hotels for those criteria. Try different dates or another city.",
        already_booked_message:
            "This hotel is already booked. Change the city or dates if you'd like a new search.",
    }
}
