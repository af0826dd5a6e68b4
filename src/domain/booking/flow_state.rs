//! Booking flow state machine.
//!
//! Defines the stages of a single domain's booking conversation and the
//! valid transitions between them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The stage of a single domain's booking conversation.
///
/// The flow moves forward one stage at a time:
/// - `Search`: collecting search criteria, searching the catalog
/// - `Verify`: results presented, awaiting a selection
/// - `Book`: selection made, awaiting finalize-time details
/// - `Completed`: booking finalized, open-ended follow-up only
///
/// Any stage can fall back to `Search` when a locked search criterion
/// changes after having been set (invalidation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Gathering required slots; searches fire once all are present.
    #[default]
    Search,

    /// Search results shown, waiting for the user to pick one.
    Verify,

    /// Offering selected, waiting for transaction details.
    Book,

    /// Booking finalized. Conversation continues but the flow is done.
    Completed,
}

impl FlowState {
    /// Returns true if search results may be held in this state.
    ///
    /// Results only exist from Verify onwards; in Search they are always
    /// empty (either never populated or cleared by invalidation).
    pub fn holds_results(&self) -> bool {
        !matches!(self, Self::Search)
    }

    /// Returns true if the booking has been finalized.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl StateMachine for FlowState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use FlowState::*;
        matches!(
            (self, target),
            // All slots present, search succeeded
            (Search, Verify) |
            // Valid selection made from current results
            (Verify, Book) |
            // Finalize call succeeded
            (Book, Completed) |
            // Invalidation: a locked slot changed after being set
            (Verify, Search) | (Book, Search) | (Completed, Search)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use FlowState::*;
        match self {
            Search => vec![Verify],
            Verify => vec![Book, Search],
            Book => vec![Completed, Search],
            Completed => vec![Search],
        }
    }
}
