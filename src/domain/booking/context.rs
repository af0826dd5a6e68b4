//! Per-domain booking context.
//!
//! Holds everything one domain's flow has learned in a session: extracted
//! slots, the latest search results, the user's selection, and the flow
//! stage. All mutation goes through the operations here so the context
//! invariants hold after every turn:
//!
//! - a non-empty selection always references a member of the current results
//! - results are non-empty only from Verify onwards
//! - `confirmed` is set at most once and never unset

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OfferingId;

use super::{FlowState, Offering, SlotValue, SlotValues};

/// The state of one domain's booking flow within a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingContext {
    /// Current flow stage.
    pub flow_state: FlowState,
    /// Extracted search criteria, keyed by slot name.
    pub slots: SlotValues,
    /// Results of the most recent completed search for the current slots.
    pub results: Vec<Offering>,
    /// The user's selection from `results`, if any.
    pub selection_id: Option<OfferingId>,
    /// Free-form details supplied during the Book stage.
    pub transaction_details: Option<String>,
    /// True only after a successful finalize call. Never unset.
    pub confirmed: bool,
}

impl BookingContext {
    /// Creates an empty context in the Search stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidation pass: resets the flow if any locked slot is about to
    /// change value.
    ///
    /// For each locked slot, if `candidates` carries a new non-empty value
    /// that differs from the existing value, the flow falls back to Search
    /// with results and selection cleared. Comparison is always against the
    /// pre-turn value, so this must run before [`merge_candidates`].
    /// Runs regardless of the current stage, including Completed.
    ///
    /// Returns true if the reset fired.
    ///
    /// [`merge_candidates`]: Self::merge_candidates
    pub fn invalidate_if_changed(&mut self, locked: &[&str], candidates: &SlotValues) -> bool {
        let mut invalidated = false;
        for &name in locked {
            let candidate = match candidates.get(name) {
                Some(value) if !value.is_empty() => value,
                _ => continue,
            };
            match self.slots.get(name) {
                Some(existing) if existing != candidate => {
                    invalidated = true;
                }
                _ => {}
            }
        }

        if invalidated {
            self.reset_to_search();
        }
        invalidated
    }

    /// Merges candidate slot values into the context.
    ///
    /// Every non-empty candidate overwrites the corresponding slot; slots
    /// the oracle did not return are left untouched, so omission never
    /// clears a previously extracted value.
    pub fn merge_candidates(&mut self, candidates: &SlotValues) {
        for (name, value) in candidates.iter() {
            if !value.is_empty() {
                self.slots.set(name, value.clone());
            }
        }
    }

    /// Records a completed search: stores results and clears any stale
    /// selection so the selection invariant holds against the new set.
    pub fn record_results(&mut self, results: Vec<Offering>) {
        self.results = results;
        self.selection_id = None;
    }

    /// Records a selection if `id` is a member of the current results.
    ///
    /// Returns the selected offering, or `None` when the id is unknown
    /// (in which case nothing changes).
    pub fn select(&mut self, id: &OfferingId) -> Option<&Offering> {
        let position = self.results.iter().position(|offering| &offering.id == id)?;
        self.selection_id = Some(id.clone());
        Some(&self.results[position])
    }

    /// Returns the currently selected offering, if a selection is set.
    pub fn selected_offering(&self) -> Option<&Offering> {
        let id = self.selection_id.as_ref()?;
        self.results.iter().find(|offering| &offering.id == id)
    }

    /// Marks the booking finalized. Only meaningful in the Book stage;
    /// once set, `confirmed` stays true for the life of the context.
    pub fn mark_confirmed(&mut self) {
        self.confirmed = true;
    }

    /// Resets the flow to Search, clearing results and selection.
    ///
    /// Slots, transaction details, and the confirmed flag survive the
    /// reset: invalidation discards derived state, not extracted facts.
    pub fn reset_to_search(&mut self) {
        self.results.clear();
        self.selection_id = None;
        self.flow_state = FlowState::Search;
    }

    /// Extracts the value of a slot, if set.
    pub fn slot(&self, name: &str) -> Option<&SlotValue> {
        self.slots.get(name)
    }

    /// Checks the context invariants. Used by tests after every operation.
    pub fn invariants_hold(&self) -> bool {
        let selection_valid = match &self.selection_id {
            None => true,
            Some(id) => self.results.iter().any(|offering| &offering.id == id),
        };
        let results_placement = self.results.is_empty() || self.flow_state.holds_results();
        selection_valid && results_placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn offering(id: &str) -> Offering {
        Offering::new(OfferingId::new(id), "Test", "detail", 100.0)
    }

    fn candidates(pairs: &[(&str, &str)]) -> SlotValues {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), SlotValue::text(*value)))
            .collect()
    }

    mod invalidation {
        use super::*;

        const LOCKED: [&str; 2] = ["origin", "destination"];

        #[test]
        fn changed_locked_slot_resets_flow() {
            let mut ctx = BookingContext::new();
            ctx.slots.set("destination", SlotValue::text("Goa"));
            ctx.record_results(vec![offering("r1")]);
            ctx.flow_state = FlowState::Verify;

            let fired = ctx.invalidate_if_changed(&LOCKED, &candidates(&[("destination", "Pune")]));

            assert!(fired);
            assert_eq!(ctx.flow_state, FlowState::Search);
            assert!(ctx.results.is_empty());
            assert!(ctx.selection_id.is_none());
        }

        #[test]
        fn unset_locked_slot_does_not_fire() {
            let mut ctx = BookingContext::new();
            ctx.flow_state = FlowState::Verify;
            ctx.results = vec![offering("r1")];

            let fired = ctx.invalidate_if_changed(&LOCKED, &candidates(&[("origin", "Delhi")]));

            assert!(!fired);
            assert_eq!(ctx.flow_state, FlowState::Verify);
            assert_eq!(ctx.results.len(), 1);
        }

        #[test]
        fn same_value_does_not_fire() {
            let mut ctx = BookingContext::new();
            ctx.slots.set("origin", SlotValue::text("Delhi"));
            ctx.flow_state = FlowState::Book;

            let fired = ctx.invalidate_if_changed(&LOCKED, &candidates(&[("origin", "Delhi")]));

            assert!(!fired);
            assert_eq!(ctx.flow_state, FlowState::Book);
        }

        #[test]
        fn unlocked_slot_change_does_not_fire() {
            let mut ctx = BookingContext::new();
            ctx.slots.set("passengers", SlotValue::Count(2));
            ctx.flow_state = FlowState::Verify;
            ctx.results = vec![offering("r1")];

            let mut updates = SlotValues::new();
            updates.set("passengers", SlotValue::Count(4));
            let fired = ctx.invalidate_if_changed(&LOCKED, &updates);

            assert!(!fired);
            assert_eq!(ctx.flow_state, FlowState::Verify);
        }

        #[test]
        fn fires_even_from_completed() {
            let mut ctx = BookingContext::new();
            ctx.slots.set("origin", SlotValue::text("Delhi"));
            ctx.flow_state = FlowState::Completed;
            ctx.confirmed = true;

            let fired = ctx.invalidate_if_changed(&LOCKED, &candidates(&[("origin", "Mumbai")]));

            assert!(fired);
            assert_eq!(ctx.flow_state, FlowState::Search);
            // confirmed is terminal and survives the reset
            assert!(ctx.confirmed);
        }

        #[test]
        fn empty_candidate_value_is_ignored() {
            let mut ctx = BookingContext::new();
            ctx.slots.set("origin", SlotValue::text("Delhi"));
            ctx.flow_state = FlowState::Verify;
            ctx.results = vec![offering("r1")];

            let fired = ctx.invalidate_if_changed(&LOCKED, &candidates(&[("origin", "  ")]));

            assert!(!fired);
            assert_eq!(ctx.flow_state, FlowState::Verify);
        }
    }

    mod slot_merge {
        use super::*;

        #[test]
        fn non_empty_candidates_overwrite() {
            let mut ctx = BookingContext::new();
            ctx.slots.set("origin", SlotValue::text("Delhi"));

            ctx.merge_candidates(&candidates(&[("origin", "Mumbai"), ("destination", "Goa")]));

            assert_eq!(ctx.slot("origin"), Some(&SlotValue::text("Mumbai")));
            assert_eq!(ctx.slot("destination"), Some(&SlotValue::text("Goa")));
        }

        #[test]
        fn omission_never_clears() {
            let mut ctx = BookingContext::new();
            ctx.slots.set("origin", SlotValue::text("Delhi"));

            ctx.merge_candidates(&candidates(&[("destination", "Goa")]));

            assert_eq!(ctx.slot("origin"), Some(&SlotValue::text("Delhi")));
        }

        #[test]
        fn empty_text_candidate_is_skipped() {
            let mut ctx = BookingContext::new();
            ctx.slots.set("origin", SlotValue::text("Delhi"));

            ctx.merge_candidates(&candidates(&[("origin", "")]));

            assert_eq!(ctx.slot("origin"), Some(&SlotValue::text("Delhi")));
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn select_accepts_member_of_results() {
            let mut ctx = BookingContext::new();
            ctx.record_results(vec![offering("r1"), offering("r2")]);

            let selected = ctx.select(&OfferingId::new("r2"));

            assert!(selected.is_some());
            assert_eq!(ctx.selection_id, Some(OfferingId::new("r2")));
        }

        #[test]
        fn select_rejects_unknown_id() {
            let mut ctx = BookingContext::new();
            ctx.record_results(vec![offering("r1"), offering("r2")]);

            let selected = ctx.select(&OfferingId::new("r9"));

            assert!(selected.is_none());
            assert!(ctx.selection_id.is_none());
        }

        #[test]
        fn record_results_clears_previous_selection() {
            let mut ctx = BookingContext::new();
            ctx.record_results(vec![offering("r1")]);
            ctx.select(&OfferingId::new("r1"));

            ctx.record_results(vec![offering("r3")]);

            assert!(ctx.selection_id.is_none());
        }

        #[test]
        fn selected_offering_resolves_through_results() {
            let mut ctx = BookingContext::new();
            ctx.record_results(vec![offering("r1"), offering("r2")]);
            ctx.select(&OfferingId::new("r1"));

            assert_eq!(ctx.selected_offering().unwrap().id.as_str(), "r1");
        }
    }

    // Random interleavings of context operations must never break the
    // selection and results-placement invariants.
    mod invariant_properties {
        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Invalidate(String),
            Merge(String, String),
            Record(Vec<String>),
            Select(String),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            let name = prop_oneof![Just("origin".to_string()), Just("destination".to_string())];
            let value = "[a-z]{1,6}";
            let id = "[a-z][0-9]";
            prop_oneof![
                name.clone().prop_map(Op::Invalidate),
                (name, value).prop_map(|(n, v)| Op::Merge(n, v)),
                proptest::collection::vec(id.clone(), 0..4).prop_map(Op::Record),
                id.prop_map(Op::Select),
            ]
        }

        proptest! {
            #[test]
            fn operations_preserve_invariants(ops in proptest::collection::vec(op_strategy(), 0..40)) {
                let locked = ["origin", "destination"];
                let mut ctx = BookingContext::new();

                for op in ops {
                    match op {
                        Op::Invalidate(name) => {
                            let mut c = SlotValues::new();
                            c.set(name, SlotValue::text("changed"));
                            if ctx.invalidate_if_changed(&locked, &c) {
                                // engine merges after an invalidation too
                                ctx.merge_candidates(&c);
                            }
                        }
                        Op::Merge(name, value) => {
                            let mut c = SlotValues::new();
                            c.set(name, SlotValue::text(value));
                            ctx.merge_candidates(&c);
                        }
                        Op::Record(ids) => {
                            ctx.record_results(ids.iter().map(|id| offering(id)).collect());
                            if !ctx.results.is_empty() {
                                ctx.flow_state = FlowState::Verify;
                            }
                        }
                        Op::Select(id) => {
                            ctx.select(&OfferingId::new(id));
                        }
                    }
                    prop_assert!(ctx.invariants_hold());
                }
            }
        }
    }
}
