//! Property-based tests for the serial reconciliation pass.
//!
//! Verifies invariants across arbitrary forms:
//! - Idempotence of repeated passes
//! - Post-conditions for satisfiable and unsatisfiable requests
//! - No duplicate serials in any outcome
//! - Prefix-preserving trims
//! - Attached serials only ever come from the original or available sets
//! - Direct mutations keep quantity in step with the list

use std::collections::HashSet;

use proptest::prelude::*;

use stockdesk_core::reconcile::candidate_serials;
use stockdesk_core::{reconcile, Quantity, ReconciliationState, SerialRecord};

// =============================================================================
// Proptest strategies
// =============================================================================

/// A serial number from a small universe so pools and attachments overlap.
fn arb_serial_no() -> impl Strategy<Value = String> {
    (0u32..24).prop_map(|n| format!("SN{:03}", n))
}

/// Attached serials: unique, in arbitrary order.
fn arb_current() -> impl Strategy<Value = Vec<SerialRecord>> {
    prop::collection::vec(arb_serial_no(), 0..8).prop_map(|list| {
        let mut seen = HashSet::new();
        list.into_iter()
            .filter(|s| seen.insert(s.clone()))
            .map(SerialRecord::new)
            .collect()
    })
}

/// Available pool: may repeat entries and overlap the attached list.
fn arb_available() -> impl Strategy<Value = Vec<SerialRecord>> {
    prop::collection::vec(arb_serial_no().prop_map(SerialRecord::new), 0..16)
}

fn arb_quantity() -> impl Strategy<Value = Quantity> {
    prop_oneof![
        1 => Just(Quantity::Unset),
        6 => (0u32..30).prop_map(Quantity::Count),
    ]
}

fn arb_from_serial() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), arb_serial_no()]
}

fn arb_state() -> impl Strategy<Value = ReconciliationState> {
    (arb_quantity(), arb_from_serial(), arb_current(), arb_available()).prop_map(
        |(quantity, from_serial, current_serials, available_serials)| ReconciliationState {
            quantity,
            from_serial,
            current_serials,
            available_serials,
        },
    )
}

fn total_available(state: &ReconciliationState) -> usize {
    state.current_serials.len() + candidate_serials(state).len()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn reconcile_is_deterministic(state in arb_state()) {
        prop_assert_eq!(reconcile(&state), reconcile(&state));
    }

    #[test]
    fn applying_twice_equals_applying_once(state in arb_state()) {
        let mut once = state.clone();
        let first = once.reconcile_in_place();

        let mut twice = once.clone();
        let second = twice.reconcile_in_place();

        prop_assert_eq!(first, second);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn satisfiable_request_is_met_exactly(state in arb_state()) {
        if let Some(requested) = state.quantity.count() {
            if requested as usize <= total_available(&state) {
                let outcome = reconcile(&state);
                prop_assert_eq!(outcome.serials.len(), requested as usize);
                prop_assert_eq!(outcome.quantity, Quantity::Count(requested));
                prop_assert!(outcome.warning.is_none());
            }
        }
    }

    #[test]
    fn unsatisfiable_request_takes_everything_and_warns(state in arb_state()) {
        if let Some(requested) = state.quantity.count() {
            let total = total_available(&state);
            if requested as usize > total {
                let outcome = reconcile(&state);
                prop_assert_eq!(outcome.serials.len(), total);
                prop_assert_eq!(outcome.quantity, Quantity::Count(requested));
                prop_assert!(outcome.warning.is_some());
            }
        }
    }

    #[test]
    fn outcome_never_repeats_a_serial(state in arb_state()) {
        let outcome = reconcile(&state);
        let unique: HashSet<&str> = outcome.serial_numbers().into_iter().collect();
        prop_assert_eq!(unique.len(), outcome.serials.len());
    }

    #[test]
    fn outcome_stays_within_known_serials(state in arb_state()) {
        let known: HashSet<&str> = state
            .current_serials
            .iter()
            .chain(state.available_serials.iter())
            .map(|s| s.serial_no.as_str())
            .collect();

        let outcome = reconcile(&state);
        for serial_no in outcome.serial_numbers() {
            prop_assert!(known.contains(serial_no));
        }
    }

    #[test]
    fn attached_serials_survive_as_prefix_or_are_trimmed_from_the_end(state in arb_state()) {
        let outcome = reconcile(&state);
        let kept = outcome.serials.len().min(state.current_serials.len());
        prop_assert_eq!(&outcome.serials[..kept], &state.current_serials[..kept]);
    }

    #[test]
    fn unset_quantity_changes_nothing(
        from_serial in arb_from_serial(),
        current_serials in arb_current(),
        available_serials in arb_available(),
    ) {
        let state = ReconciliationState {
            quantity: Quantity::Unset,
            from_serial,
            current_serials,
            available_serials,
        };
        let outcome = reconcile(&state);
        prop_assert_eq!(&outcome.serials, &state.current_serials);
        prop_assert!(outcome.warning.is_none());
    }

    #[test]
    fn manual_edits_keep_quantity_in_step(
        current_serials in arb_current(),
        extra in arb_serial_no(),
        victim in arb_serial_no(),
    ) {
        let mut state = ReconciliationState {
            quantity: Quantity::of_len(current_serials.len()),
            current_serials,
            ..Default::default()
        };

        state.add_serial(SerialRecord::new(extra));
        prop_assert_eq!(state.quantity, Quantity::of_len(state.current_serials.len()));

        state.remove_serial(&victim);
        prop_assert_eq!(state.quantity, Quantity::of_len(state.current_serials.len()));
    }
}

// =============================================================================
// Scenarios
// =============================================================================

fn records(list: &[&str]) -> Vec<SerialRecord> {
    list.iter().map(|s| SerialRecord::new(*s)).collect()
}

#[test]
fn scenario_trim_preserves_first_entries() {
    let state = ReconciliationState {
        quantity: Quantity::Count(2),
        current_serials: records(&["A", "B", "C", "D"]),
        ..Default::default()
    };

    let outcome = reconcile(&state);
    assert_eq!(outcome.serial_numbers(), vec!["A", "B"]);
}

#[test]
fn scenario_pool_from_inventory_json() {
    let json = r#"[
        {"serial_no": "SN1", "category_id": 3},
        {"serial_no": "SN2", "category_id": 3},
        {"serial_no": "SN3", "category_id": 3}
    ]"#;
    let available_serials: Vec<SerialRecord> = serde_json::from_str(json).unwrap();

    let state = ReconciliationState {
        quantity: Quantity::parse("2"),
        from_serial: "SN2".to_string(),
        current_serials: Vec::new(),
        available_serials,
    };

    let outcome = reconcile(&state);
    assert_eq!(outcome.serial_numbers(), vec!["SN2", "SN3"]);
    assert_eq!(outcome.quantity, Quantity::Count(2));
    assert_eq!(outcome.warning, None);
}
