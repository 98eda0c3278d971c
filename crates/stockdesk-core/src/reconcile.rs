//! # Reconcile Module
//!
//! The quantity/availability reconciliation pass run by sale forms whenever
//! the quantity, the from-serial filter or the available pool changes.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reconcile(state)                                                       │
//! │                                                                         │
//! │  quantity unset? ──yes──► serials unchanged, no warning                 │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  pool       = available filtered by serial_no >= from_serial            │
//! │  candidates = pool - current (by serial_no)                             │
//! │  total      = current.len() + candidates.len()                          │
//! │       │                                                                 │
//! │       ├── quantity > total  ──► append ALL candidates, keep quantity,   │
//! │       │                         warning "Only {total} ..."              │
//! │       │                                                                 │
//! │       ├── current > quantity ──► keep first `quantity` (prefix trim)    │
//! │       ├── current < quantity ──► append candidates in pool order        │
//! │       └── current = quantity ──► unchanged                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The from-serial filter only narrows the candidate pool. Serials already
//! attached stay attached even when they sort below the filter.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::StockWarning;
use crate::types::{Quantity, ReconciliationState, SerialRecord};
use crate::FIRST_SERIAL_LABEL;

// =============================================================================
// Outcome
// =============================================================================

/// Result of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    /// The serials that should now be attached, in commit order.
    pub serials: Vec<SerialRecord>,

    /// The quantity the form should show. Equals `serials.len()` except when
    /// `warning` is set, where it stays at the requested value.
    #[ts(type = "number | null")]
    pub quantity: Quantity,

    /// Human-readable shortfall message, if the request could not be met.
    pub warning: Option<String>,
}

impl ReconcileOutcome {
    /// Returns the serial numbers in order.
    pub fn serial_numbers(&self) -> Vec<&str> {
        self.serials.iter().map(|s| s.serial_no.as_str()).collect()
    }

    /// Returns true if the pass could not satisfy the requested quantity.
    pub fn is_short(&self) -> bool {
        self.warning.is_some()
    }
}

// =============================================================================
// Reconcile
// =============================================================================

/// Runs one reconciliation pass.
///
/// Pure and total: never panics, never errors. A pool that is too small is
/// reported through [`ReconcileOutcome::warning`].
///
/// ## Example
/// ```rust
/// use stockdesk_core::{reconcile, Quantity, ReconciliationState, SerialRecord};
///
/// let state = ReconciliationState {
///     quantity: Quantity::Count(5),
///     available_serials: vec![SerialRecord::new("SN1")],
///     ..Default::default()
/// };
///
/// let outcome = reconcile(&state);
/// assert_eq!(outcome.serial_numbers(), vec!["SN1"]);
/// assert_eq!(outcome.quantity, Quantity::Count(5));
/// assert!(outcome.warning.unwrap().contains("Only 1"));
/// ```
pub fn reconcile(state: &ReconciliationState) -> ReconcileOutcome {
    let mut serials = attached_serials(state);

    let Some(requested) = state.quantity.count() else {
        return ReconcileOutcome {
            serials,
            quantity: Quantity::Unset,
            warning: None,
        };
    };

    let candidates = candidate_serials(state);
    let attached = serials.len();
    let total_available = attached + candidates.len();
    let wanted = requested as usize;

    if wanted > total_available {
        serials.extend(candidates.into_iter().cloned());

        let warning = StockWarning::InsufficientSerials {
            available: total_available,
            from: from_label(&state.from_serial).to_string(),
            requested,
        };

        return ReconcileOutcome {
            serials,
            quantity: state.quantity,
            warning: Some(warning.to_string()),
        };
    }

    if attached > wanted {
        serials.truncate(wanted);
    } else if attached < wanted {
        serials.extend(candidates.into_iter().take(wanted - attached).cloned());
    }

    ReconcileOutcome {
        quantity: Quantity::of_len(serials.len()),
        serials,
        warning: None,
    }
}

/// Returns the serials a pass may append, in fill priority order.
///
/// The available pool narrowed by the from-serial filter, minus anything
/// already attached, with repeated entries collapsed to their first
/// occurrence.
pub fn candidate_serials(state: &ReconciliationState) -> Vec<&SerialRecord> {
    let mut seen: HashSet<&str> = state
        .current_serials
        .iter()
        .map(|s| s.serial_no.as_str())
        .collect();

    state
        .available_serials
        .iter()
        .filter(|s| passes_from_filter(&s.serial_no, &state.from_serial))
        .filter(|s| seen.insert(s.serial_no.as_str()))
        .collect()
}

/// Lexicographic lower bound. An empty filter lets everything through.
#[inline]
fn passes_from_filter(serial_no: &str, from_serial: &str) -> bool {
    from_serial.is_empty() || serial_no >= from_serial
}

fn from_label(from_serial: &str) -> &str {
    if from_serial.is_empty() {
        FIRST_SERIAL_LABEL
    } else {
        from_serial
    }
}

/// Attached serials with repeats dropped (first occurrence kept).
fn attached_serials(state: &ReconciliationState) -> Vec<SerialRecord> {
    let mut seen = HashSet::new();
    state
        .current_serials
        .iter()
        .filter(|s| seen.insert(s.serial_no.as_str()))
        .cloned()
        .collect()
}

impl ReconciliationState {
    /// Writes an outcome back into the state.
    ///
    /// The available pool and the filter are left as they are.
    pub fn apply(&mut self, outcome: &ReconcileOutcome) {
        self.current_serials = outcome.serials.clone();
        self.quantity = outcome.quantity;
    }

    /// Reconciles and applies in one step, returning the outcome.
    pub fn reconcile_in_place(&mut self) -> ReconcileOutcome {
        let outcome = reconcile(self);
        self.apply(&outcome);
        outcome
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
