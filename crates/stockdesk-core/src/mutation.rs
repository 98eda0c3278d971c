//! # Mutation Module
//!
//! Direct edits of the attached serial list, made by the user on the chips
//! rather than by a reconciliation pass.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User Action              Method                  Quantity              │
//! │  ───────────              ──────                  ────────              │
//! │  Pick from picker ──────► add_serial()     ─────► = serials.len()       │
//! │  Click chip ✕ ──────────► remove_serial()  ─────► = serials.len()       │
//! │  Edit chip text ────────► rename_serial()  ─────► unchanged             │
//! │  Edit remark (edit form)► set_remark()     ─────► unchanged             │
//! │  Edit QC (edit form) ───► set_quality_check() ──► unchanged             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method is total. The return value says whether anything changed.
//! None of them trigger a reconciliation pass.

use crate::types::{Quantity, ReconciliationState, SerialRecord};

impl ReconciliationState {
    /// Appends a serial unless one with the same number is already attached.
    ///
    /// Re-adding a removed serial puts it at the end, not back in its old slot.
    pub fn add_serial(&mut self, serial: SerialRecord) -> bool {
        if self.contains_serial(&serial.serial_no) {
            return false;
        }

        self.current_serials.push(serial);
        self.sync_quantity();
        true
    }

    /// Removes the serial with this number and syncs the quantity.
    pub fn remove_serial(&mut self, serial_no: &str) -> bool {
        let before = self.current_serials.len();
        self.current_serials.retain(|s| !s.is(serial_no));
        self.sync_quantity();
        self.current_serials.len() != before
    }

    /// Replaces the serial number at `index` in place.
    ///
    /// Count is unchanged. Duplicates created here are caught at submission.
    pub fn rename_serial(&mut self, index: usize, new_value: impl Into<String>) -> bool {
        match self.current_serials.get_mut(index) {
            Some(record) => {
                record.serial_no = new_value.into();
                true
            }
            None => false,
        }
    }

    /// Sets the remark of the serial at `index`. Blank clears it.
    pub fn set_remark(&mut self, index: usize, remark: &str) -> bool {
        match self.current_serials.get_mut(index) {
            Some(record) => {
                record.remark = non_blank(remark);
                true
            }
            None => false,
        }
    }

    /// Sets the quality check result of the serial at `index`. Blank clears it.
    pub fn set_quality_check(&mut self, index: usize, quality_check: &str) -> bool {
        match self.current_serials.get_mut(index) {
            Some(record) => {
                record.quality_check = non_blank(quality_check);
                true
            }
            None => false,
        }
    }

    fn sync_quantity(&mut self) {
        self.quantity = Quantity::of_len(self.current_serials.len());
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(list: &[&str]) -> ReconciliationState {
        ReconciliationState {
            quantity: Quantity::of_len(list.len()),
            current_serials: list.iter().map(|s| SerialRecord::new(*s)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_remove_then_readd_appends() {
        let mut state = attached(&["SN1", "SN2", "SN3"]);

        assert!(state.remove_serial("SN2"));
        assert_eq!(state.serial_numbers(), vec!["SN1", "SN3"]);
        assert_eq!(state.quantity, Quantity::Count(2));

        assert!(state.add_serial(SerialRecord::new("SN2")));
        assert_eq!(state.serial_numbers(), vec!["SN1", "SN3", "SN2"]);
        assert_eq!(state.quantity, Quantity::Count(3));
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut state = attached(&["SN1"]);
        state.quantity = Quantity::Count(4);

        assert!(!state.add_serial(SerialRecord::new("SN1")));
        assert_eq!(state.serial_numbers(), vec!["SN1"]);
        assert_eq!(state.quantity, Quantity::Count(4));
    }

    #[test]
    fn test_add_sets_quantity_from_unset() {
        let mut state = ReconciliationState::new();

        state.add_serial(SerialRecord::new("SN7"));
        assert_eq!(state.quantity, Quantity::Count(1));
    }

    #[test]
    fn test_remove_missing_still_syncs_quantity() {
        let mut state = attached(&["SN1", "SN2"]);
        state.quantity = Quantity::Count(9);

        assert!(!state.remove_serial("SN5"));
        assert_eq!(state.quantity, Quantity::Count(2));
    }

    #[test]
    fn test_rename_keeps_count() {
        let mut state = attached(&["SN1", "SN2"]);

        assert!(state.rename_serial(1, "SN20"));
        assert_eq!(state.serial_numbers(), vec!["SN1", "SN20"]);
        assert_eq!(state.quantity, Quantity::Count(2));

        assert!(!state.rename_serial(5, "SN99"));
        assert_eq!(state.serial_numbers(), vec!["SN1", "SN20"]);
    }

    #[test]
    fn test_edit_only_fields() {
        let mut state = attached(&["SN1"]);

        assert!(state.set_remark(0, " scratched casing "));
        assert!(state.set_quality_check(0, "passed"));
        assert_eq!(state.current_serials[0].remark.as_deref(), Some("scratched casing"));
        assert_eq!(state.current_serials[0].quality_check.as_deref(), Some("passed"));

        assert!(state.set_remark(0, "  "));
        assert_eq!(state.current_serials[0].remark, None);

        assert!(!state.set_quality_check(3, "failed"));
    }
}
