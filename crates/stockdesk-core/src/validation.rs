//! # Validation Module
//!
//! Submission rules for sale serial forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Reconcile pass (while typing)                                │
//! │  └── Shortfall shown as a warning, never blocks input                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submit (THIS MODULE)                                         │
//! │  ├── Quantity present and in range                                     │
//! │  ├── Every serial well-formed                                          │
//! │  ├── No duplicates (chip renames can create them)                      │
//! │  └── Quantity covered, when the policy requires it                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST backend                                                 │
//! │  └── Serial ownership, stock status, uniqueness across sales           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockdesk_core::validation::{validate_serial_no, validate_submission};
//! use stockdesk_core::{ReconciliationState, SerialRecord, SubmissionPolicy};
//!
//! validate_serial_no("SN000123", 64).unwrap();
//!
//! let mut state = ReconciliationState::new();
//! state.add_serial(SerialRecord::new("SN1"));
//! validate_submission(&state, &SubmissionPolicy::default()).unwrap();
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::types::{Quantity, ReconciliationState};
use crate::{MAX_SALE_QUANTITY, MAX_SERIAL_LEN};

// =============================================================================
// Policy
// =============================================================================

/// Business rules applied when a sale form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPolicy {
    /// Block submission while the attached serials fall short of the quantity.
    pub require_full_quantity: bool,

    /// Largest quantity accepted on one sale line.
    pub max_quantity: u32,

    /// Longest serial number accepted.
    pub max_serial_len: usize,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        SubmissionPolicy {
            require_full_quantity: true,
            max_quantity: MAX_SALE_QUANTITY,
            max_serial_len: MAX_SERIAL_LEN,
        }
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a single serial number.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most `max_len` characters
/// - No whitespace inside
///
/// ## Example
/// ```rust
/// use stockdesk_core::validation::validate_serial_no;
///
/// assert!(validate_serial_no("SN-0042", 64).is_ok());
/// assert!(validate_serial_no("", 64).is_err());
/// assert!(validate_serial_no("SN 42", 64).is_err());
/// ```
pub fn validate_serial_no(serial_no: &str, max_len: usize) -> ValidationResult<()> {
    let serial_no = serial_no.trim();

    if serial_no.is_empty() {
        return Err(ValidationError::Required {
            field: "serial_no".to_string(),
        });
    }

    if serial_no.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field: "serial_no".to_string(),
            max: max_len,
        });
    }

    if serial_no.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "serial_no".to_string(),
            reason: format!("'{}' must not contain whitespace", serial_no),
        });
    }

    Ok(())
}

/// Validates the quantity field for submission.
///
/// ## Rules
/// - Must be set
/// - Must be between 1 and `max`
pub fn validate_quantity(quantity: Quantity, max: u32) -> ValidationResult<u32> {
    let count = quantity.count().ok_or_else(|| ValidationError::Required {
        field: "quantity".to_string(),
    })?;

    if count == 0 || count > max {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(max),
        });
    }

    Ok(count)
}

// =============================================================================
// Form Validator
// =============================================================================

/// Validates a whole serial form before it is sent to the backend.
///
/// Returns the first rule that fails.
pub fn validate_submission(
    state: &ReconciliationState,
    policy: &SubmissionPolicy,
) -> ValidationResult<()> {
    let requested = validate_quantity(state.quantity, policy.max_quantity)?;

    let mut seen = HashSet::new();
    for record in &state.current_serials {
        validate_serial_no(&record.serial_no, policy.max_serial_len)?;

        if !seen.insert(record.serial_no.trim()) {
            return Err(ValidationError::Duplicate {
                field: "serial_no".to_string(),
                value: record.serial_no.trim().to_string(),
            });
        }
    }

    let attached = state.current_serials.len();
    if policy.require_full_quantity && attached != requested as usize {
        return Err(ValidationError::QuantityMismatch {
            requested,
            attached,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SerialRecord;

    fn form(quantity: Quantity, list: &[&str]) -> ReconciliationState {
        ReconciliationState {
            quantity,
            current_serials: list.iter().map(|s| SerialRecord::new(*s)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_serial_no() {
        assert!(validate_serial_no("SN1", 64).is_ok());
        assert!(validate_serial_no(" SN1 ", 64).is_ok());
        assert!(validate_serial_no("PCB-2024-0001", 64).is_ok());

        assert!(validate_serial_no("", 64).is_err());
        assert!(validate_serial_no("   ", 64).is_err());
        assert!(validate_serial_no("SN 1", 64).is_err());
        assert!(validate_serial_no(&"A".repeat(65), 64).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(Quantity::Count(1), 10), Ok(1));
        assert_eq!(validate_quantity(Quantity::Count(10), 10), Ok(10));

        assert!(validate_quantity(Quantity::Unset, 10).is_err());
        assert!(validate_quantity(Quantity::Count(0), 10).is_err());
        assert!(validate_quantity(Quantity::Count(11), 10).is_err());
    }

    #[test]
    fn test_submission_ok() {
        let state = form(Quantity::Count(2), &["SN1", "SN2"]);
        assert!(validate_submission(&state, &SubmissionPolicy::default()).is_ok());
    }

    #[test]
    fn test_submission_catches_renamed_duplicate() {
        let mut state = form(Quantity::Count(2), &["SN1", "SN2"]);
        state.rename_serial(1, "SN1");

        let err = validate_submission(&state, &SubmissionPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Duplicate {
                field: "serial_no".to_string(),
                value: "SN1".to_string(),
            }
        );
    }

    #[test]
    fn test_submission_shortfall_depends_on_policy() {
        let state = form(Quantity::Count(5), &["SN1"]);

        let strict = SubmissionPolicy::default();
        assert_eq!(
            validate_submission(&state, &strict),
            Err(ValidationError::QuantityMismatch {
                requested: 5,
                attached: 1,
            })
        );

        let lenient = SubmissionPolicy {
            require_full_quantity: false,
            ..SubmissionPolicy::default()
        };
        assert!(validate_submission(&state, &lenient).is_ok());
    }

    #[test]
    fn test_submission_requires_quantity() {
        let state = form(Quantity::Unset, &["SN1"]);
        assert!(matches!(
            validate_submission(&state, &SubmissionPolicy::default()),
            Err(ValidationError::Required { .. })
        ));
    }
}
