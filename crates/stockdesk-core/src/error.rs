//! # Error Types
//!
//! Domain-specific warning and error types for stockdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockdesk-core (this file)                                            │
//! │  ├── StockWarning     - Non-fatal reconcile outcome (shown, not raised)│
//! │  └── ValidationError  - Submission rule failures                       │
//! │                                                                         │
//! │  stockdesk-forms (separate crate)                                      │
//! │  └── FormError        - Session, inventory and config failures         │
//! │                                                                         │
//! │  Flow: ValidationError → FormError → Dashboard                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in messages (serial, counts, field)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Stock Warning
// =============================================================================

/// Non-fatal conditions produced by a reconciliation pass.
///
/// These never travel as `Err`. The reconcile pass renders them with
/// `to_string()` into the outcome's `warning` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockWarning {
    /// The pool cannot satisfy the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Quantity: 5, From serial: (empty)
    ///      │
    ///      ▼
    /// attached=0, candidates=[SN1]
    ///      │
    ///      ▼
    /// InsufficientSerials { available: 1, from: "first", requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 1 serial number(s) available from the first serial,
    ///            but you requested 5"
    /// ```
    #[error("Only {available} serial number(s) available from the {from} serial, but you requested {requested}")]
    InsufficientSerials {
        available: usize,
        from: String,
        requested: u32,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when a form is submitted, never during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., whitespace inside a serial number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same serial twice on one sale).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// The attached serials do not cover the requested quantity.
    #[error("quantity is {requested} but {attached} serial number(s) are attached")]
    QuantityMismatch { requested: u32, attached: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_serials_message() {
        let warning = StockWarning::InsufficientSerials {
            available: 1,
            from: "first".to_string(),
            requested: 5,
        };
        assert_eq!(
            warning.to_string(),
            "Only 1 serial number(s) available from the first serial, but you requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity is required");

        let err = ValidationError::Duplicate {
            field: "serial_no".to_string(),
            value: "SN1".to_string(),
        };
        assert_eq!(err.to_string(), "serial_no 'SN1' already exists");

        let err = ValidationError::QuantityMismatch {
            requested: 5,
            attached: 1,
        };
        assert_eq!(
            err.to_string(),
            "quantity is 5 but 1 serial number(s) are attached"
        );
    }
}
