//! # stockdesk-core: Pure Serial Logic for Stockdesk
//!
//! This crate holds the serial-number logic behind the sale creation and sale
//! editing forms as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockdesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (Presentation Layer)               │   │
//! │  │   Quantity input ──► From-serial input ──► Serial chips         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockdesk-forms                              │   │
//! │  │    SaleSerialForm, fetch tickets, InventoryService, config     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockdesk-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ reconcile │  │ mutation  │  │ validation│  │   │
//! │  │   │  Serial   │  │  trim /   │  │ add / rm  │  │  submit   │  │   │
//! │  │   │ Quantity  │  │   pad     │  │  rename   │  │  rules    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (SerialRecord, Quantity, ReconciliationState)
//! - [`reconcile`] - The quantity/availability reconciliation pass
//! - [`mutation`] - Direct chip edits (add, remove, rename)
//! - [`validation`] - Submission rules
//! - [`error`] - Warning and validation error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: `reconcile` is deterministic - same input = same output
//! 2. **No I/O**: availability comes in as data, never fetched here
//! 3. **Never Panics**: malformed input degrades to well-defined states
//! 4. **Warnings, not errors**: a short pool is reported, not raised
//!
//! ## Example Usage
//!
//! ```rust
//! use stockdesk_core::{reconcile, Quantity, ReconciliationState, SerialRecord};
//!
//! let state = ReconciliationState {
//!     quantity: Quantity::parse("2"),
//!     from_serial: String::new(),
//!     current_serials: Vec::new(),
//!     available_serials: vec![
//!         SerialRecord::new("SN1"),
//!         SerialRecord::new("SN2"),
//!         SerialRecord::new("SN3"),
//!     ],
//! };
//!
//! let outcome = reconcile(&state);
//! assert_eq!(outcome.serial_numbers(), vec!["SN1", "SN2"]);
//! assert_eq!(outcome.quantity, Quantity::Count(2));
//! assert!(outcome.warning.is_none());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod mutation;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockdesk_core::reconcile` instead of
// `use stockdesk_core::reconcile::reconcile`

pub use error::{StockWarning, ValidationError};
pub use reconcile::{reconcile, ReconcileOutcome};
pub use types::*;
pub use validation::SubmissionPolicy;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Label used in warnings when no from-serial filter is set.
pub const FIRST_SERIAL_LABEL: &str = "first";

/// Maximum serials on a single sale line.
///
/// ## Business Reason
/// Guards against typing 10000 instead of 100 on a board sale.
/// Overridable through the forms configuration.
pub const MAX_SALE_QUANTITY: u32 = 5000;

/// Maximum length of a single serial number.
pub const MAX_SERIAL_LEN: usize = 64;
