//! # Domain Types
//!
//! Core domain types used by the sale serial forms.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────┐      │
//! │  │    SerialRecord      │        │     ReconciliationState      │      │
//! │  │  ──────────────────  │        │  ──────────────────────────  │      │
//! │  │  serial_no (identity)│◄───────│  quantity: Quantity          │      │
//! │  │  remark?       (edit)│        │  from_serial                 │      │
//! │  │  quality_check?(edit)│        │  current_serials   (ordered) │      │
//! │  └──────────────────────┘        │  available_serials (ordered) │      │
//! │                                  └──────────────────────────────┘      │
//! │  ┌──────────────────────┐                                              │
//! │  │      Quantity        │                                              │
//! │  │  ──────────────────  │                                              │
//! │  │  Unset               │  "" / null / junk from the input field      │
//! │  │  Count(u32)          │  a parsed non-negative integer              │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Matters
//! - `current_serials`: insertion order = display/commit order. Trimming keeps
//!   the earliest-added entries.
//! - `available_serials`: Inventory Service order = fill priority. The first
//!   available serial wins.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

// =============================================================================
// Serial Record
// =============================================================================

/// A single serial number attached to (or available for) a sale.
///
/// Identity is `serial_no`. `remark` and `quality_check` are only filled in on
/// the edit form. Extra fields sent by the Inventory Service are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SerialRecord {
    /// The serial number itself (e.g. "SN000123").
    pub serial_no: String,

    /// Free-text remark entered on the edit form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub remark: Option<String>,

    /// Quality check result entered on the edit form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub quality_check: Option<String>,
}

impl SerialRecord {
    /// Creates a record with just a serial number.
    pub fn new(serial_no: impl Into<String>) -> Self {
        SerialRecord {
            serial_no: serial_no.into(),
            remark: None,
            quality_check: None,
        }
    }

    /// Returns true if this record carries the given serial number.
    #[inline]
    pub fn is(&self, serial_no: &str) -> bool {
        self.serial_no == serial_no
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// The requested number of serials, as typed into the quantity field.
///
/// ## Parsing Rules
/// ```text
/// ┌──────────────────────┬────────────────┐
/// │  Input               │  Quantity      │
/// ├──────────────────────┼────────────────┤
/// │  "3", " 3 ", 3       │  Count(3)      │
/// │  "0", 0              │  Count(0)      │
/// │  "", null            │  Unset         │
/// │  "abc", "-1", -1     │  Unset         │
/// │  "2.5", 2.5          │  Unset         │
/// │  2.0                 │  Count(2)      │
/// │  "5000000000"        │  Count(MAX)    │
/// └──────────────────────┴────────────────┘
/// ```
///
/// Counts above `u32::MAX` saturate, so an oversized request still reaches
/// the shortfall warning instead of being ignored.
///
/// Serialized as a JSON number, or `null` when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quantity {
    /// Nothing usable in the field. Reconciliation is a no-op.
    #[default]
    Unset,
    /// A non-negative count of serials.
    Count(u32),
}

impl Quantity {
    /// Parses raw input from the quantity field.
    ///
    /// ## Example
    /// ```rust
    /// use stockdesk_core::Quantity;
    ///
    /// assert_eq!(Quantity::parse(" 4 "), Quantity::Count(4));
    /// assert_eq!(Quantity::parse(""), Quantity::Unset);
    /// assert_eq!(Quantity::parse("four"), Quantity::Unset);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let digits = raw.strip_prefix('+').unwrap_or(raw);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Quantity::Unset;
        }

        Quantity::Count(digits.parse::<u32>().unwrap_or(u32::MAX))
    }

    /// Converts a signed integer. Negatives are unset, overflow saturates.
    pub fn from_i64(value: i64) -> Self {
        if value < 0 {
            return Quantity::Unset;
        }
        Quantity::Count(u32::try_from(value).unwrap_or(u32::MAX))
    }

    /// Converts a float, accepting only finite whole non-negative values.
    /// Values beyond `u32::MAX` saturate.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value.fract() != 0.0 || value < 0.0 {
            return Quantity::Unset;
        }

        if value >= u32::MAX as f64 {
            Quantity::Count(u32::MAX)
        } else {
            Quantity::Count(value as u32)
        }
    }

    /// Returns the count, or `None` when unset.
    #[inline]
    pub const fn count(&self) -> Option<u32> {
        match self {
            Quantity::Count(n) => Some(*n),
            Quantity::Unset => None,
        }
    }

    /// Returns true if a count is present.
    #[inline]
    pub const fn is_set(&self) -> bool {
        matches!(self, Quantity::Count(_))
    }

    /// Quantity matching a list length, saturating at `u32::MAX`.
    pub fn of_len(len: usize) -> Self {
        Quantity::Count(u32::try_from(len).unwrap_or(u32::MAX))
    }
}

impl From<u32> for Quantity {
    fn from(n: u32) -> Self {
        Quantity::Count(n)
    }
}

impl fmt::Display for Quantity {
    /// Renders the value the quantity field should show (empty when unset).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Count(n) => write!(f, "{}", n),
            Quantity::Unset => Ok(()),
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Quantity::Count(n) => serializer.serialize_u32(*n),
            Quantity::Unset => serializer.serialize_none(),
        }
    }
}

/// Shapes the quantity field can arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Int(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawQuantity>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawQuantity::Int(n)) => Quantity::from_i64(n),
            Some(RawQuantity::Float(n)) => Quantity::from_f64(n),
            Some(RawQuantity::Text(s)) => Quantity::parse(&s),
            None => Quantity::Unset,
        })
    }
}

// =============================================================================
// Reconciliation State
// =============================================================================

/// Everything a reconciliation pass reads.
///
/// ## Invariants
/// - `current_serials` has no duplicate `serial_no`
/// - After a pass, a numeric `quantity` equals `current_serials.len()`,
///   unless the pool was too small (the warning case)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationState {
    /// Desired number of serials.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub quantity: Quantity,

    /// Lower bound filter for the candidate pool ("" = no filter).
    #[serde(default)]
    pub from_serial: String,

    /// Serials already attached to the sale, in commit order.
    #[serde(default)]
    pub current_serials: Vec<SerialRecord>,

    /// Candidate pool from the Inventory Service, in priority order.
    #[serde(default)]
    pub available_serials: Vec<SerialRecord>,
}

impl ReconciliationState {
    /// Creates an empty state with an unset quantity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the serial is already attached.
    pub fn contains_serial(&self, serial_no: &str) -> bool {
        self.current_serials.iter().any(|s| s.is(serial_no))
    }

    /// Returns the attached serial numbers in order.
    pub fn serial_numbers(&self) -> Vec<&str> {
        self.current_serials
            .iter()
            .map(|s| s.serial_no.as_str())
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
