//! # Form Error Types
//!
//! Error types for sale serial form sessions.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Form Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Session      │  │   Inventory     │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  Inventory      │  │  InvalidConfig          │ │
//! │  │  UnknownSerial  │  │                 │  │  Io / ConfigParse       │ │
//! │  │  Serialization  │  │                 │  │  ConfigSerialize        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A short candidate pool is not an error. It travels as the reconcile
//! outcome's warning.

use stockdesk_core::ValidationError;
use thiserror::Error;

/// Result type alias for form operations.
pub type FormResult<T> = Result<T, FormError>;

/// Form error type covering session, inventory and config failures.
#[derive(Debug, Error)]
pub enum FormError {
    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Submission blocked by a business rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The picked serial is neither on the sale nor in the available pool.
    #[error("Serial {serial_no} is not available for this sale")]
    UnknownSerial { serial_no: String },

    /// Failed to encode a submission payload.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    // =========================================================================
    // Inventory Errors
    // =========================================================================
    /// The Inventory Service could not produce a candidate pool.
    #[error("Inventory service error: {0}")]
    Inventory(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are inconsistent.
    #[error("Invalid forms configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or written.
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML.
    #[error("Failed to render config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A global tracing subscriber was already installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FormError::UnknownSerial {
            serial_no: "SN404".to_string(),
        };
        assert_eq!(err.to_string(), "Serial SN404 is not available for this sale");

        let err: FormError = ValidationError::Required {
            field: "quantity".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Validation error: quantity is required");
    }
}
