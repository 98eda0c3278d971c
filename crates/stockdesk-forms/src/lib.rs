//! # stockdesk-forms: Sale Serial Form Sessions
//!
//! The stateful layer behind the serial section of the sale creation and
//! sale editing forms. It keeps each open form's reconciliation state, asks
//! an [`InventoryService`] for the candidate pool, and reruns the pure
//! reconcile pass from `stockdesk-core` whenever an input changes.
//!
//! ## Lifecycle of a Form
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FormsConfig::load_or_default()  ──►  policy()                          │
//! │                                          │                              │
//! │  SaleSerialForm::new_sale / edit_sale ◄──┘                              │
//! │        │                                                                │
//! │        ├── set_quantity / set_from_serial ──► reconcile ──► warning?    │
//! │        ├── refresh_availability(&service)  ──► reconcile (latest only)  │
//! │        ├── pick_serial / remove_serial     ──► quantity = len           │
//! │        └── submission()                    ──► validated payload        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`session`] - `SaleSerialForm`, fetch tickets, submit payload
//! - [`inventory`] - `InventoryService` trait and the in-memory stock table
//! - [`config`] - TOML + environment configuration
//! - [`error`] - `FormError`

pub mod config;
pub mod error;
pub mod inventory;
pub mod session;

pub use config::FormsConfig;
pub use error::{FormError, FormResult};
pub use inventory::{AvailabilityQuery, InMemoryInventory, InventoryService};
pub use session::{FetchTicket, FormMode, SaleSerialForm, SaleSerialSubmission};

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockdesk_forms=trace` - Trace this crate only
/// - Default: the `[logging] filter` from the forms config
pub fn init_tracing(settings: &LoggingSettings) -> FormResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| FormError::LoggingInit(e.to_string()))
}
