//! # Sale Serial Form Session
//!
//! One [`SaleSerialForm`] per open sale creation or sale editing form. It owns
//! the reconciliation state and re-runs the reconcile pass whenever one of
//! its inputs changes.
//!
//! ## Field Change Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Serial Form Operations                               │
//! │                                                                         │
//! │  Form Event               Method                       Reconcile?       │
//! │  ──────────               ──────                       ──────────       │
//! │  Type quantity ─────────► set_quantity()          ───► yes              │
//! │  Type from-serial ──────► set_from_serial()       ───► yes              │
//! │  Pool arrives ──────────► complete_availability_fetch() ► yes (latest)  │
//! │  Pick a serial ─────────► pick_serial()           ───► no, qty = len    │
//! │  Remove a chip ─────────► remove_serial()         ───► no, qty = len    │
//! │  Edit chip text ────────► rename_serial()         ───► no               │
//! │  Submit ────────────────► submission()            ───► no, validates    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Fetches
//! Every availability fetch gets a [`FetchTicket`]. Only the most recently
//! issued ticket may deliver a pool; anything older is dropped
//! (last-write-wins).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockdesk_core::reconcile::candidate_serials;
use stockdesk_core::validation::validate_submission;
use stockdesk_core::{
    reconcile, Quantity, ReconcileOutcome, ReconciliationState, SerialRecord, SubmissionPolicy,
};
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{FormError, FormResult};
use crate::inventory::{AvailabilityQuery, InventoryService};

// =============================================================================
// Supporting Types
// =============================================================================

/// Which form the session backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    /// New sale. Starts with no serials.
    Create,
    /// Existing sale. Starts with the sale's serials, which stay pickable.
    Edit,
}

/// Proof of which availability fetch a pool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    issued_at: DateTime<Utc>,
}

impl FetchTicket {
    /// Sequence number, increasing per form.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// When the fetch was started.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Payload handed to the sales endpoint on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleSerialSubmission {
    pub batch_id: String,
    pub category_id: String,
    pub quantity: u32,
    pub serials: Vec<SerialRecord>,
}

impl SaleSerialSubmission {
    /// Encodes the payload as a JSON request body.
    pub fn to_json(&self) -> FormResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// =============================================================================
// Sale Serial Form
// =============================================================================

/// State of one open sale form's serial section.
///
/// ## Invariants
/// - Attached serials come from the sale's original serials or the latest
///   available pool
/// - After any change, a numeric quantity equals the attached count unless
///   `warning()` reports a shortfall
#[derive(Debug, Clone)]
pub struct SaleSerialForm {
    id: Uuid,
    mode: FormMode,
    batch_id: String,
    category_id: String,
    state: ReconciliationState,
    original_serials: Vec<SerialRecord>,
    warning: Option<String>,
    policy: SubmissionPolicy,
    latest_ticket: u64,
    opened_at: DateTime<Utc>,
}

impl SaleSerialForm {
    /// Opens a form for a new sale.
    pub fn new_sale(batch_id: &str, category_id: &str, policy: SubmissionPolicy) -> Self {
        let form = Self::open(FormMode::Create, batch_id, category_id, Vec::new(), policy);
        info!(form_id = %form.id, batch_id, category_id, "Opened sale serial form");
        form
    }

    /// Opens a form for an existing sale with its committed serials.
    pub fn edit_sale(
        batch_id: &str,
        category_id: &str,
        serials: Vec<SerialRecord>,
        policy: SubmissionPolicy,
    ) -> Self {
        let form = Self::open(FormMode::Edit, batch_id, category_id, serials, policy);
        info!(
            form_id = %form.id,
            batch_id,
            category_id,
            serials = form.state.current_serials.len(),
            "Opened sale serial edit form"
        );
        form
    }

    fn open(
        mode: FormMode,
        batch_id: &str,
        category_id: &str,
        serials: Vec<SerialRecord>,
        policy: SubmissionPolicy,
    ) -> Self {
        let quantity = match mode {
            FormMode::Create => Quantity::Unset,
            FormMode::Edit => Quantity::of_len(serials.len()),
        };

        SaleSerialForm {
            id: Uuid::new_v4(),
            mode,
            batch_id: batch_id.to_string(),
            category_id: category_id.to_string(),
            state: ReconciliationState {
                quantity,
                from_serial: String::new(),
                current_serials: serials.clone(),
                available_serials: Vec::new(),
            },
            original_serials: serials,
            warning: None,
            policy,
            latest_ticket: 0,
            opened_at: Utc::now(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// The full reconciliation state, for rendering.
    pub fn state(&self) -> &ReconciliationState {
        &self.state
    }

    /// Attached serials in commit order.
    pub fn serials(&self) -> &[SerialRecord] {
        &self.state.current_serials
    }

    pub fn quantity(&self) -> Quantity {
        self.state.quantity
    }

    /// Shortfall message from the last reconcile pass, if any.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Serials the picker may offer: unattached originals first, then the
    /// unattached part of the available pool.
    pub fn pickable_serials(&self) -> Vec<&SerialRecord> {
        let mut seen: HashSet<&str> = self
            .state
            .current_serials
            .iter()
            .map(|s| s.serial_no.as_str())
            .collect();

        self.original_serials
            .iter()
            .chain(self.state.available_serials.iter())
            .filter(|s| seen.insert(s.serial_no.as_str()))
            .collect()
    }

    // =========================================================================
    // Reconciling Inputs
    // =========================================================================

    /// Takes raw quantity input and reconciles.
    pub fn set_quantity(&mut self, raw: &str) -> ReconcileOutcome {
        self.state.quantity = Quantity::parse(raw);
        debug!(form_id = %self.id, raw, quantity = ?self.state.quantity, "Quantity changed");
        self.run_reconcile()
    }

    /// Takes the from-serial filter and reconciles.
    ///
    /// Surrounding whitespace is trimmed before the value is stored, so the
    /// filter and the fetch query both see `"SN5"` for `" SN5 "`. A blank
    /// value clears the filter.
    pub fn set_from_serial(&mut self, from_serial: &str) -> ReconcileOutcome {
        self.state.from_serial = from_serial.trim().to_string();
        debug!(form_id = %self.id, from_serial = %self.state.from_serial, "From-serial changed");
        self.run_reconcile()
    }

    /// Starts an availability fetch, superseding any fetch still in flight.
    pub fn begin_availability_fetch(&mut self) -> (FetchTicket, AvailabilityQuery) {
        self.latest_ticket += 1;
        let ticket = FetchTicket {
            seq: self.latest_ticket,
            issued_at: Utc::now(),
        };

        let query = AvailabilityQuery {
            batch_id: self.batch_id.clone(),
            category_id: self.category_id.clone(),
            quantity: self.state.quantity,
            from_serial: (!self.state.from_serial.is_empty()).then(|| self.state.from_serial.clone()),
        };

        debug!(form_id = %self.id, ticket = ticket.seq, "Availability fetch started");
        (ticket, query)
    }

    /// Delivers the pool for `ticket`.
    ///
    /// Returns `None` and changes nothing when a newer fetch has been started
    /// since `ticket` was issued.
    pub fn complete_availability_fetch(
        &mut self,
        ticket: FetchTicket,
        available: Vec<SerialRecord>,
    ) -> Option<ReconcileOutcome> {
        if ticket.seq != self.latest_ticket {
            debug!(
                form_id = %self.id,
                ticket = ticket.seq,
                latest = self.latest_ticket,
                "Dropping superseded availability result"
            );
            return None;
        }

        Some(self.apply_availability(ticket, available))
    }

    /// Runs a full fetch against `service` and applies the result.
    ///
    /// The form stays borrowed for the whole fetch, so the result always
    /// applies and supersedes any ticket handed out earlier. Callers that
    /// need overlapping fetches use [`Self::begin_availability_fetch`] and
    /// [`Self::complete_availability_fetch`] instead.
    pub async fn refresh_availability<S: InventoryService>(
        &mut self,
        service: &S,
    ) -> FormResult<ReconcileOutcome> {
        let (ticket, query) = self.begin_availability_fetch();

        match service.available_serials(&query).await {
            Ok(available) => Ok(self.apply_availability(ticket, available)),
            Err(e) => {
                warn!(form_id = %self.id, ticket = ticket.seq, error = %e, "Availability fetch failed");
                Err(e)
            }
        }
    }

    fn apply_availability(&mut self, ticket: FetchTicket, available: Vec<SerialRecord>) -> ReconcileOutcome {
        debug!(
            form_id = %self.id,
            ticket = ticket.seq,
            available = available.len(),
            elapsed_ms = (Utc::now() - ticket.issued_at).num_milliseconds(),
            "Availability fetch completed"
        );
        self.state.available_serials = available;
        self.run_reconcile()
    }

    fn run_reconcile(&mut self) -> ReconcileOutcome {
        let outcome = reconcile(&self.state);
        self.state.apply(&outcome);
        self.warning = outcome.warning.clone();

        if let Some(warning) = &self.warning {
            warn!(form_id = %self.id, attached = outcome.serials.len(), warning = %warning, "Serial shortfall");
        } else {
            debug!(form_id = %self.id, attached = outcome.serials.len(), "Serials reconciled");
        }

        outcome
    }

    // =========================================================================
    // Direct Edits
    // =========================================================================

    /// Attaches a serial chosen in the picker.
    ///
    /// Only serials from the sale itself or the available pool are accepted.
    /// Returns `Ok(false)` if it was already attached.
    pub fn pick_serial(&mut self, serial_no: &str) -> FormResult<bool> {
        let record = self
            .original_serials
            .iter()
            .chain(self.state.available_serials.iter())
            .find(|s| s.is(serial_no))
            .cloned()
            .ok_or_else(|| FormError::UnknownSerial {
                serial_no: serial_no.to_string(),
            })?;

        let added = self.state.add_serial(record);
        if added {
            self.warning = None;
            debug!(form_id = %self.id, serial_no, "Serial picked");
        }
        Ok(added)
    }

    /// Removes a chip.
    pub fn remove_serial(&mut self, serial_no: &str) -> bool {
        let removed = self.state.remove_serial(serial_no);
        self.warning = None;
        if removed {
            debug!(form_id = %self.id, serial_no, "Serial removed");
        }
        removed
    }

    /// Edits the text of a chip in place.
    pub fn rename_serial(&mut self, index: usize, new_value: &str) -> bool {
        self.state.rename_serial(index, new_value)
    }

    /// Sets the remark on an attached serial.
    pub fn set_remark(&mut self, index: usize, remark: &str) -> bool {
        self.state.set_remark(index, remark)
    }

    /// Sets the quality check result on an attached serial.
    pub fn set_quality_check(&mut self, index: usize, quality_check: &str) -> bool {
        self.state.set_quality_check(index, quality_check)
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Validates the form and builds the submit payload.
    pub fn submission(&self) -> FormResult<SaleSerialSubmission> {
        if let Err(e) = validate_submission(&self.state, &self.policy) {
            info!(form_id = %self.id, error = %e, "Submission blocked");
            return Err(e.into());
        }

        let serials = self
            .state
            .current_serials
            .iter()
            .map(|s| SerialRecord {
                serial_no: s.serial_no.trim().to_string(),
                ..s.clone()
            })
            .collect();

        Ok(SaleSerialSubmission {
            batch_id: self.batch_id.clone(),
            category_id: self.category_id.clone(),
            quantity: self.state.quantity.count().unwrap_or_default(),
            serials,
        })
    }

    /// Serials the next reconcile pass could append, in priority order.
    pub fn candidates(&self) -> Vec<&SerialRecord> {
        candidate_serials(&self.state)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
