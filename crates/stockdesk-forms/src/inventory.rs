//! # Inventory Service
//!
//! The seam between serial forms and whatever answers "which serials are
//! free for this batch and category?". In production that is the REST
//! backend. [`InMemoryInventory`] stands in for it in development and tests.
//!
//! ## Query Flow
//! ```text
//! SaleSerialForm ── AvailabilityQuery ──► InventoryService
//!       ▲                                        │
//!       └──────── Vec<SerialRecord> ◄────────────┘
//!                 (free serials, priority order,
//!                  already-used serials excluded)
//! ```

use std::collections::{HashMap, HashSet};
use std::future::Future;

use serde::{Deserialize, Serialize};
use stockdesk_core::{Quantity, SerialRecord};
use tracing::debug;
use ts_rs::TS;

use crate::error::FormResult;

// =============================================================================
// Query
// =============================================================================

/// What a form asks the Inventory Service for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub batch_id: String,
    pub category_id: String,
    #[ts(type = "number | null")]
    pub quantity: Quantity,
    /// Present only when the from-serial field is filled in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub from_serial: Option<String>,
}

// =============================================================================
// Service Trait
// =============================================================================

/// Source of available serial numbers.
///
/// Implementations return serials in fill priority order and leave out
/// serials already used by other sales.
pub trait InventoryService: Send + Sync {
    fn available_serials(
        &self,
        query: &AvailabilityQuery,
    ) -> impl Future<Output = FormResult<Vec<SerialRecord>>> + Send;
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// Stock table keyed by `(batch_id, category_id)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    stock: HashMap<(String, String), Vec<String>>,
    used: HashSet<String>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds serials to a batch/category, after any already stocked there.
    pub fn with_stock<I, S>(mut self, batch_id: &str, category_id: &str, serials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stock
            .entry((batch_id.to_string(), category_id.to_string()))
            .or_default()
            .extend(serials.into_iter().map(Into::into));
        self
    }

    /// Marks a serial as sold elsewhere so it is no longer offered.
    pub fn mark_used(&mut self, serial_no: &str) {
        self.used.insert(serial_no.to_string());
    }
}

impl InventoryService for InMemoryInventory {
    async fn available_serials(&self, query: &AvailabilityQuery) -> FormResult<Vec<SerialRecord>> {
        let key = (query.batch_id.clone(), query.category_id.clone());

        let serials: Vec<SerialRecord> = self
            .stock
            .get(&key)
            .map(|list| {
                list.iter()
                    .filter(|s| !self.used.contains(s.as_str()))
                    .map(SerialRecord::new)
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            batch_id = %query.batch_id,
            category_id = %query.category_id,
            count = serials.len(),
            "Served available serials"
        );

        Ok(serials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(batch_id: &str, category_id: &str) -> AvailabilityQuery {
        AvailabilityQuery {
            batch_id: batch_id.to_string(),
            category_id: category_id.to_string(),
            quantity: Quantity::Unset,
            from_serial: None,
        }
    }

    #[tokio::test]
    async fn test_serves_stock_in_order_without_used() {
        let mut inventory = InMemoryInventory::new()
            .with_stock("B1", "PCB", ["SN3", "SN1", "SN2"])
            .with_stock("B1", "PCB", ["SN4"]);
        inventory.mark_used("SN1");

        let serials = inventory.available_serials(&query("B1", "PCB")).await.unwrap();
        let numbers: Vec<&str> = serials.iter().map(|s| s.serial_no.as_str()).collect();
        assert_eq!(numbers, vec!["SN3", "SN2", "SN4"]);
    }

    #[tokio::test]
    async fn test_unknown_product_has_no_stock() {
        let inventory = InMemoryInventory::new().with_stock("B1", "PCB", ["SN1"]);

        let serials = inventory.available_serials(&query("B2", "PCB")).await.unwrap();
        assert!(serials.is_empty());
    }

    #[test]
    fn test_query_json_shape() {
        let mut q = query("B1", "PCB");
        q.quantity = Quantity::Count(3);
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, r#"{"batchId":"B1","categoryId":"PCB","quantity":3}"#);
    }
}
