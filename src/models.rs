//! Order record and status lifecycle types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delivery status of an order as it moves through the dispatch pipeline.
///
/// Transitions:
/// - `New` -> `SentToCourier` | `FailedToSend` (first dispatch attempt)
/// - any -> `Retrying` (operator resend)
/// - `Retrying` -> `SentToCourier` | `FailedToSend`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    SentToCourier,
    FailedToSend,
    Retrying,
}

/// A tracked order.
///
/// `customer` and `items` are opaque caller-supplied JSON; the service
/// stores and forwards them without interpreting their shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer: Value,
    pub items: Value,
    pub status: OrderStatus,
    /// Dispatch attempt sequence; bumped by every resend. Outcomes from
    /// superseded attempts are fenced out by the store.
    #[serde(default = "first_attempt")]
    pub attempt: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    /// Last failure detail, overwritten by each failed attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn first_attempt() -> u64 {
    1
}

impl Order {
    /// Build a freshly received order awaiting its first dispatch.
    pub fn new(order_id: String, customer: Value, items: Value) -> Self {
        Self {
            order_id,
            customer,
            items,
            status: OrderStatus::New,
            attempt: 1,
            tracking_id: None,
            error: None,
        }
    }

    /// Merge a partial update into the record. `None` fields are left
    /// untouched; `Some` fields overwrite.
    pub fn apply(&mut self, patch: &OrderPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(attempt) = patch.attempt {
            self.attempt = attempt;
        }
        if let Some(tracking_id) = &patch.tracking_id {
            self.tracking_id = Some(tracking_id.clone());
        }
        if let Some(error) = &patch.error {
            self.error = Some(error.clone());
        }
    }
}

/// Partial update for an order record.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub attempt: Option<u64>,
    pub tracking_id: Option<String>,
    pub error: Option<String>,
}

impl OrderPatch {
    /// Outcome of a successful dispatch attempt.
    pub fn sent(tracking_id: String) -> Self {
        Self {
            status: Some(OrderStatus::SentToCourier),
            tracking_id: Some(tracking_id),
            ..Self::default()
        }
    }

    /// Outcome of a failed dispatch attempt.
    pub fn failed(error: String) -> Self {
        Self {
            status: Some(OrderStatus::FailedToSend),
            error: Some(error),
            ..Self::default()
        }
    }
}
