//! Outbound courier integration.
//!
//! The courier is an opaque remote endpoint reached over HTTP. This
//! module owns the wire payload, the classification of call results,
//! and the HTTP client implementation. The [`Courier`] trait is the
//! seam the dispatcher is tested through.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::models::Order;

/// Bound on one outbound courier call, connect to last byte.
const COURIER_TIMEOUT: Duration = Duration::from_secs(15);

/// Wire payload for one dispatch attempt.
///
/// Only intake data crosses the wire; status, tracking, and error
/// fields never leave the store.
#[derive(Debug, Clone, Serialize)]
pub struct CourierPayload {
    pub order_id: String,
    pub customer: Value,
    pub items: Value,
}

impl CourierPayload {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            customer: order.customer.clone(),
            items: order.items.clone(),
        }
    }
}

/// Classified result of one forwarding attempt.
#[derive(Debug, Clone)]
pub enum CourierOutcome {
    /// Remote answered 2xx. `tracking_id` is present when the response
    /// body was a JSON object carrying one.
    Accepted { tracking_id: Option<String> },
    /// Remote answered with a non-2xx status; the raw body text is kept
    /// as the failure detail.
    Rejected { status: u16, body: String },
    /// The call never produced a usable response: timeout, connection
    /// failure, or an unreadable body.
    Unreachable { reason: String },
}

#[async_trait]
pub trait Courier: Send + Sync {
    async fn submit(&self, payload: &CourierPayload) -> CourierOutcome;
}

/// HTTP client for the real courier endpoint.
pub struct HttpCourier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpCourier {
    /// Build a client for `endpoint`. When `api_key` is set, every call
    /// carries it as a bearer token.
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(COURIER_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Courier for HttpCourier {
    async fn submit(&self, payload: &CourierPayload) -> CourierOutcome {
        let mut request = self.client.post(&self.endpoint).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                return CourierOutcome::Unreachable {
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                return CourierOutcome::Unreachable {
                    reason: format!("failed to read courier response: {e}"),
                };
            }
        };

        if status.is_success() {
            CourierOutcome::Accepted {
                tracking_id: extract_tracking_id(&body),
            }
        } else {
            CourierOutcome::Rejected {
                status: status.as_u16(),
                body,
            }
        }
    }
}

/// Pull `tracking_id` out of a 2xx response body. Anything that is not
/// a JSON object with a string `tracking_id` yields `None`; the
/// dispatcher synthesizes one in that case.
fn extract_tracking_id(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("tracking_id")?.as_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Order, OrderPatch};

    #[test]
    fn test_extract_tracking_id_from_object() {
        assert_eq!(
            extract_tracking_id(r#"{"tracking_id": "trk-42"}"#).as_deref(),
            Some("trk-42")
        );
    }

    #[test]
    fn test_extract_tracking_id_absent_or_unstructured() {
        assert_eq!(extract_tracking_id(r#"{"ack": true}"#), None);
        assert_eq!(extract_tracking_id(r#"[1, 2, 3]"#), None);
        assert_eq!(extract_tracking_id(r#"{"tracking_id": 42}"#), None);
        assert_eq!(extract_tracking_id("not json"), None);
        assert_eq!(extract_tracking_id(""), None);
    }

    #[test]
    fn test_payload_carries_only_intake_fields() {
        let mut order = Order::new(
            "oid-1".to_string(),
            json!({"name": "Ada"}),
            json!(["X1"]),
        );
        order.apply(&OrderPatch::failed("previous failure".to_string()));

        let payload = serde_json::to_value(CourierPayload::from_order(&order)).unwrap();
        let fields = payload.as_object().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["order_id"], json!("oid-1"));
        assert!(fields.contains_key("customer"));
        assert!(fields.contains_key("items"));
        assert!(!fields.contains_key("status"));
        assert!(!fields.contains_key("error"));
    }
}
