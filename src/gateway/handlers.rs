//! Order intake, lookup, and resend handlers.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use uuid::Uuid;

use crate::models::Order;
use crate::store::OrderStore;

use super::state::AppState;
use super::types::{ApiError, CreateOrderRequest, HealthResponse, OrderAccepted};

/// POST /order
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<OrderAccepted>, ApiError> {
    // 1. Shared-secret check, before anything touches the store
    check_api_key(&headers, &state)?;

    // 2. Both payload halves are required
    let (Some(customer), Some(items)) = (req.customer, req.items) else {
        return Err(ApiError::invalid_payload(
            "payload must include 'customer' and 'items'",
        ));
    };

    // 3. Persist under a fresh id
    let order = Order::new(Uuid::new_v4().to_string(), customer, items);
    let order_id = order.order_id.clone();
    state.store.put(order.clone()).await?;
    tracing::info!(order_id = %order_id, "order received");

    // 4. Hand off to the dispatcher; the caller gets its ack now
    state.dispatcher.spawn(order);

    Ok(Json(OrderAccepted {
        message: "Order received",
        order_id,
    }))
}

/// GET /order/{order_id}
pub async fn read_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Order>, ApiError> {
    check_api_key(&headers, &state)?;

    let order = state
        .store
        .get(&order_id)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(order))
}

/// POST /resend/{order_id}
pub async fn resend_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<OrderAccepted>, ApiError> {
    check_api_key(&headers, &state)?;

    // Bump the attempt under the store lock; the returned snapshot
    // carries the fence number for this dispatch.
    let order = state
        .store
        .begin_attempt(&order_id)
        .await?
        .ok_or_else(ApiError::not_found)?;
    tracing::info!(order_id = %order_id, attempt = order.attempt, "resend scheduled");
    state.dispatcher.spawn(order);

    Ok(Json(OrderAccepted {
        message: "Resend scheduled",
        order_id,
    }))
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp_ms: now_ms(),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Compare the `x-api-key` header byte-for-byte against the configured
/// shared secret.
fn check_api_key(headers: &HeaderMap, state: &AppState) -> Result<(), ApiError> {
    match headers.get("x-api-key") {
        Some(presented) if presented.as_bytes() == state.api_secret.as_bytes() => Ok(()),
        _ => Err(ApiError::unauthorized()),
    }
}

/// Get current time in milliseconds
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
