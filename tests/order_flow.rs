//! End-to-end order lifecycle tests: intake through dispatch outcome,
//! driven through the gateway handlers with a scripted courier.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use order_relay::courier::{Courier, CourierOutcome, CourierPayload};
use order_relay::dispatch::Dispatcher;
use order_relay::gateway::handlers;
use order_relay::gateway::state::AppState;
use order_relay::gateway::types::{ApiErrorCode, CreateOrderRequest};
use order_relay::models::{Order, OrderStatus};
use order_relay::store::{FileOrderStore, OrderStore};

const TEST_SECRET: &str = "test-secret";

/// Courier stub answering every submit with a fixed outcome.
struct StubCourier(CourierOutcome);

#[async_trait::async_trait]
impl Courier for StubCourier {
    async fn submit(&self, _payload: &CourierPayload) -> CourierOutcome {
        self.0.clone()
    }
}

/// Courier that blocks until the test releases a permit, so intermediate
/// order states stay observable.
struct GatedCourier {
    gate: Arc<Semaphore>,
}

#[async_trait::async_trait]
impl Courier for GatedCourier {
    async fn submit(&self, _payload: &CourierPayload) -> CourierOutcome {
        let _permit = self.gate.acquire().await.unwrap();
        CourierOutcome::Accepted { tracking_id: None }
    }
}

struct TestApp {
    state: Arc<AppState>,
    dir: TempDir,
}

impl TestApp {
    async fn with_courier(courier: Arc<dyn Courier>) -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(
            FileOrderStore::open(dir.path().join("orders.json"))
                .await
                .unwrap(),
        );
        let dispatcher = Arc::new(Dispatcher::new(store.clone(), courier));
        let state = Arc::new(AppState::new(store, dispatcher, TEST_SECRET.to_string()));
        Self { state, dir }
    }

    async fn with_outcome(outcome: CourierOutcome) -> Self {
        Self::with_courier(Arc::new(StubCourier(outcome))).await
    }

    fn db_file_exists(&self) -> bool {
        self.dir.path().join("orders.json").exists()
    }

    async fn wait_for_status(&self, order_id: &str, want: OrderStatus) -> Order {
        for _ in 0..200 {
            if let Some(order) = self.state.store.get(order_id).await.unwrap() {
                if order.status == want {
                    return order;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("order {order_id} never reached {want:?}");
    }
}

fn auth_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", TEST_SECRET.parse().unwrap());
    headers
}

fn create_request() -> CreateOrderRequest {
    CreateOrderRequest {
        customer: Some(json!({"name": "Ada", "address": "1 Engine St"})),
        items: Some(json!([{"sku": "X1", "qty": 2}])),
    }
}

#[tokio::test]
async fn test_create_order_flows_to_sent() {
    let app = TestApp::with_outcome(CourierOutcome::Accepted {
        tracking_id: Some("courier-trk-1".to_string()),
    })
    .await;

    let Json(ack) = handlers::create_order(
        State(app.state.clone()),
        auth_headers(),
        Json(create_request()),
    )
    .await
    .unwrap();
    assert_eq!(ack.message, "Order received");
    assert!(!ack.order_id.is_empty());

    // Immediately readable, payload intact, status not yet past dispatch
    let Json(order) = handlers::read_order(
        State(app.state.clone()),
        Path(ack.order_id.clone()),
        auth_headers(),
    )
    .await
    .unwrap();
    assert_eq!(order.customer, json!({"name": "Ada", "address": "1 Engine St"}));
    assert_eq!(order.items, json!([{"sku": "X1", "qty": 2}]));
    assert!(matches!(
        order.status,
        OrderStatus::New | OrderStatus::SentToCourier
    ));

    // The background attempt lands with the courier's tracking id
    let order = app
        .wait_for_status(&ack.order_id, OrderStatus::SentToCourier)
        .await;
    assert_eq!(order.tracking_id.as_deref(), Some("courier-trk-1"));
}

#[tokio::test]
async fn test_create_order_rejection_captured_in_record() {
    let app = TestApp::with_outcome(CourierOutcome::Rejected {
        status: 503,
        body: "courier at capacity".to_string(),
    })
    .await;

    let Json(ack) = handlers::create_order(
        State(app.state.clone()),
        auth_headers(),
        Json(create_request()),
    )
    .await
    .unwrap();

    let order = app
        .wait_for_status(&ack.order_id, OrderStatus::FailedToSend)
        .await;
    assert_eq!(order.error.as_deref(), Some("courier at capacity"));
    assert!(order.tracking_id.is_none());
}

#[tokio::test]
async fn test_create_order_bad_key_never_touches_store() {
    let app = TestApp::with_outcome(CourierOutcome::Accepted { tracking_id: None }).await;

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", "wrong-secret".parse().unwrap());
    let err = handlers::create_order(State(app.state.clone()), headers, Json(create_request()))
        .await
        .unwrap_err();
    assert_eq!(err.code, ApiErrorCode::Unauthorized);

    // Missing header entirely is the same rejection
    let err = handlers::create_order(
        State(app.state.clone()),
        HeaderMap::new(),
        Json(create_request()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ApiErrorCode::Unauthorized);

    // The store was never written
    assert!(!app.db_file_exists());
}

#[tokio::test]
async fn test_create_order_missing_fields_creates_nothing() {
    let app = TestApp::with_outcome(CourierOutcome::Accepted { tracking_id: None }).await;

    let err = handlers::create_order(
        State(app.state.clone()),
        auth_headers(),
        Json(CreateOrderRequest {
            customer: Some(json!({"name": "Ada"})),
            items: None,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ApiErrorCode::InvalidPayload);

    let err = handlers::create_order(
        State(app.state.clone()),
        auth_headers(),
        Json(CreateOrderRequest {
            customer: None,
            items: Some(json!(["X1"])),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ApiErrorCode::InvalidPayload);

    assert!(!app.db_file_exists());
}

#[tokio::test]
async fn test_read_and_resend_unknown_order_not_found() {
    let app = TestApp::with_outcome(CourierOutcome::Accepted { tracking_id: None }).await;

    let err = handlers::read_order(
        State(app.state.clone()),
        Path("never-created".to_string()),
        auth_headers(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ApiErrorCode::OrderNotFound);

    let err = handlers::resend_order(
        State(app.state.clone()),
        Path("never-created".to_string()),
        auth_headers(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ApiErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_resend_is_observable_as_retrying_then_terminal() {
    let gate = Arc::new(Semaphore::new(0));
    let app = TestApp::with_courier(Arc::new(GatedCourier { gate: gate.clone() })).await;

    // Seed a previously failed order
    let mut order = Order::new(
        "retry-me".to_string(),
        json!({"name": "Ada"}),
        json!(["X1"]),
    );
    order.status = OrderStatus::FailedToSend;
    order.error = Some("first attempt failed".to_string());
    app.state.store.put(order).await.unwrap();

    let Json(ack) = handlers::resend_order(
        State(app.state.clone()),
        Path("retry-me".to_string()),
        auth_headers(),
    )
    .await
    .unwrap();
    assert_eq!(ack.message, "Resend scheduled");
    assert_eq!(ack.order_id, "retry-me");

    // The dispatch attempt is parked on the gate, so the intermediate
    // retrying state is visible through the read endpoint
    let Json(order) = handlers::read_order(
        State(app.state.clone()),
        Path("retry-me".to_string()),
        auth_headers(),
    )
    .await
    .unwrap();
    assert_eq!(order.status, OrderStatus::Retrying);
    assert_eq!(order.attempt, 2);

    // Release the courier; the new attempt overwrites the old failure
    gate.add_permits(1);
    let order = app
        .wait_for_status("retry-me", OrderStatus::SentToCourier)
        .await;
    assert_eq!(order.tracking_id.as_deref(), Some("retry-me-track"));
}

#[tokio::test]
async fn test_health_answers_without_credentials() {
    let Json(health) = handlers::health_check().await;
    assert_eq!(health.status, "ok");
    assert!(health.timestamp_ms > 0);
}
