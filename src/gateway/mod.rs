//! HTTP gateway: routing, startup, shared state.

pub mod handlers;
pub mod state;
pub mod types;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

use state::AppState;

/// Build the gateway router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/order", post(handlers::create_order))
        .route("/order/{order_id}", get(handlers::read_order))
        .route("/resend/{order_id}", post(handlers::resend_order))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run_server(bind_addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    println!("🚀 Gateway listening on http://{bind_addr}");

    axum::serve(listener, app).await.context("server error")
}
