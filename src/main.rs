//! order-relay entry point.
//!
//! Wires configuration, logging, the file-backed store, the courier
//! client, and the HTTP gateway together, then serves until stopped.

use std::sync::Arc;

use anyhow::Context;

use order_relay::config::AppConfig;
use order_relay::courier::HttpCourier;
use order_relay::dispatch::Dispatcher;
use order_relay::gateway::{self, state::AppState};
use order_relay::logging;
use order_relay::store::FileOrderStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let _log_guard = logging::init_logging(&config);

    println!(
        "order-relay {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let store = Arc::new(
        FileOrderStore::open(&config.db_file)
            .await
            .with_context(|| format!("failed to open order store at {}", config.db_file))?,
    );
    let courier = Arc::new(
        HttpCourier::new(
            config.courier.endpoint.clone(),
            config.courier.api_key.clone(),
        )
        .context("failed to build courier HTTP client")?,
    );
    tracing::info!(
        endpoint = %config.courier.endpoint,
        db_file = %config.db_file,
        "order-relay starting"
    );

    let dispatcher = Arc::new(Dispatcher::new(store.clone(), courier));
    let state = Arc::new(AppState::new(store, dispatcher, config.api_secret.clone()));

    gateway::run_server(&config.bind_addr, state).await
}
