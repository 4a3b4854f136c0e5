//! Environment-sourced configuration.
//!
//! Every knob carries a development fallback. Production deployments
//! must override `COURIER_API_URL`, `COURIER_API_KEY`, and `API_SECRET`.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Gateway bind address, host:port.
    pub bind_addr: String,
    /// Path of the JSON file backing the order store.
    pub db_file: String,
    /// Inbound shared secret, compared against the `x-api-key` header.
    pub api_secret: String,
    pub courier: CourierConfig,
}

#[derive(Debug, Clone)]
pub struct CourierConfig {
    pub endpoint: String,
    /// Bearer credential for the courier; `None` disables the header.
    pub api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: env_or("LOG_DIR", "logs"),
            log_file: env_or("LOG_FILE", "order-relay.log"),
            use_json: env::var("LOG_JSON")
                .map(|v| v == "1" || v == "true")
                .unwrap_or(false),
            rotation: env_or("LOG_ROTATION", "daily"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            db_file: env_or("ORDERS_DB_FILE", "orders.json"),
            api_secret: env_or("API_SECRET", "dev-secret"),
            courier: CourierConfig {
                endpoint: env_or("COURIER_API_URL", "https://httpbin.org/post"),
                // An empty key means no bearer header at all
                api_key: env::var("COURIER_API_KEY").ok().filter(|k| !k.is_empty()),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
