//! order-relay - order intake gateway with asynchronous courier dispatch.
//!
//! Orders arrive over HTTP, are persisted to a file-backed keyed store,
//! and are forwarded to an external courier endpoint in the background.
//! Delivery outcomes are written back to the store and observed by
//! polling the lookup endpoint; retries are operator-triggered resends.
//!
//! # Modules
//!
//! - [`config`] - Environment-sourced configuration
//! - [`models`] - Order record and status lifecycle
//! - [`store`] - Durable keyed order storage
//! - [`courier`] - Outbound courier endpoint integration
//! - [`dispatch`] - Background dispatch attempts
//! - [`gateway`] - HTTP surface (intake, lookup, resend)

pub mod config;
pub mod courier;
pub mod dispatch;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod store;

// Convenient re-exports at crate root
pub use courier::{Courier, CourierOutcome, CourierPayload, HttpCourier};
pub use dispatch::Dispatcher;
pub use models::{Order, OrderPatch, OrderStatus};
pub use store::{AttemptWrite, FileOrderStore, OrderStore, StoreError};
