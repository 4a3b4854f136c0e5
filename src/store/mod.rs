//! Durable order storage.
//!
//! The store is an injected abstraction over a keyed collection of order
//! records. The default implementation ([`FileOrderStore`]) keeps the
//! collection in memory and writes it through to a single JSON file on
//! every mutation.

pub mod file;

pub use file::FileOrderStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Order, OrderPatch};

/// Store-level failures. Absence of a record is not an error; lookups
/// and patches report it through their return value instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result of a fenced outcome write ([`OrderStore::finish_attempt`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptWrite {
    /// The outcome was merged into the record.
    Applied,
    /// A newer attempt superseded this one; nothing was written.
    Stale,
    /// No record exists under that id.
    Missing,
}

/// Keyed order storage.
///
/// Mutating operations serialize the whole load-mutate-save cycle:
/// two concurrent patches can never lose each other's fields.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert or overwrite the full record under its id (last-write-wins).
    async fn put(&self, order: Order) -> Result<(), StoreError>;

    /// Merge `fields` into an existing record. Returns `Ok(false)` when
    /// the id is unknown.
    async fn patch(&self, order_id: &str, fields: OrderPatch) -> Result<bool, StoreError>;

    /// Fetch a record by id.
    async fn get(&self, order_id: &str) -> Result<Option<Order>, StoreError>;

    /// Bump the attempt counter and mark the order `retrying`, returning
    /// the refreshed snapshot a new dispatch attempt should carry.
    /// Returns `Ok(None)` when the id is unknown.
    async fn begin_attempt(&self, order_id: &str) -> Result<Option<Order>, StoreError>;

    /// Merge `fields` only if `attempt` is still the record's current
    /// attempt number. Outcomes of superseded attempts are dropped.
    async fn finish_attempt(
        &self,
        order_id: &str,
        attempt: u64,
        fields: OrderPatch,
    ) -> Result<AttemptWrite, StoreError>;
}
