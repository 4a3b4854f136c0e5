//! JSON-file backed order store.
//!
//! The whole keyed collection lives in one file and is rewritten in full
//! on every mutation; there is no append log and no schema versioning.
//! A single async mutex serializes every load-mutate-save cycle end to
//! end. Without it, two concurrent writers would each serialize their own
//! view of the map and the last write would silently drop the other's
//! update.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::{Order, OrderPatch, OrderStatus};

use super::{AttemptWrite, OrderStore, StoreError};

pub struct FileOrderStore {
    path: PathBuf,
    state: Mutex<HashMap<String, Order>>,
}

impl FileOrderStore {
    /// Open a store backed by `path`, loading any records already on
    /// disk. A missing file starts an empty store; the file is created
    /// on the first mutation.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Write the full collection through to disk. Callers hold the state
    /// lock, so the on-disk file always reflects a complete mutation.
    async fn persist(&self, state: &HashMap<String, Order>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for FileOrderStore {
    async fn put(&self, order: Order) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.insert(order.order_id.clone(), order);
        self.persist(&state).await
    }

    async fn patch(&self, order_id: &str, fields: OrderPatch) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let Some(order) = state.get_mut(order_id) else {
            return Ok(false);
        };
        order.apply(&fields);
        self.persist(&state).await?;
        Ok(true)
    }

    async fn get(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.get(order_id).cloned())
    }

    async fn begin_attempt(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        let mut state = self.state.lock().await;
        let Some(order) = state.get_mut(order_id) else {
            return Ok(None);
        };
        order.attempt += 1;
        order.status = OrderStatus::Retrying;
        let snapshot = order.clone();
        self.persist(&state).await?;
        Ok(Some(snapshot))
    }

    async fn finish_attempt(
        &self,
        order_id: &str,
        attempt: u64,
        fields: OrderPatch,
    ) -> Result<AttemptWrite, StoreError> {
        let mut state = self.state.lock().await;
        let Some(order) = state.get_mut(order_id) else {
            return Ok(AttemptWrite::Missing);
        };
        if order.attempt != attempt {
            return Ok(AttemptWrite::Stale);
        }
        order.apply(&fields);
        self.persist(&state).await?;
        Ok(AttemptWrite::Applied)
    }
}
