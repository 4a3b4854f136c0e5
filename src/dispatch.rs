//! Background dispatch of orders to the courier.
//!
//! One dispatch attempt is terminal: it submits the payload once, maps
//! the outcome onto a status transition, and stops. Retries only happen
//! through an explicit operator resend, which schedules a fresh attempt.

use std::sync::Arc;

use crate::courier::{Courier, CourierOutcome, CourierPayload};
use crate::models::{Order, OrderPatch};
use crate::store::{AttemptWrite, OrderStore, StoreError};

/// Forwards orders to the courier and records each attempt's outcome in
/// the store.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn OrderStore>,
    courier: Arc<dyn Courier>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn OrderStore>, courier: Arc<dyn Courier>) -> Self {
        Self { store, courier }
    }

    /// Schedule one dispatch attempt without blocking the caller. A
    /// store failure while recording the outcome has no caller left to
    /// propagate to and is logged from the task.
    pub fn spawn(&self, order: Order) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let order_id = order.order_id.clone();
            if let Err(e) = dispatcher.dispatch(order).await {
                tracing::error!(order_id = %order_id, "failed to record dispatch outcome: {e}");
            }
        });
    }

    /// Run one forwarding attempt for `order` and merge the outcome into
    /// its record. The write is fenced on the attempt number the snapshot
    /// carries: if a resend has bumped it meanwhile, this outcome is
    /// dropped and the newer attempt's outcome wins.
    pub async fn dispatch(&self, order: Order) -> Result<(), StoreError> {
        let payload = CourierPayload::from_order(&order);
        let outcome = self.courier.submit(&payload).await;

        let patch = match outcome {
            CourierOutcome::Accepted { tracking_id } => {
                // Courier responses without a tracking id get a
                // deterministic synthesized one
                let tracking_id =
                    tracking_id.unwrap_or_else(|| format!("{}-track", order.order_id));
                tracing::info!(
                    order_id = %order.order_id,
                    tracking_id = %tracking_id,
                    "order sent to courier"
                );
                OrderPatch::sent(tracking_id)
            }
            CourierOutcome::Rejected { status, body } => {
                tracing::warn!(
                    order_id = %order.order_id,
                    status,
                    "courier rejected order: {body}"
                );
                OrderPatch::failed(body)
            }
            CourierOutcome::Unreachable { reason } => {
                tracing::error!(order_id = %order.order_id, "courier unreachable: {reason}");
                OrderPatch::failed(reason)
            }
        };

        match self
            .store
            .finish_attempt(&order.order_id, order.attempt, patch)
            .await?
        {
            AttemptWrite::Applied => {}
            AttemptWrite::Stale => tracing::info!(
                order_id = %order.order_id,
                attempt = order.attempt,
                "attempt superseded by a newer resend, outcome dropped"
            ),
            AttemptWrite::Missing => tracing::warn!(
                order_id = %order.order_id,
                "order vanished while dispatching"
            ),
        }
        Ok(())
    }
}
