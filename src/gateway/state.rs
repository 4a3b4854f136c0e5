use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::store::OrderStore;

/// Shared gateway state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub dispatcher: Arc<Dispatcher>,
    /// Inbound shared secret, compared byte-for-byte against the
    /// `x-api-key` request header.
    pub api_secret: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn OrderStore>,
        dispatcher: Arc<Dispatcher>,
        api_secret: String,
    ) -> Self {
        Self {
            store,
            dispatcher,
            api_secret,
        }
    }
}
