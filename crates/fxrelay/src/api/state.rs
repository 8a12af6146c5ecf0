//! Application state shared across handlers.

use std::sync::Arc;

use crate::exchange::ExchangeService;
use crate::ws::ChatHub;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Hub tracking every live WebSocket peer.
    pub hub: Arc<ChatHub>,
    /// Handler for the reserved `exchange` command.
    pub exchange: Arc<ExchangeService>,
}

impl AppState {
    /// Create new application state with an empty hub.
    pub fn new(exchange: ExchangeService) -> Self {
        Self {
            hub: Arc::new(ChatHub::new()),
            exchange: Arc::new(exchange),
        }
    }
}
