//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::ServiceManager;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service manager for all registry operations.
    pub service_manager: Arc<ServiceManager>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
