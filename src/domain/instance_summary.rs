//! Point-in-time view of a [`ServiceInstance`] for listings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Pid, ServiceIdentity, ServiceInstance};

/// Debug-dump style snapshot of one instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceSummary {
    /// Instance name.
    pub identity: ServiceIdentity,
    /// Whether an implementation has been registered.
    pub registered: bool,
    /// Whether the implementation lives in another process.
    pub remote: Option<bool>,
    /// Process that registered the implementation.
    pub owning_pid: Option<Pid>,
    /// When the current implementation was registered.
    pub registered_at: Option<DateTime<Utc>>,
    /// Last reported presence.
    pub has_clients: bool,
    /// Whether a client guarantee is pending.
    pub client_guaranteed: bool,
    /// Consecutive interval polls without clients.
    pub no_clients_streak: u32,
    /// Stored registration listeners.
    pub listener_count: usize,
    /// Stored client callbacks.
    pub client_callback_count: usize,
    /// Same-process clients, ascending.
    pub passthrough_clients: Vec<Pid>,
}

impl From<&ServiceInstance> for InstanceSummary {
    fn from(instance: &ServiceInstance) -> Self {
        let presence = instance.presence();
        Self {
            identity: instance.identity().clone(),
            registered: instance.implementation().is_some(),
            remote: instance.implementation().map(|s| s.is_remote()),
            owning_pid: instance.owning_pid(),
            registered_at: instance.registered_at(),
            has_clients: presence.has_clients(),
            client_guaranteed: presence.is_client_guaranteed(),
            no_clients_streak: presence.no_clients_streak(),
            listener_count: instance.listener_count(),
            client_callback_count: instance.client_callback_count(),
            passthrough_clients: instance.passthrough_clients().iter().copied().collect(),
        }
    }
}
