//! Instance DTOs for list and detail endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::InstanceSummary;

/// One instance as shown by `GET /instances` and
/// `GET /instances/{interface}/{instance}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct InstanceDto {
    /// Fully-qualified interface name.
    pub interface: String,
    /// Instance name.
    pub instance: String,
    /// Whether an implementation has been registered.
    pub registered: bool,
    /// Whether the implementation lives in another process.
    pub remote: Option<bool>,
    /// Process that registered the implementation.
    pub owning_pid: Option<u32>,
    /// Registration timestamp of the current implementation.
    pub registered_at: Option<DateTime<Utc>>,
    /// Last reported client presence.
    pub has_clients: bool,
    /// Whether a client guarantee is pending.
    pub client_guaranteed: bool,
    /// Consecutive interval polls without clients.
    pub no_clients_streak: u32,
    /// Stored registration listeners.
    pub listener_count: usize,
    /// Stored client callbacks.
    pub client_callback_count: usize,
    /// Same-process clients.
    pub passthrough_clients: Vec<u32>,
}

impl From<InstanceSummary> for InstanceDto {
    fn from(summary: InstanceSummary) -> Self {
        Self {
            interface: summary.identity.interface().to_string(),
            instance: summary.identity.instance().to_string(),
            registered: summary.registered,
            remote: summary.remote,
            owning_pid: summary.owning_pid,
            registered_at: summary.registered_at,
            has_clients: summary.has_clients,
            client_guaranteed: summary.client_guaranteed,
            no_clients_streak: summary.no_clients_streak,
            listener_count: summary.listener_count,
            client_callback_count: summary.client_callback_count,
            passthrough_clients: summary.passthrough_clients,
        }
    }
}

/// Response body for `GET /instances`.
#[derive(Debug, Serialize, ToSchema)]
pub struct InstanceListResponse {
    /// Instances ordered by name.
    pub data: Vec<InstanceDto>,
    /// Number of instances.
    pub total: usize,
}
