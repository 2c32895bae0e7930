//! Registry events published on the [`super::EventBus`].
//!
//! Events mirror what registration listeners and client callbacks see,
//! for consumers of the admin WebSocket stream.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Pid, ServiceIdentity};

/// Event emitted after a registry-visible state change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// An implementation was registered under a name.
    ServiceRegistered {
        /// Instance name, serialized as flat `interface` and `instance`.
        #[serde(flatten)]
        identity: ServiceIdentity,
        /// Process that registered the implementation.
        pid: Pid,
        /// `true` when an earlier implementation was replaced.
        replaced: bool,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An instance's debounced presence flipped.
    ClientsChanged {
        /// Instance name, serialized as flat `interface` and `instance`.
        #[serde(flatten)]
        identity: ServiceIdentity,
        /// New presence value.
        has_clients: bool,
        /// Timestamp of the evaluation that flipped it.
        timestamp: DateTime<Utc>,
    },

    /// A same-process client was recorded.
    PassthroughClientRegistered {
        /// Instance name, serialized as flat `interface` and `instance`.
        #[serde(flatten)]
        identity: ServiceIdentity,
        /// Client process.
        pid: Pid,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl RegistryEvent {
    /// Returns the instance this event is about.
    #[must_use]
    pub fn identity(&self) -> &ServiceIdentity {
        match self {
            Self::ServiceRegistered { identity, .. }
            | Self::ClientsChanged { identity, .. }
            | Self::PassthroughClientRegistered { identity, .. } => identity,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ServiceRegistered { .. } => "service_registered",
            Self::ClientsChanged { .. } => "clients_changed",
            Self::PassthroughClientRegistered { .. } => "passthrough_client_registered",
        }
    }
}
