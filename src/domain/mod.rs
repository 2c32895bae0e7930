//! Domain layer: the service-instance lifecycle core and its plumbing.
//!
//! Leaves first: [`ObserverSet`] fans notifications out with
//! prune-on-failure, [`PresenceTracker`] debounces the transport's strong
//! reference count, and [`ServiceInstance`] ties both to a registered
//! implementation. [`InstanceRegistry`] stores instances and [`EventBus`]
//! broadcasts [`RegistryEvent`]s.

pub mod event_bus;
pub mod identity;
pub mod instance_registry;
pub mod instance_summary;
pub mod observer_set;
pub mod presence;
pub mod registry_event;
pub mod service_instance;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use event_bus::EventBus;
pub use identity::ServiceIdentity;
pub use instance_registry::{InstanceLock, InstanceRegistry};
pub use instance_summary::InstanceSummary;
pub use observer_set::ObserverSet;
pub use presence::{NO_CLIENT_REPEAT_LIMIT, PresenceDecision, PresenceTracker};
pub use registry_event::RegistryEvent;
pub use service_instance::ServiceInstance;
pub use transport::{
    ClientCallback, Pid, RegistrationListener, ServiceHandle, SharedService, StrongRefCount,
    same_service,
};
