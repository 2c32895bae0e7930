//! Service layer: registry operations orchestration.
//!
//! [`ServiceManager`] drives [`crate::domain::ServiceInstance`] from the
//! registry's RPC-facing operations and emits events through the
//! [`crate::domain::EventBus`].

pub mod service_manager;

pub use service_manager::ServiceManager;
