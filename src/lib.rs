//! # hwregistry
//!
//! Service-instance lifecycle core for a binder-style service registry.
//!
//! Each registered `(interface, instance)` name is a
//! [`domain::ServiceInstance`] that tracks who holds a reference to the
//! implementation, debounces the transport's racy strong reference count
//! into a stable "has clients" signal, and fans registration and presence
//! notifications out to observers without ever letting a dead observer
//! block the registry.
//!
//! ## Architecture
//!
//! ```text
//! Registry RPC surface (embedding system)      Admin (HTTP, WebSocket)
//!     │                                             │
//!     ├── ServiceManager (service/) ◄───────────────┤
//!     │       │                                     │
//!     │       ├── EventBus (domain/) ───────────────┘
//!     │       │
//!     │       └── InstanceRegistry (domain/)
//!     │               │
//!     │               └── ServiceInstance
//!     │                     ├── ObserverSet (listeners, client callbacks)
//!     │                     └── PresenceTracker
//!     │
//!     └── Transport (ServiceHandle: strong ref counts)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
