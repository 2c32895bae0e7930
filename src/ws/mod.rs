//! WebSocket layer: registry event stream with per-connection
//! subscriptions.
//!
//! The endpoint at `/ws` forwards [`crate::domain::RegistryEvent`]s for the
//! instances a client subscribed to.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
