//! Contracts of the collaborators the registry core talks to.
//!
//! The underlying transport (a binder-style driver) is seen only through
//! [`ServiceHandle`]. Observers of the registry are seen only through the
//! two capability traits [`RegistrationListener`] and [`ClientCallback`].
//! Concrete adapters live in the embedding system.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::ServiceIdentity;
use crate::error::NotifyError;

/// Process identifier as reported by the transport.
pub type Pid = u32;

/// Strong reference count reported by the transport for a remote node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StrongRefCount {
    /// The driver reported a count.
    Known(usize),
    /// The driver cannot report counts for this node.
    Unsupported,
}

impl StrongRefCount {
    /// Returns the count if the driver reported one.
    #[must_use]
    pub const fn known(self) -> Option<usize> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unsupported => None,
        }
    }
}

/// Handle to a service implementation object.
///
/// In-process implementations return `false` from [`Self::is_remote`] and
/// are never reference counted.
pub trait ServiceHandle: Send + Sync + fmt::Debug {
    /// Whether the object lives in another process.
    fn is_remote(&self) -> bool;

    /// Strong references currently held on the remote node, including the
    /// registry's own. Only called when [`Self::is_remote`] is `true`.
    fn strong_ref_count(&self) -> StrongRefCount;
}

/// Shared, cheaply cloneable service handle.
pub type SharedService = Arc<dyn ServiceHandle>;

/// Observer notified when an instance is registered or replaced.
pub trait RegistrationListener: Send + Sync + fmt::Debug {
    /// Delivers a registration event. `preexisting` is `true` when the
    /// instance was already registered at the time the listener was added.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] when the listener cannot be reached.
    fn on_registration_changed(
        &self,
        identity: &ServiceIdentity,
        preexisting: bool,
    ) -> Result<(), NotifyError>;
}

/// Observer notified when a registered implementation gains or loses
/// external clients.
pub trait ClientCallback: Send + Sync + fmt::Debug {
    /// Delivers a presence change for `service`.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] when the callback cannot be reached.
    fn on_clients_changed(&self, service: &SharedService, has_clients: bool)
    -> Result<(), NotifyError>;
}

/// Returns `true` when both handles point at the same implementation object.
#[must_use]
pub fn same_service(a: &SharedService, b: &SharedService) -> bool {
    Arc::ptr_eq(a, b)
}
