//! Lifecycle of one registered service instance.
//!
//! [`ServiceInstance`] reconciles three signals into one consistent view:
//! explicit (re)registration, the transport's racy strong reference count
//! (debounced by [`PresenceTracker`]) and two sets of observers whose
//! calls may fail.
//!
//! # Notification policy
//!
//! - Registration listeners whose call fails are pruned.
//! - Client callbacks whose call fails are logged and kept for the
//!   lifetime of the registered handle.
//!
//! Observer failures never surface to the caller of the triggering
//! operation.
//!
//! # Concurrency
//!
//! No internal locking. The owner serializes access per instance (see
//! [`super::InstanceRegistry`]).

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};

use super::presence::{PresenceDecision, PresenceTracker};
use super::{
    ClientCallback, ObserverSet, Pid, RegistrationListener, ServiceIdentity, SharedService,
    StrongRefCount,
};
use crate::error::NotifyError;

/// One named service and everything the registry tracks about it.
///
/// Created the first time a name is registered, or as a placeholder
/// (no implementation) when someone subscribes to a name before it is
/// registered. The implementation is only ever replaced, never removed.
#[derive(Debug)]
pub struct ServiceInstance {
    identity: ServiceIdentity,
    implementation: Option<SharedService>,
    owning_pid: Option<Pid>,
    registered_at: Option<DateTime<Utc>>,
    listeners: ObserverSet<Weak<dyn RegistrationListener>>,
    client_callbacks: ObserverSet<Arc<dyn ClientCallback>>,
    passthrough_clients: BTreeSet<Pid>,
    presence: PresenceTracker,
}

impl ServiceInstance {
    /// Creates a registered instance.
    #[must_use]
    pub fn new(identity: ServiceIdentity, implementation: SharedService, owning_pid: Pid) -> Self {
        Self {
            implementation: Some(implementation),
            owning_pid: Some(owning_pid),
            registered_at: Some(Utc::now()),
            ..Self::unregistered(identity)
        }
    }

    /// Creates a placeholder for a name nothing has registered yet.
    #[must_use]
    pub fn unregistered(identity: ServiceIdentity) -> Self {
        Self {
            identity,
            implementation: None,
            owning_pid: None,
            registered_at: None,
            listeners: ObserverSet::new(),
            client_callbacks: ObserverSet::new(),
            passthrough_clients: BTreeSet::new(),
            presence: PresenceTracker::new(),
        }
    }

    /// Sets how many strong references the registry itself holds on the
    /// node. See [`PresenceTracker::with_baseline`].
    #[must_use]
    pub fn with_ref_baseline(mut self, baseline: usize) -> Self {
        self.presence = PresenceTracker::with_baseline(baseline);
        self
    }

    /// Instance name.
    #[must_use]
    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// Current implementation, if registered.
    #[must_use]
    pub fn implementation(&self) -> Option<&SharedService> {
        self.implementation.as_ref()
    }

    /// Process that registered the current implementation.
    #[must_use]
    pub fn owning_pid(&self) -> Option<Pid> {
        self.owning_pid
    }

    /// When the current implementation was registered.
    #[must_use]
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        self.registered_at
    }

    /// Replaces the implementation.
    ///
    /// Client callbacks and presence state belong to the old handle and are
    /// reset. Registration listeners and passthrough clients are kept, and
    /// every listener is told about the new registration.
    pub fn set_implementation(&mut self, implementation: SharedService, owning_pid: Pid) {
        self.implementation = Some(implementation);
        self.owning_pid = Some(owning_pid);
        self.registered_at = Some(Utc::now());

        self.client_callbacks.clear();
        self.presence.reset();

        self.send_registration_notifications();
    }

    /// Adds a registration listener.
    ///
    /// If an implementation is already registered the listener first gets
    /// a preexisting notification; it is only stored when that call
    /// succeeds. The set holds the listener weakly; its owner keeps it
    /// alive.
    ///
    /// Returns whether the listener was stored.
    pub fn add_registration_listener(&mut self, listener: &Arc<dyn RegistrationListener>) -> bool {
        if self.implementation.is_some()
            && let Err(err) = listener.on_registration_changed(&self.identity, true)
        {
            tracing::error!(
                instance = %self.identity,
                error = %err,
                "not adding listener: failed to send preexisting registration"
            );
            return false;
        }
        self.listeners.add(Arc::downgrade(listener));
        true
    }

    /// Removes every stored entry for `listener`.
    ///
    /// A listener that no longer resolves matches nothing. Returns whether
    /// anything was removed.
    pub fn remove_registration_listener(&mut self, listener: &Weak<dyn RegistrationListener>) -> bool {
        if listener.upgrade().is_none() {
            return false;
        }
        self.listeners
            .remove_if(|entry| Weak::ptr_eq(entry, listener))
    }

    /// Records a same-process client. Returns `true` if it was new.
    pub fn register_passthrough_client(&mut self, pid: Pid) -> bool {
        self.passthrough_clients.insert(pid)
    }

    /// Same-process clients recorded so far.
    #[must_use]
    pub fn passthrough_clients(&self) -> &BTreeSet<Pid> {
        &self.passthrough_clients
    }

    /// Adds a client callback for the current implementation.
    pub fn add_client_callback(&mut self, callback: Arc<dyn ClientCallback>) {
        self.client_callbacks.add(callback);
    }

    /// Removes every stored entry for `callback`. Returns whether anything
    /// was removed.
    pub fn remove_client_callback(&mut self, callback: &Arc<dyn ClientCallback>) -> bool {
        self.client_callbacks
            .remove_if(|entry| Arc::ptr_eq(entry, callback))
    }

    /// Samples the transport's strong count and notifies client callbacks
    /// if the debounced presence changed.
    ///
    /// Returns `None` without touching any state if nothing is registered
    /// or the implementation is in-process. Otherwise returns the raw
    /// reading, [`StrongRefCount::Unsupported`] included.
    pub fn poll_client_presence(&mut self, interval_poll: bool) -> Option<StrongRefCount> {
        let service = Arc::clone(self.implementation.as_ref()?);
        if !service.is_remote() {
            return None;
        }

        let count = service.strong_ref_count();
        if let PresenceDecision::Notify { has_clients } =
            self.presence.evaluate(Some(count), interval_poll)
        {
            self.send_client_notifications(&service, has_clients);
        }
        Some(count)
    }

    /// Makes the next poll report clients even if the handle handed out
    /// has already been dropped.
    pub fn guarantee_client(&mut self) {
        self.presence.guarantee_client();
    }

    /// Last reported presence.
    #[must_use]
    pub fn has_clients(&self) -> bool {
        self.presence.has_clients()
    }

    /// Presence tracker state.
    #[must_use]
    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// Number of stored registration listeners, dead ones included.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of stored client callbacks.
    #[must_use]
    pub fn client_callback_count(&self) -> usize {
        self.client_callbacks.len()
    }

    /// `"{interface}/{instance}"`, for logs.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.identity.to_string()
    }

    fn send_registration_notifications(&mut self) {
        if self.listeners.is_empty() || self.implementation.is_none() {
            return;
        }

        let identity = &self.identity;
        let dropped = self.listeners.for_each_pruning(|weak| {
            let listener = weak.upgrade().ok_or(NotifyError::StaleListener)?;
            listener.on_registration_changed(identity, false)
        });

        for (_, err) in dropped {
            tracing::warn!(
                instance = %identity,
                error = %err,
                "dropping registration listener"
            );
        }
    }

    fn send_client_notifications(&self, service: &SharedService, has_clients: bool) {
        tracing::info!(instance = %self.identity, has_clients, "notifying client callbacks");

        let failures = self
            .client_callbacks
            .for_each(|callback| callback.on_clients_changed(service, has_clients));

        for (callback, err) in failures {
            tracing::warn!(
                instance = %self.identity,
                callback = ?callback,
                error = %err,
                "client callback failed"
            );
        }
    }
}
