//! Service manager: the registry-facing operations over all instances.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::presence::DEFAULT_REF_BASELINE;
use crate::domain::{
    ClientCallback, EventBus, InstanceRegistry, InstanceSummary, Pid, RegistrationListener,
    RegistryEvent, ServiceIdentity, ServiceInstance, SharedService, StrongRefCount, same_service,
};
use crate::error::RegistryError;

/// Orchestration layer for every registry operation.
///
/// Owns the [`InstanceRegistry`] for state and the [`EventBus`] for event
/// emission. Every operation follows the pattern: look up (or create) the
/// instance → lock it → delegate to [`ServiceInstance`] → emit events.
/// Observer failures are absorbed by the instance and never returned.
#[derive(Debug, Clone)]
pub struct ServiceManager {
    registry: Arc<InstanceRegistry>,
    event_bus: EventBus,
    ref_baseline: usize,
}

impl ServiceManager {
    /// Creates a new `ServiceManager`.
    #[must_use]
    pub fn new(registry: Arc<InstanceRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
            ref_baseline: DEFAULT_REF_BASELINE,
        }
    }

    /// Sets the strong reference baseline for instances created from now on.
    #[must_use]
    pub fn with_ref_baseline(mut self, ref_baseline: usize) -> Self {
        self.ref_baseline = ref_baseline;
        self
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`InstanceRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<InstanceRegistry> {
        &self.registry
    }

    /// Registers `service` under `identity`, replacing any previous
    /// implementation.
    ///
    /// Returns `true` when an earlier implementation was replaced.
    pub async fn register_service(
        &self,
        identity: ServiceIdentity,
        service: SharedService,
        pid: Pid,
    ) -> bool {
        let (lock, inserted) = self
            .registry
            .get_or_insert_with(&identity, || {
                ServiceInstance::new(identity.clone(), Arc::clone(&service), pid)
                    .with_ref_baseline(self.ref_baseline)
            })
            .await;

        let (replaced, lost_clients) = if inserted {
            (false, false)
        } else {
            let mut instance = lock.lock().await;
            let replaced = instance.implementation().is_some();
            let had_clients = instance.has_clients();
            instance.set_implementation(service, pid);
            (replaced, had_clients && !instance.has_clients())
        };

        tracing::info!(instance = %identity, pid, replaced, "service registered");
        let timestamp = Utc::now();
        let _ = self.event_bus.publish(RegistryEvent::ServiceRegistered {
            identity: identity.clone(),
            pid,
            replaced,
            timestamp,
        });
        // presence restarts with the new implementation
        if lost_clients {
            let _ = self.event_bus.publish(RegistryEvent::ClientsChanged {
                identity,
                has_clients: false,
                timestamp,
            });
        }
        replaced
    }

    /// Hands out the implementation registered under `identity`.
    ///
    /// The instance is guaranteed a client and polled right away, so a
    /// caller that drops the handle before the next interval sweep is
    /// still reported.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InstanceNotFound`] for unknown names and
    /// [`RegistryError::NotRegistered`] for placeholders.
    pub async fn get_service(
        &self,
        identity: &ServiceIdentity,
    ) -> Result<SharedService, RegistryError> {
        let lock = self.registry.get(identity).await?;
        let mut instance = lock.lock().await;
        let service = instance
            .implementation()
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered(identity.to_string()))?;

        instance.guarantee_client();
        self.poll_instance(&mut instance, false);
        Ok(service)
    }

    /// Subscribes `listener` to registrations of `identity`.
    ///
    /// Unknown names get a placeholder instance so the listener hears the
    /// first registration. Returns whether the listener was retained.
    pub async fn register_for_notifications(
        &self,
        identity: &ServiceIdentity,
        listener: &Arc<dyn RegistrationListener>,
    ) -> bool {
        let (lock, _) = self
            .registry
            .get_or_insert_with(identity, || self.placeholder(identity))
            .await;
        let retained = lock.lock().await.add_registration_listener(listener);
        tracing::debug!(instance = %identity, retained, "registration listener added");
        retained
    }

    /// Unsubscribes `listener` from `identity`. Returns whether anything
    /// was removed.
    pub async fn unregister_for_notifications(
        &self,
        identity: &ServiceIdentity,
        listener: &Weak<dyn RegistrationListener>,
    ) -> bool {
        let Ok(lock) = self.registry.get(identity).await else {
            return false;
        };
        lock.lock().await.remove_registration_listener(listener)
    }

    /// Removes `listener` from every instance, e.g. when its process died.
    /// Returns whether anything was removed.
    pub async fn remove_listener_everywhere(&self, listener: &Weak<dyn RegistrationListener>) -> bool {
        let mut removed = false;
        for lock in self.registry.snapshot().await {
            removed |= lock.lock().await.remove_registration_listener(listener);
        }
        removed
    }

    /// Adds a client callback for the implementation registered under
    /// `identity` and polls presence right away.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InstanceNotFound`] or
    /// [`RegistryError::NotRegistered`] if nothing is registered, and
    /// [`RegistryError::ServiceMismatch`] if `service` is not the current
    /// implementation.
    pub async fn register_client_callback(
        &self,
        identity: &ServiceIdentity,
        service: &SharedService,
        callback: Arc<dyn ClientCallback>,
    ) -> Result<(), RegistryError> {
        let lock = self.registry.get(identity).await?;
        let mut instance = lock.lock().await;

        let Some(current) = instance.implementation() else {
            return Err(RegistryError::NotRegistered(identity.to_string()));
        };
        if !same_service(current, service) {
            tracing::warn!(instance = %identity, "client callback for a stale handle rejected");
            return Err(RegistryError::ServiceMismatch(identity.to_string()));
        }

        instance.add_client_callback(callback);
        self.poll_instance(&mut instance, false);
        Ok(())
    }

    /// Removes `callback` from `identity`, or from every instance when no
    /// identity is given. Returns whether anything was removed.
    pub async fn unregister_client_callback(
        &self,
        identity: Option<&ServiceIdentity>,
        callback: &Arc<dyn ClientCallback>,
    ) -> bool {
        let locks = match identity {
            Some(identity) => match self.registry.get(identity).await {
                Ok(lock) => vec![lock],
                Err(_) => return false,
            },
            None => self.registry.snapshot().await,
        };

        let mut removed = false;
        for lock in locks {
            removed |= lock.lock().await.remove_client_callback(callback);
        }
        removed
    }

    /// Records a same-process client of `identity`, creating a placeholder
    /// for unknown names.
    pub async fn register_passthrough_client(&self, identity: &ServiceIdentity, pid: Pid) {
        let (lock, _) = self
            .registry
            .get_or_insert_with(identity, || self.placeholder(identity))
            .await;
        let added = lock.lock().await.register_passthrough_client(pid);
        if added {
            let _ = self
                .event_bus
                .publish(RegistryEvent::PassthroughClientRegistered {
                    identity: identity.clone(),
                    pid,
                    timestamp: Utc::now(),
                });
        }
    }

    /// Same-process clients of `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InstanceNotFound`] for unknown names.
    pub async fn passthrough_clients(
        &self,
        identity: &ServiceIdentity,
    ) -> Result<BTreeSet<Pid>, RegistryError> {
        let lock = self.registry.get(identity).await?;
        let clients = lock.lock().await.passthrough_clients().clone();
        Ok(clients)
    }

    /// Runs one interval presence poll over every instance.
    ///
    /// Returns how many instances produced a usable count.
    pub async fn poll_all_client_presence(&self) -> usize {
        let mut counted = 0;
        for lock in self.registry.snapshot().await {
            let mut instance = lock.lock().await;
            if let Some(StrongRefCount::Known(_)) = self.poll_instance(&mut instance, true) {
                counted += 1;
            }
        }
        counted
    }

    /// Spawns a task running [`Self::poll_all_client_presence`] every
    /// `interval`. The first sweep happens one interval after spawning.
    #[must_use]
    pub fn spawn_presence_poller(&self, interval: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let counted = manager.poll_all_client_presence().await;
                tracing::trace!(counted, "presence sweep finished");
            }
        })
    }

    /// Returns summaries of all instances, ordered by identity.
    pub async fn list(&self) -> Vec<InstanceSummary> {
        let mut summaries = Vec::new();
        for lock in self.registry.snapshot().await {
            summaries.push(InstanceSummary::from(&*lock.lock().await));
        }
        summaries
    }

    /// Returns the summary of one instance.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InstanceNotFound`] for unknown names.
    pub async fn describe(&self, identity: &ServiceIdentity) -> Result<InstanceSummary, RegistryError> {
        let lock = self.registry.get(identity).await?;
        let summary = InstanceSummary::from(&*lock.lock().await);
        Ok(summary)
    }

    fn placeholder(&self, identity: &ServiceIdentity) -> ServiceInstance {
        ServiceInstance::unregistered(identity.clone()).with_ref_baseline(self.ref_baseline)
    }

    /// Polls one locked instance and publishes a [`RegistryEvent`] if its
    /// presence flipped.
    fn poll_instance(&self, instance: &mut ServiceInstance, interval_poll: bool) -> Option<StrongRefCount> {
        let before = instance.has_clients();
        let count = instance.poll_client_presence(interval_poll);
        let after = instance.has_clients();
        if before != after {
            let _ = self.event_bus.publish(RegistryEvent::ClientsChanged {
                identity: instance.identity().clone(),
                has_clients: after,
                timestamp: Utc::now(),
            });
        }
        count
    }
}
