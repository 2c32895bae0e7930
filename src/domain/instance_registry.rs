//! Instance storage with per-instance serialization.
//!
//! [`InstanceRegistry`] maps every known [`ServiceIdentity`] to its
//! [`ServiceInstance`]. Each instance sits behind its own
//! [`tokio::sync::Mutex`]: the instance does no locking of its own, so all
//! access to one instance is serialized here while different instances
//! proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::{ServiceIdentity, ServiceInstance};
use crate::error::RegistryError;

/// Shared, individually locked instance.
pub type InstanceLock = Arc<Mutex<ServiceInstance>>;

/// Central map of all known instances, registered or placeholder.
///
/// # Concurrency
///
/// - The outer `RwLock` only guards the map shape.
/// - Mutations of one instance are serialized by its `Mutex`.
/// - Instances are never removed.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: RwLock<HashMap<ServiceIdentity, InstanceLock>>,
}

impl InstanceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the instance registered under `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InstanceNotFound`] if the name is unknown.
    pub async fn get(&self, identity: &ServiceIdentity) -> Result<InstanceLock, RegistryError> {
        let map = self.instances.read().await;
        map.get(identity)
            .cloned()
            .ok_or_else(|| RegistryError::InstanceNotFound(identity.to_string()))
    }

    /// Returns the instance under `identity`, inserting the one built by
    /// `make` if the name is unknown. The flag is `true` when inserted.
    pub async fn get_or_insert_with(
        &self,
        identity: &ServiceIdentity,
        make: impl FnOnce() -> ServiceInstance,
    ) -> (InstanceLock, bool) {
        if let Ok(existing) = self.get(identity).await {
            return (existing, false);
        }

        let mut map = self.instances.write().await;
        if let Some(existing) = map.get(identity) {
            return (Arc::clone(existing), false);
        }
        let lock = Arc::new(Mutex::new(make()));
        map.insert(identity.clone(), Arc::clone(&lock));
        (lock, true)
    }

    /// Returns every instance, ordered by identity.
    pub async fn snapshot(&self) -> Vec<InstanceLock> {
        let map = self.instances.read().await;
        let mut entries: Vec<_> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, lock)| Arc::clone(lock)).collect()
    }

    /// Returns the number of known instances.
    pub async fn len(&self) -> usize {
        self.instances.read().await.len()
    }

    /// Returns `true` if no instance is known.
    pub async fn is_empty(&self) -> bool {
        self.instances.read().await.is_empty()
    }
}
