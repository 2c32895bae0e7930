//! Per-connection subscription manager.
//!
//! Tracks which instances a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::ServiceIdentity;

/// Manages the set of instance subscriptions for a single connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed instances. Ignored while `subscribe_all` is set.
    identities: HashSet<ServiceIdentity>,
    /// Whether the client subscribes to all instances (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds instances to the subscription set, optionally enabling the
    /// wildcard.
    pub fn subscribe(&mut self, identities: &[ServiceIdentity], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.identities.extend(identities.iter().cloned());
    }

    /// Removes instances from the subscription set.
    pub fn unsubscribe(&mut self, identities: &[ServiceIdentity]) {
        for identity in identities {
            self.identities.remove(identity);
        }
    }

    /// Returns `true` if events about `identity` should be forwarded.
    #[must_use]
    pub fn matches(&self, identity: &ServiceIdentity) -> bool {
        self.subscribe_all || self.identities.contains(identity)
    }

    /// Returns the number of explicitly subscribed instances.
    #[must_use]
    pub fn count(&self) -> usize {
        self.identities.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn identity(instance: &str) -> ServiceIdentity {
        let Ok(id) = ServiceIdentity::new("IFoo", instance) else {
            panic!("valid identity");
        };
        id
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(&identity("default")));
    }

    #[test]
    fn subscribe_specific_instance() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[identity("a")], false);
        assert!(mgr.matches(&identity("a")));
        assert!(!mgr.matches(&identity("b")));
        assert_eq!(mgr.count(), 1);
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.is_subscribed_all());
        assert!(mgr.matches(&identity("anything")));
    }

    #[test]
    fn unsubscribe_removes_instance() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[identity("a")], false);
        mgr.unsubscribe(&[identity("a")]);
        assert!(!mgr.matches(&identity("a")));
    }
}
