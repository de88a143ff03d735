//! Container-wide registry of registered instances.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::component::ComponentInstance;

/// Maps identity → instance handle for every registered instance in the
/// container.
///
/// Each entry is written exactly once, by the owning instance's
/// discovery poller at registration time, and removed when the instance
/// is destroyed. The host reads the registry to route inbound calls
/// (`apply_host_value`, `announce_connected`) to the right instance.
#[derive(Default)]
pub struct InstanceRegistry {
    inner: RwLock<HashMap<String, ComponentInstance>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a registered instance under its identity.
    pub fn insert(&self, identity: &str, instance: ComponentInstance) {
        let mut entries = self.inner.write().expect("instance registry lock poisoned");
        entries.insert(identity.to_string(), instance);
    }

    /// Look up an instance by identity. Returns a cheap handle clone.
    pub fn get(&self, identity: &str) -> Option<ComponentInstance> {
        let entries = self.inner.read().expect("instance registry lock poisoned");
        entries.get(identity).cloned()
    }

    /// Remove an instance entry. No-op if the identity is unknown.
    pub fn remove(&self, identity: &str) {
        let mut entries = self.inner.write().expect("instance registry lock poisoned");
        entries.remove(identity);
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("instance registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
