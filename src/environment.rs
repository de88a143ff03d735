//! Shared wiring injected into every component instance.

use std::sync::Arc;
use std::time::Duration;

use crate::discovery::HostDiscovery;
use crate::host::{IdentityRegistry, InstanceRegistry};

/// Per-container environment: the discovery backend, the shared
/// registries, and the discovery poll interval.
///
/// One environment exists per container/process and is handed to every
/// [`ComponentInstance`](crate::ComponentInstance) at construction.
/// Registries live here so identity counters are never reset and the
/// host can resolve identities to instances.
pub struct BridgeEnvironment {
    discovery: Arc<dyn HostDiscovery>,
    identities: Arc<IdentityRegistry>,
    instances: Arc<InstanceRegistry>,
    poll_interval: Duration,
}

impl BridgeEnvironment {
    /// Interval between discovery checks during first registration.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

    pub fn new(discovery: Arc<dyn HostDiscovery>) -> Self {
        Self {
            discovery,
            identities: Arc::new(IdentityRegistry::new()),
            instances: Arc::new(InstanceRegistry::new()),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the discovery poll interval (mainly for tests).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn discovery(&self) -> &Arc<dyn HostDiscovery> {
        &self.discovery
    }

    pub fn identities(&self) -> &Arc<IdentityRegistry> {
        &self.identities
    }

    /// Registry the host uses to route inbound calls by identity.
    pub fn instances(&self) -> &Arc<InstanceRegistry> {
        &self.instances
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
