//! The component instance proxy.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::definition::ComponentDefinition;
use crate::discovery::{CancelHandle, DiscoveryPoller};
use crate::environment::BridgeEnvironment;
use crate::host::HostSession;

use super::state::ConnectionState;

/// Local proxy for a component whose authoritative state lives on the
/// remote host.
///
/// Cheap to clone; all clones share the same underlying instance. The
/// container drives the lifecycle through [`handle_attach`],
/// [`handle_detach`] and [`destroy`]; the host calls back in through
/// [`apply_host_value`] and [`announce_connected`], routed by identity
/// via the environment's instance registry.
///
/// [`handle_attach`]: ComponentInstance::handle_attach
/// [`handle_detach`]: ComponentInstance::handle_detach
/// [`destroy`]: ComponentInstance::destroy
/// [`apply_host_value`]: ComponentInstance::apply_host_value
/// [`announce_connected`]: ComponentInstance::announce_connected
#[derive(Clone)]
pub struct ComponentInstance {
    shared: Arc<Shared>,
}

struct Shared {
    tag: String,
    env: Arc<BridgeEnvironment>,
    inner: RwLock<Inner>,
}

struct Inner {
    state: ConnectionState,
    /// Assigned once at first registration, never reassigned.
    identity: Option<String>,
    properties: HashMap<String, Value>,
    /// Property names whose next local write is host-originated and
    /// must not be echoed back. Single-use, per name.
    suppress_echo: HashSet<String>,
    /// Live host handle; present only while connected.
    host: Option<Arc<dyn HostSession>>,
    /// Session discovered (or probed at reconnect) but not yet
    /// confirmed; promoted to `host` at `announce_connected`.
    pending_host: Option<Arc<dyn HostSession>>,
    poller_cancel: Option<CancelHandle>,
}

enum AttachAction {
    SpawnPoller(CancelHandle),
    Reconnect(String),
    Ignore,
}

impl ComponentInstance {
    /// Create a new instance of the given component type.
    ///
    /// The instance starts unregistered, with its properties at the
    /// defaults declared by the definition.
    pub fn new(definition: ComponentDefinition, env: Arc<BridgeEnvironment>) -> Self {
        Self {
            shared: Arc::new(Shared {
                tag: definition.tag,
                env,
                inner: RwLock::new(Inner {
                    state: ConnectionState::Unregistered,
                    identity: None,
                    properties: definition.properties,
                    suppress_echo: HashSet::new(),
                    host: None,
                    pending_host: None,
                    poller_cancel: None,
                }),
            }),
        }
    }

    /// The component type tag.
    pub fn tag(&self) -> &str {
        &self.shared.tag
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.read().state
    }

    /// Identity assigned at first registration, if any.
    pub fn identity(&self) -> Option<String> {
        self.read().identity.clone()
    }

    /// Current value of one mirrored property.
    pub fn property(&self, name: &str) -> Option<Value> {
        self.read().properties.get(name).cloned()
    }

    /// Snapshot of all mirrored properties.
    pub fn properties(&self) -> HashMap<String, Value> {
        self.read().properties.clone()
    }

    /// Local write path for a mirrored property.
    ///
    /// Applies the value locally and notifies the host, unless the
    /// write was triggered by a prior host write (the suppression
    /// marker is consumed either way). Writes to undeclared names are
    /// ignored. With no live host handle the notification is dropped,
    /// not queued; the host pushes full state on the next connect.
    pub fn set_property(&self, name: &str, value: Value) {
        let notify = {
            let mut inner = self.write();
            if !inner.properties.contains_key(name) {
                tracing::warn!(
                    tag = %self.shared.tag,
                    property = %name,
                    "Ignoring write to undeclared property"
                );
                return;
            }
            let suppressed = inner.suppress_echo.remove(name);
            inner.properties.insert(name.to_string(), value.clone());
            if suppressed {
                tracing::trace!(
                    tag = %self.shared.tag,
                    property = %name,
                    "Applied host-originated value without echo"
                );
                None
            } else {
                inner.host.clone()
            }
        };

        // Outbound call happens outside the state lock.
        match notify {
            Some(host) => host.notify_property_changed(name, &value),
            None => {
                tracing::trace!(
                    tag = %self.shared.tag,
                    property = %name,
                    "Property change not forwarded (suppressed or no host handle)"
                );
            }
        }
    }

    /// Host write entry point.
    ///
    /// Unknown property names are silently ignored so a stale or
    /// malicious host payload cannot inject fields this component type
    /// never declared. Known names are marked for echo suppression and
    /// applied through the ordinary local write path.
    pub fn apply_host_value(&self, name: &str, value: Value) {
        {
            let mut inner = self.write();
            if !inner.properties.contains_key(name) {
                tracing::warn!(
                    tag = %self.shared.tag,
                    property = %name,
                    "Rejecting host write to unknown property"
                );
                return;
            }
            inner.suppress_echo.insert(name.to_string());
        }
        self.set_property(name, value);
    }

    /// Container attach hook.
    ///
    /// First attach (no identity yet) starts the discovery poller;
    /// a reattach issues a single reconnect probe instead — no polling,
    /// and a miss is dropped rather than retried.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn handle_attach(&self) {
        let action = {
            let mut inner = self.write();
            if inner.state.is_terminal() {
                tracing::warn!(tag = %self.shared.tag, "Attach on destroyed instance ignored");
                AttachAction::Ignore
            } else if let Some(identity) = inner.identity.clone() {
                inner.state = ConnectionState::Reconnecting;
                tracing::debug!(
                    tag = %self.shared.tag,
                    identity = %identity,
                    "Reattached, issuing reconnect"
                );
                AttachAction::Reconnect(identity)
            } else if inner.poller_cancel.is_some() {
                // A detach/reattach cycle while discovery is still
                // running: the poller keeps going, but the instance is
                // attached and registering again, so the host's connect
                // announcement must not be dropped by the state guard.
                inner.state = ConnectionState::Registering;
                tracing::debug!(tag = %self.shared.tag, "Reattached while discovery still running");
                AttachAction::Ignore
            } else {
                let cancel = CancelHandle::new();
                inner.state = ConnectionState::Registering;
                inner.poller_cancel = Some(cancel.clone());
                tracing::debug!(tag = %self.shared.tag, "First attach, starting host discovery");
                AttachAction::SpawnPoller(cancel)
            }
        };

        match action {
            AttachAction::SpawnPoller(cancel) => {
                let poller =
                    DiscoveryPoller::new(self.clone(), Arc::clone(&self.shared.env), cancel);
                tokio::spawn(poller.run());
            }
            AttachAction::Reconnect(identity) => self.reconnect(&identity),
            AttachAction::Ignore => {}
        }
    }

    fn reconnect(&self, identity: &str) {
        match self.shared.env.discovery().find_ready_session(&self.shared.tag) {
            Some(session) => {
                session.reconnect_component(identity);
                let mut inner = self.write();
                if !inner.state.is_terminal() {
                    inner.pending_host = Some(session);
                }
            }
            None => {
                // The host session re-establishes reachability on its
                // own; this layer does not retry a missed reconnect.
                tracing::debug!(
                    tag = %self.shared.tag,
                    identity = %identity,
                    "No host session reachable at reconnect, dropping"
                );
            }
        }
    }

    /// Container detach hook.
    ///
    /// Tells the host the instance is disconnecting, then drops the
    /// host handle and any pending suppression markers. Identity and
    /// properties survive for a later reattach.
    pub fn handle_detach(&self) {
        let notify = {
            let mut inner = self.write();
            if inner.state.is_terminal() {
                tracing::warn!(tag = %self.shared.tag, "Detach on destroyed instance ignored");
                return;
            }
            inner.pending_host = None;
            inner.suppress_echo.clear();
            inner.state = ConnectionState::Detached;
            inner.host.take()
        };

        if let Some(host) = notify {
            host.notify_disconnected();
        }
        tracing::debug!(tag = %self.shared.tag, "Detached from container");
    }

    /// Host callback confirming it is aware of this instance.
    ///
    /// Transitions registering/reconnecting to connected and pushes the
    /// full property set so the host never depends on buffered deltas.
    pub fn announce_connected(&self) {
        let push = {
            let mut inner = self.write();
            match inner.state {
                ConnectionState::Registering | ConnectionState::Reconnecting => {
                    if let Some(session) = inner.pending_host.take() {
                        inner.host = Some(session);
                    }
                    inner.state = ConnectionState::Connected;
                    tracing::info!(
                        tag = %self.shared.tag,
                        identity = inner.identity.as_deref().unwrap_or(""),
                        "Host confirmed connection"
                    );
                    inner
                        .host
                        .clone()
                        .map(|host| (host, inner.properties.clone()))
                }
                other => {
                    tracing::debug!(
                        tag = %self.shared.tag,
                        state = %other,
                        "Ignoring connect announcement in unexpected state"
                    );
                    None
                }
            }
        };

        if let Some((host, properties)) = push {
            for (name, value) in &properties {
                host.notify_property_changed(name, value);
            }
        }
    }

    /// Permanent teardown by the container.
    ///
    /// Cancels any in-flight discovery so the polling loop cannot
    /// outlive the instance, and removes the registry entry. Idempotent.
    pub fn destroy(&self) {
        let (cancel, identity) = {
            let mut inner = self.write();
            if inner.state.is_terminal() {
                return;
            }
            inner.state = ConnectionState::Destroyed;
            inner.host = None;
            inner.pending_host = None;
            inner.suppress_echo.clear();
            (inner.poller_cancel.take(), inner.identity.clone())
        };

        if let Some(cancel) = cancel {
            cancel.cancel();
        }
        if let Some(identity) = &identity {
            self.shared.env.instances().remove(identity);
        }
        tracing::info!(
            tag = %self.shared.tag,
            identity = identity.as_deref().unwrap_or(""),
            "Instance destroyed"
        );
    }

    /// Record the outcome of a successful discovery: the identity is
    /// assigned (once, ever) and the discovered session parked until
    /// the host announces the connection.
    ///
    /// Returns `false` if the instance was destroyed or already holds
    /// an identity; the caller must then skip the registration call.
    pub(crate) fn complete_registration(
        &self,
        identity: &str,
        session: Arc<dyn HostSession>,
    ) -> bool {
        let mut inner = self.write();
        if inner.state.is_terminal() {
            return false;
        }
        if inner.identity.is_some() {
            tracing::warn!(
                tag = %self.shared.tag,
                identity = %identity,
                "Duplicate registration attempt ignored"
            );
            return false;
        }
        inner.identity = Some(identity.to_string());
        inner.pending_host = Some(session);
        inner.poller_cancel = None;
        true
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.shared.inner.read().expect("instance lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.shared.inner.write().expect("instance lock poisoned")
    }
}
