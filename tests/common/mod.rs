//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};

use hostbridge::{
    BridgeEnvironment, ComponentDefinition, ComponentInstance, HostDiscovery, HostSession,
    RootBroadcast,
};

/// One outbound call observed by a [`RecordingSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PropertyChanged { property: String, value: Value },
    Registered { tag: String, identity: String },
    Reconnected { identity: String },
    Disconnected,
}

/// Host session double that records every outbound call.
#[derive(Default)]
pub struct RecordingSession {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSession {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn changes(&self) -> Vec<(String, Value)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::PropertyChanged { property, value } => Some((property, value)),
                _ => None,
            })
            .collect()
    }

    pub fn registered_count(&self) -> usize {
        self.count(|event| matches!(event, SessionEvent::Registered { .. }))
    }

    pub fn reconnect_count(&self) -> usize {
        self.count(|event| matches!(event, SessionEvent::Reconnected { .. }))
    }

    pub fn disconnect_count(&self) -> usize {
        self.count(|event| matches!(event, SessionEvent::Disconnected))
    }

    fn count(&self, predicate: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }
}

impl HostSession for RecordingSession {
    fn notify_property_changed(&self, property: &str, value: &Value) {
        self.events.lock().push(SessionEvent::PropertyChanged {
            property: property.to_string(),
            value: value.clone(),
        });
    }

    fn register_component(&self, tag: &str, identity: &str) {
        self.events.lock().push(SessionEvent::Registered {
            tag: tag.to_string(),
            identity: identity.to_string(),
        });
    }

    fn reconnect_component(&self, identity: &str) {
        self.events.lock().push(SessionEvent::Reconnected {
            identity: identity.to_string(),
        });
    }

    fn notify_disconnected(&self) {
        self.events.lock().push(SessionEvent::Disconnected);
    }
}

/// Discovery wrapper that counts readiness queries.
pub struct CountingDiscovery {
    inner: Arc<dyn HostDiscovery>,
    queries: AtomicU64,
}

impl CountingDiscovery {
    pub fn new(inner: Arc<dyn HostDiscovery>) -> Self {
        Self {
            inner,
            queries: AtomicU64::new(0),
        }
    }

    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::SeqCst)
    }
}

impl HostDiscovery for CountingDiscovery {
    fn find_ready_session(&self, tag: &str) -> Option<Arc<dyn HostSession>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_ready_session(tag)
    }
}

/// Definition used by most tests: a counter with two properties.
pub fn counter_definition() -> ComponentDefinition {
    ComponentDefinition::new(
        "my-counter",
        vec![
            ("count".to_string(), json!(0)),
            ("label".to_string(), json!("Counter")),
        ],
    )
    .expect("valid definition")
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Let the discovery poller make progress. Under a paused clock this
/// auto-advances time, so a couple of poll intervals elapse.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(25)).await;
}

/// Environment with an already-announced root session.
pub fn env_with_root(
    session: Arc<RecordingSession>,
) -> (Arc<BridgeEnvironment>, Arc<RootBroadcast>) {
    let root = Arc::new(RootBroadcast::new());
    root.announce_root(session as Arc<dyn HostSession>);
    let env = Arc::new(BridgeEnvironment::new(root.clone()));
    (env, root)
}

/// Fully connected instance: attached, registered, and announced, with
/// the connect-time state push already cleared from the recorder.
pub async fn connected_instance() -> (
    Arc<BridgeEnvironment>,
    Arc<RecordingSession>,
    ComponentInstance,
) {
    let session = Arc::new(RecordingSession::default());
    let (env, _root) = env_with_root(Arc::clone(&session));
    let instance = ComponentInstance::new(counter_definition(), Arc::clone(&env));
    instance.handle_attach();
    settle().await;

    let identity = instance.identity().expect("instance registered");
    let routed = env
        .instances()
        .get(&identity)
        .expect("instance in registry");
    routed.announce_connected();
    session.clear();

    (env, session, instance)
}
