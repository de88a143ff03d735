//! Discovery backends.
//!
//! The environment offers no readiness event for host sessions, so
//! discovery is a polled query: "is a session ready for this tag, and
//! if so, hand me its handle". Two backends exist in the wild — a
//! broadcast "current root" session, and a scan over all live sessions
//! with tag manifests — unified here behind one trait so the poller
//! does not care which one the environment wires in.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::host::HostSession;

/// Polled readiness query for host sessions.
pub trait HostDiscovery: Send + Sync {
    /// Return a session ready to accept a registration for `tag`, if
    /// one currently exists.
    fn find_ready_session(&self, tag: &str) -> Option<Arc<dyn HostSession>>;
}

/// Discovery via a single broadcast "current root" session.
///
/// The environment announces at most one root session; every component
/// type anchors at that root, so the tag is irrelevant to the lookup.
#[derive(Default)]
pub struct RootBroadcast {
    root: RwLock<Option<Arc<dyn HostSession>>>,
}

impl RootBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce the current root session. Replaces any previous root.
    pub fn announce_root(&self, session: Arc<dyn HostSession>) {
        let mut root = self.root.write().expect("root broadcast lock poisoned");
        *root = Some(session);
        tracing::debug!("root session announced");
    }

    /// Withdraw the root session; discovery reports not-ready until the
    /// next announcement.
    pub fn clear_root(&self) {
        let mut root = self.root.write().expect("root broadcast lock poisoned");
        *root = None;
    }
}

impl HostDiscovery for RootBroadcast {
    fn find_ready_session(&self, _tag: &str) -> Option<Arc<dyn HostSession>> {
        self.root
            .read()
            .expect("root broadcast lock poisoned")
            .clone()
    }
}

struct ScanEntry {
    tags: HashSet<String>,
    session: Arc<dyn HostSession>,
}

/// Discovery via enumeration of all live sessions.
///
/// Each session is published together with a manifest of the component
/// tags it supports; the first session whose manifest declares the
/// requested tag wins.
#[derive(Default)]
pub struct SessionScan {
    entries: RwLock<Vec<ScanEntry>>,
}

impl SessionScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a live session with the tags its manifest declares.
    pub fn publish<I, S>(&self, tags: I, session: Arc<dyn HostSession>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = ScanEntry {
            tags: tags.into_iter().map(Into::into).collect(),
            session,
        };
        let mut entries = self.entries.write().expect("session scan lock poisoned");
        entries.push(entry);
    }

    /// Retract a previously published session.
    pub fn retract(&self, session: &Arc<dyn HostSession>) {
        let mut entries = self.entries.write().expect("session scan lock poisoned");
        entries.retain(|entry| !Arc::ptr_eq(&entry.session, session));
    }
}

impl HostDiscovery for SessionScan {
    fn find_ready_session(&self, tag: &str) -> Option<Arc<dyn HostSession>> {
        let entries = self.entries.read().expect("session scan lock poisoned");
        entries
            .iter()
            .find(|entry| entry.tags.contains(tag))
            .map(|entry| Arc::clone(&entry.session))
    }
}
