//! Identity generation for component instances.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Issues stable identities of the form `{tag}-{n}` with a
/// monotonically increasing per-tag counter.
///
/// One registry exists per process, injected through the environment
/// rather than reached as a global. Counters are never reset during the
/// process lifetime, so an identity is never reissued even after the
/// instance that held it is destroyed.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    counters: Mutex<HashMap<String, u64>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next identity for a component tag.
    pub fn next_identity(&self, tag: &str) -> String {
        let mut counters = self.counters.lock();
        let counter = counters.entry(tag.to_string()).or_insert(0);
        let identity = format!("{}-{}", tag, counter);
        *counter += 1;
        identity
    }
}
