//! Outbound interface to a live host session.

use serde_json::Value;

/// A live remote-host session capable of accepting registrations and
/// property updates.
///
/// Every call is fire-and-forget: the bridge neither waits for nor
/// interprets a host-side result. A session that has gone away is free
/// to ignore calls; the bridge recovers by pushing full state on the
/// next connect rather than buffering deltas.
///
/// Hosts that multiplex many instances over one connection should hand
/// each instance its own session facade; `notify_property_changed` and
/// `notify_disconnected` carry no identity by design.
pub trait HostSession: Send + Sync {
    /// A mirrored property changed locally.
    fn notify_property_changed(&self, property: &str, value: &Value);

    /// First-time registration of a component instance. Called exactly
    /// once per instance lifetime.
    fn register_component(&self, tag: &str, identity: &str);

    /// Re-associate an existing identity after the instance was
    /// reattached to its container.
    fn reconnect_component(&self, identity: &str);

    /// The instance detached from its container.
    fn notify_disconnected(&self);
}
