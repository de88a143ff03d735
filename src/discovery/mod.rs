//! Host session discovery: the polled readiness query, the two
//! environment-provided backends, and the per-instance polling loop
//! that performs the one-time registration.

mod cancel;
mod poller;
mod strategy;

pub use cancel::CancelHandle;
pub use poller::DiscoveryPoller;
pub use strategy::{HostDiscovery, RootBroadcast, SessionScan};
