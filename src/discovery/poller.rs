//! Per-instance discovery polling loop.

use std::sync::Arc;

use crate::component::ComponentInstance;
use crate::environment::BridgeEnvironment;

use super::cancel::CancelHandle;

/// Polls the environment until a host session is ready for the owning
/// instance, then performs the one-time registration and terminates.
///
/// The loop is intentionally unbounded — fixed interval, no backoff, no
/// deadline — so the instance is guaranteed to register eventually once
/// the host comes up. The only exit paths are a successful registration
/// and cancellation via the handle set at instance destruction.
pub struct DiscoveryPoller {
    instance: ComponentInstance,
    env: Arc<BridgeEnvironment>,
    cancel: CancelHandle,
}

impl DiscoveryPoller {
    pub fn new(
        instance: ComponentInstance,
        env: Arc<BridgeEnvironment>,
        cancel: CancelHandle,
    ) -> Self {
        Self {
            instance,
            env,
            cancel,
        }
    }

    /// Drive the loop to completion. Spawned as a task on first attach.
    pub async fn run(self) {
        let tag = self.instance.tag().to_string();
        loop {
            if self.cancel.is_cancelled() {
                tracing::debug!(tag = %tag, "Discovery cancelled");
                return;
            }

            if let Some(session) = self.env.discovery().find_ready_session(&tag) {
                let identity = self.env.identities().next_identity(&tag);
                if !self
                    .instance
                    .complete_registration(&identity, Arc::clone(&session))
                {
                    // Instance was destroyed or already registered while
                    // we held the session; do not touch the host.
                    return;
                }
                self.env.instances().insert(&identity, self.instance.clone());
                session.register_component(&tag, &identity);
                tracing::info!(
                    tag = %tag,
                    identity = %identity,
                    "Component registered with host session"
                );
                return;
            }

            tokio::select! {
                _ = self.cancel.wait() => {
                    tracing::debug!(tag = %tag, "Discovery cancelled while waiting");
                    return;
                }
                _ = tokio::time::sleep(self.env.poll_interval()) => {}
            }
        }
    }
}
