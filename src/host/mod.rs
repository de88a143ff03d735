//! Host-side collaborators: the session interface the bridge calls out
//! to, and the registries shared between instances and the host.

mod identity;
mod registry;
mod session;

pub use identity::IdentityRegistry;
pub use registry::InstanceRegistry;
pub use session::HostSession;
