//! The component proxy: local property mirror, echo suppression, and
//! the registration/connection state machine.

mod instance;
mod state;

pub use instance::ComponentInstance;
pub use state::ConnectionState;
