//! Connection lifecycle states.

/// Connection state of a component instance.
///
/// ```text
/// Unregistered → Registering → Connected ⇄ Detached/Reconnecting
///                                  │
///                              Destroyed (terminal, from any state)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No identity, no host handle. Initial state.
    Unregistered,
    /// Attached for the first time; the discovery poller is looking
    /// for a host session to register with.
    Registering,
    /// The host has confirmed it is aware of this instance.
    Connected,
    /// Removed from the container; identity and properties retained.
    Detached,
    /// Reattached with an existing identity; a reconnect call was
    /// issued (or dropped, if no host was reachable).
    Reconnecting,
    /// Permanently discarded by the container. Terminal.
    Destroyed,
}

impl ConnectionState {
    pub fn is_terminal(self) -> bool {
        self == ConnectionState::Destroyed
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectionState::Unregistered => "unregistered",
            ConnectionState::Registering => "registering",
            ConnectionState::Connected => "connected",
            ConnectionState::Detached => "detached",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Destroyed => "destroyed",
        };
        write!(f, "{}", name)
    }
}
