//! Client-side bridge for components whose authoritative state lives on a
//! remote host process.
//!
//! A [`ComponentInstance`] is a local proxy for one remote-backed element.
//! It mirrors a fixed set of named properties in both directions, drives
//! its own registration lifecycle against the host, and suppresses the
//! echo loop that bidirectional mirroring would otherwise create.
//!
//! # Architecture
//!
//! ```text
//! container ──attach/detach──→ ComponentInstance ──sync/register──→ HostSession
//!                                    ↑                                  │
//!                                    └────── apply_host_value ──────────┘
//! ```
//!
//! - **ComponentInstance**: local property storage, echo suppression,
//!   connection state machine.
//! - **DiscoveryPoller**: per-instance polling loop that finds a ready
//!   host session and performs the one-time registration.
//! - **HostSession / HostDiscovery**: the external collaborators; the
//!   environment wires concrete implementations in via
//!   [`BridgeEnvironment`].

pub mod component;
pub mod definition;
pub mod discovery;
pub mod environment;
pub mod host;

pub use component::{ComponentInstance, ConnectionState};
pub use definition::{ComponentDefinition, DefinitionError};
pub use discovery::{CancelHandle, DiscoveryPoller, HostDiscovery, RootBroadcast, SessionScan};
pub use environment::BridgeEnvironment;
pub use host::{HostSession, IdentityRegistry, InstanceRegistry};
