//! peri-protocol: Event model for Periscope agent supervision
//!
//! This crate defines the types exchanged between the connection orchestrator
//! and the per-machine realtime clients: session identifiers and snapshots,
//! the protocol event union emitted by agent daemons, and permission requests
//! for risky tool calls.

pub mod approval;
pub mod event;
pub mod session;

pub use approval::{PermissionRequest, RiskLevel};
pub use event::{ClientEvent, ConnectionStatus, ProtocolEvent};
pub use session::{SessionId, SessionInfo, SessionStatus};
