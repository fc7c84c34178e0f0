//! Inbound event unions
//!
//! JSON-encoded tagged unions. `ProtocolEvent` is what an agent daemon emits
//! for a session; `ClientEvent` is the full set of callbacks a realtime
//! client delivers for one machine connection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::approval::PermissionRequest;
use crate::session::{SessionId, SessionInfo, SessionStatus};

/// Status of one realtime connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No connection is open
    Disconnected,
    /// Connection attempt in progress
    Connecting,
    /// Connection is open and ready
    Connected,
    /// Connection failed; the client owns any retry
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Error => write!(f, "error"),
        }
    }
}

/// Event emitted by an agent daemon for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// Session changed status
    SessionStatusChanged {
        session_id: SessionId,
        status: SessionStatus,
    },

    /// Agent produced a message
    AgentMessage { session_id: SessionId, text: String },

    /// A tool call finished executing
    ToolCallFinished {
        session_id: SessionId,
        tool_call_id: String,
    },

    /// Agent is asking permission for a tool call
    PermissionRequested(PermissionRequest),

    /// A permission request was answered or expired
    PermissionResolved {
        session_id: SessionId,
        request_id: String,
    },
}

impl ProtocolEvent {
    /// Session this event belongs to
    pub fn session_id(&self) -> &SessionId {
        match self {
            ProtocolEvent::SessionStatusChanged { session_id, .. } => session_id,
            ProtocolEvent::AgentMessage { session_id, .. } => session_id,
            ProtocolEvent::ToolCallFinished { session_id, .. } => session_id,
            ProtocolEvent::PermissionRequested(req) => &req.session_id,
            ProtocolEvent::PermissionResolved { session_id, .. } => session_id,
        }
    }
}

/// Callback delivered by a realtime client for one machine connection
///
/// Tagged with `kind` rather than `type` so a nested `ProtocolEvent`'s own
/// tag survives the flattening of the `Protocol` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Connection status changed
    StatusChanged { status: ConnectionStatus },

    /// Full session-list snapshot for the machine
    SessionList { sessions: Vec<SessionInfo> },

    /// Protocol event from one of the machine's sessions
    Protocol(ProtocolEvent),

    /// History replay for a session finished
    HistoryComplete { session_id: SessionId },

    /// Connection-level error surfaced by the client
    Error { message: String },
}
