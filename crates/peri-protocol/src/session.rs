//! Session identifier and snapshot types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an agent session
///
/// Session ids are opaque strings issued by the machine's daemon; the client
/// never parses or generates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a new session ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle status of an agent session as reported by its daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session is starting up
    Starting,
    /// Agent is actively working
    Running,
    /// Agent is waiting for a user message
    WaitingForInput,
    /// Agent is blocked on a permission request
    WaitingForApproval,
    /// Session finished successfully
    Completed,
    /// Session finished with an error
    Failed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Starting => write!(f, "starting"),
            SessionStatus::Running => write!(f, "running"),
            SessionStatus::WaitingForInput => write!(f, "waiting_for_input"),
            SessionStatus::WaitingForApproval => write!(f, "waiting_for_approval"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One entry of a machine's session-list snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session identifier
    pub id: SessionId,
    /// Current status
    pub status: SessionStatus,
    /// Human-readable title, if the daemon assigned one
    pub title: Option<String>,
}
