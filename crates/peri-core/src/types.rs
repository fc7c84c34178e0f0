//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

pub use peri_protocol::ConnectionStatus;

/// Unique identifier for a machine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(pub String);

impl MachineId {
    /// Create a new machine ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MachineId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MachineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A machine as reported by the external machines store
///
/// The orchestrator only reads these; creation and updates belong to the
/// REST layer that syncs the machine list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Stable machine identity
    pub id: MachineId,
    /// Whether the daemon last reported itself online
    pub is_online: bool,
    /// Realtime tunnel endpoint, if the machine has one provisioned
    pub endpoint: Option<String>,
}

impl MachineRecord {
    /// Create a record
    pub fn new(id: impl Into<MachineId>, is_online: bool, endpoint: Option<String>) -> Self {
        Self {
            id: id.into(),
            is_online,
            endpoint,
        }
    }

    /// Whether a connection should be held to this machine
    pub fn is_connectable(&self) -> bool {
        self.is_online && self.endpoint.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_id_display() {
        let id = MachineId::new("m1");
        assert_eq!(format!("{}", id), "m1");
    }

    #[test]
    fn test_connectable_requires_online_and_endpoint() {
        let m = MachineRecord::new("m1", true, Some("wss://a".to_string()));
        assert!(m.is_connectable());

        let m = MachineRecord::new("m2", false, Some("wss://b".to_string()));
        assert!(!m.is_connectable());

        let m = MachineRecord::new("m3", true, None);
        assert!(!m.is_connectable());
    }
}
