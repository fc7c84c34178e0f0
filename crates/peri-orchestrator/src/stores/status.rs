//! Connection status store

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use peri_core::types::{ConnectionStatus, MachineId};

/// Status of one machine's connection, as surfaced to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointStatus {
    /// Last reported connection status
    pub status: ConnectionStatus,
    /// Last connection-level error message, if any
    pub last_error: Option<String>,
}

impl Default for EndpointStatus {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            last_error: None,
        }
    }
}

/// Per-machine connection status plus a global aggregate
#[derive(Default)]
pub struct StatusStore {
    statuses: DashMap<MachineId, EndpointStatus>,
}

impl StatusStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            statuses: DashMap::new(),
        }
    }

    /// Record a status change for a machine
    ///
    /// A successful connect clears any stale error.
    pub fn set_status(&self, machine_id: &MachineId, status: ConnectionStatus) {
        let mut entry = self.statuses.entry(machine_id.clone()).or_default();
        entry.status = status;
        if status == ConnectionStatus::Connected {
            entry.last_error = None;
        }
    }

    /// Record a connection-level error message for a machine
    pub fn set_error(&self, machine_id: &MachineId, message: String) {
        let mut entry = self.statuses.entry(machine_id.clone()).or_default();
        entry.last_error = Some(message);
    }

    /// Drop a machine's status entry
    pub fn remove(&self, machine_id: &MachineId) {
        self.statuses.remove(machine_id);
    }

    /// Get a machine's status
    pub fn get(&self, machine_id: &MachineId) -> Option<EndpointStatus> {
        self.statuses.get(machine_id).map(|r| r.clone())
    }

    /// Mark every tracked machine as disconnected
    pub fn set_all_disconnected(&self) {
        for mut entry in self.statuses.iter_mut() {
            entry.status = ConnectionStatus::Disconnected;
        }
    }

    /// Global aggregate across all machines
    ///
    /// Connected beats connecting beats error; an empty store is
    /// disconnected.
    pub fn aggregate(&self) -> ConnectionStatus {
        let mut connecting = false;
        let mut errored = false;
        for entry in self.statuses.iter() {
            match entry.status {
                ConnectionStatus::Connected => return ConnectionStatus::Connected,
                ConnectionStatus::Connecting => connecting = true,
                ConnectionStatus::Error => errored = true,
                ConnectionStatus::Disconnected => {}
            }
        }
        if connecting {
            ConnectionStatus::Connecting
        } else if errored {
            ConnectionStatus::Error
        } else {
            ConnectionStatus::Disconnected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty_is_disconnected() {
        let store = StatusStore::new();
        assert_eq!(store.aggregate(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_aggregate_prefers_connected() {
        let store = StatusStore::new();
        store.set_status(&MachineId::new("m1"), ConnectionStatus::Error);
        store.set_status(&MachineId::new("m2"), ConnectionStatus::Connecting);
        store.set_status(&MachineId::new("m3"), ConnectionStatus::Connected);
        assert_eq!(store.aggregate(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_aggregate_connecting_beats_error() {
        let store = StatusStore::new();
        store.set_status(&MachineId::new("m1"), ConnectionStatus::Error);
        store.set_status(&MachineId::new("m2"), ConnectionStatus::Connecting);
        assert_eq!(store.aggregate(), ConnectionStatus::Connecting);
    }

    #[test]
    fn test_connected_clears_error() {
        let store = StatusStore::new();
        let m1 = MachineId::new("m1");
        store.set_error(&m1, "tunnel closed".to_string());
        store.set_status(&m1, ConnectionStatus::Connected);
        assert_eq!(store.get(&m1).unwrap().last_error, None);
    }

    #[test]
    fn test_remove_drops_entry_and_aggregate_input() {
        let store = StatusStore::new();
        let m1 = MachineId::new("m1");
        store.set_status(&m1, ConnectionStatus::Connected);
        store.set_status(&MachineId::new("m2"), ConnectionStatus::Error);

        store.remove(&m1);

        assert!(store.get(&m1).is_none());
        assert_eq!(store.aggregate(), ConnectionStatus::Error);
    }

    #[test]
    fn test_set_all_disconnected() {
        let store = StatusStore::new();
        store.set_status(&MachineId::new("m1"), ConnectionStatus::Connected);
        store.set_status(&MachineId::new("m2"), ConnectionStatus::Connecting);

        store.set_all_disconnected();

        assert_eq!(store.aggregate(), ConnectionStatus::Disconnected);
        assert_eq!(
            store.get(&MachineId::new("m1")).unwrap().status,
            ConnectionStatus::Disconnected
        );
    }
}
