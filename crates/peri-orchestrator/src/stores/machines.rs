//! Machine list store

use dashmap::DashMap;

use peri_core::types::{MachineId, MachineRecord};

/// Current machine list, keyed by machine ID
///
/// Populated by the surrounding application (REST sync); the orchestrator
/// only reads it to compute the connectable set.
#[derive(Default)]
pub struct MachineStore {
    machines: DashMap<MachineId, MachineRecord>,
}

impl MachineStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            machines: DashMap::new(),
        }
    }

    /// Replace the whole machine list
    pub fn replace_all(&self, machines: Vec<MachineRecord>) {
        self.machines.clear();
        for machine in machines {
            self.machines.insert(machine.id.clone(), machine);
        }
    }

    /// Insert or update a single machine
    pub fn upsert(&self, machine: MachineRecord) {
        self.machines.insert(machine.id.clone(), machine);
    }

    /// Remove a machine
    pub fn remove(&self, machine_id: &MachineId) {
        self.machines.remove(machine_id);
    }

    /// Get a machine by ID
    pub fn get(&self, machine_id: &MachineId) -> Option<MachineRecord> {
        self.machines.get(machine_id).map(|r| r.clone())
    }

    /// List all machines, sorted by ID for deterministic iteration
    pub fn list(&self) -> Vec<MachineRecord> {
        let mut machines: Vec<MachineRecord> =
            self.machines.iter().map(|r| r.clone()).collect();
        machines.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        machines
    }

    /// Number of machines
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}
