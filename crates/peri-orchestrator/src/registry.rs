//! Endpoint registry
//!
//! Derives the set of machines a connection should be held to. Pure; the
//! connection manager diffs its output against the held connections.

use peri_core::types::MachineRecord;

use crate::stores::MachineStore;

/// Machines eligible for a connection: online, with an endpoint, and only
/// when the user is authenticated
pub fn connectable(machines: &MachineStore, authenticated: bool) -> Vec<MachineRecord> {
    if !authenticated {
        return Vec::new();
    }
    machines
        .list()
        .into_iter()
        .filter(|m| m.is_connectable())
        .collect()
}
