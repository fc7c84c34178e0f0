//! Connection lifecycle manager
//!
//! Exclusively owns the table of realtime connections, keyed by machine ID.
//! At most one connection exists per machine at any time; a stale connection
//! is closed before a replacement for the same machine is created. All
//! operations are idempotent, because the same external triggers (machine
//! list change, foreground event, manual refresh) can fire in overlapping
//! succession.
//!
//! This layer never retries: the realtime client owns backoff for a single
//! connection, the manager only decides whether a connection should exist.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::sync::Mutex as AsyncMutex;

use peri_core::traits::{ClientFactory, EventSink, RealtimeClient};
use peri_core::types::{ConnectionStatus, MachineId, MachineRecord};
use peri_protocol::ClientEvent;

use crate::stores::StatusStore;

/// One held connection
pub struct ManagedConnection {
    /// Machine this connection is bound to
    pub machine_id: MachineId,
    /// Endpoint the client was constructed against
    pub endpoint: String,
    /// Underlying realtime client
    pub client: Arc<dyn RealtimeClient>,
}

/// Table of held connections plus the order they were opened in
///
/// The insertion-order list fixes the "first connected client" fallback used
/// by the command dispatcher; `DashMap` iteration order is unspecified.
///
/// The gate serializes every mutating operation: reconcile triggers come
/// from several tasks (the lifecycle watcher, UI-driven calls), and the
/// check-then-construct-then-insert sequence in `connect` must not
/// interleave, or two racing reconciles could each construct a client for
/// the same machine and leak the overwritten one without a close.
pub struct ConnectionManager {
    connections: DashMap<MachineId, ManagedConnection>,
    order: Mutex<Vec<MachineId>>,
    gate: AsyncMutex<()>,
}

impl ConnectionManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            order: Mutex::new(Vec::new()),
            gate: AsyncMutex::new(()),
        }
    }

    /// Open a connection to a machine
    ///
    /// No-op when the held client already reports `Connected`. A held client
    /// in any other state is disconnected first, then exactly one new client
    /// is constructed and told to connect.
    pub async fn connect(
        &self,
        machine: &MachineRecord,
        factory: &Arc<dyn ClientFactory>,
        credential: &str,
        events: mpsc::Sender<(MachineId, ClientEvent)>,
        status: &StatusStore,
    ) {
        let _gate = self.gate.lock().await;
        self.connect_locked(machine, factory, credential, events, status)
            .await;
    }

    async fn connect_locked(
        &self,
        machine: &MachineRecord,
        factory: &Arc<dyn ClientFactory>,
        credential: &str,
        events: mpsc::Sender<(MachineId, ClientEvent)>,
        status: &StatusStore,
    ) {
        let Some(endpoint) = machine.endpoint.as_deref() else {
            tracing::debug!("Machine {} has no endpoint, skipping", machine.id);
            return;
        };

        if let Some(existing) = self.connections.get(&machine.id) {
            if existing.client.status() == ConnectionStatus::Connected {
                return;
            }
            drop(existing);
            tracing::info!("Replacing stale connection to {}", machine.id);
            self.disconnect_locked(&machine.id, status).await;
        }

        tracing::info!("Connecting to {} at {}", machine.id, endpoint);
        let sink = EventSink::new(machine.id.clone(), events);
        let client = factory.create(endpoint, credential, sink);

        self.connections.insert(
            machine.id.clone(),
            ManagedConnection {
                machine_id: machine.id.clone(),
                endpoint: endpoint.to_string(),
                client: Arc::clone(&client),
            },
        );
        {
            let mut order = self.order.lock().unwrap();
            if !order.contains(&machine.id) {
                order.push(machine.id.clone());
            }
        }
        status.set_status(&machine.id, ConnectionStatus::Connecting);

        if let Err(e) = client.connect().await {
            tracing::warn!("Connect to {} failed: {}", machine.id, e);
            status.set_error(&machine.id, e.to_string());
        }
    }

    /// Close and forget a machine's connection; unknown IDs are a no-op
    ///
    /// Drops the machine's status entry entirely; a machine without a held
    /// connection has no status to report.
    pub async fn disconnect(&self, machine_id: &MachineId, status: &StatusStore) {
        let _gate = self.gate.lock().await;
        self.disconnect_locked(machine_id, status).await;
    }

    async fn disconnect_locked(&self, machine_id: &MachineId, status: &StatusStore) {
        let Some((_, held)) = self.connections.remove(machine_id) else {
            return;
        };
        self.order.lock().unwrap().retain(|id| id != machine_id);

        tracing::info!("Disconnecting from {}", machine_id);
        if let Err(e) = held.client.disconnect().await {
            tracing::debug!("Disconnect from {} reported: {}", machine_id, e);
        }
        status.remove(machine_id);
    }

    /// Converge held connections to the connectable set
    ///
    /// Re-entrant: repeated calls with the same input cause no extra side
    /// effects, per the connect/disconnect idempotence rules.
    pub async fn reconcile(
        &self,
        connectable: &[MachineRecord],
        factory: &Arc<dyn ClientFactory>,
        credential: &str,
        events: mpsc::Sender<(MachineId, ClientEvent)>,
        status: &StatusStore,
    ) {
        let _gate = self.gate.lock().await;
        let desired: HashSet<&MachineId> = connectable.iter().map(|m| &m.id).collect();

        for machine_id in self.held_ids() {
            if !desired.contains(&machine_id) {
                self.disconnect_locked(&machine_id, status).await;
            }
        }

        for machine in connectable {
            self.connect_locked(machine, factory, credential, events.clone(), status)
                .await;
        }
    }

    /// Close every held connection
    pub async fn disconnect_all(&self, status: &StatusStore) {
        let _gate = self.gate.lock().await;
        for machine_id in self.held_ids() {
            self.disconnect_locked(&machine_id, status).await;
        }
        status.set_all_disconnected();
    }

    /// Client for a machine, if a connection is held
    pub fn get(&self, machine_id: &MachineId) -> Option<Arc<dyn RealtimeClient>> {
        self.connections
            .get(machine_id)
            .map(|held| Arc::clone(&held.client))
    }

    /// First held client reporting `Connected`, in connection-open order
    pub fn first_connected(&self) -> Option<Arc<dyn RealtimeClient>> {
        let order = self.order.lock().unwrap().clone();
        order.iter().find_map(|machine_id| {
            self.connections
                .get(machine_id)
                .filter(|held| held.client.status() == ConnectionStatus::Connected)
                .map(|held| Arc::clone(&held.client))
        })
    }

    /// Machine IDs with a held connection, in connection-open order
    pub fn held_ids(&self) -> Vec<MachineId> {
        self.order.lock().unwrap().clone()
    }

    /// Number of held connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Check if no connections are held
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
