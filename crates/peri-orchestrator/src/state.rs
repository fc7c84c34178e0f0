//! Shared supervisor state

use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use peri_core::config::SupervisorConfig;
use peri_core::traits::ClientFactory;
use peri_core::types::MachineId;
use peri_protocol::ClientEvent;

use crate::approval::ApprovalEngine;
use crate::manager::ConnectionManager;
use crate::registry;
use crate::stores::{MachineStore, PreferenceStore, SessionStore, StatusStore};

/// Everything the supervisor's components share
///
/// The connection manager and approval seen-set are exclusively owned here;
/// the stores are exposed as `Arc` handles for the UI layer to observe.
pub struct SupervisorState {
    /// Configuration
    pub config: SupervisorConfig,
    /// Factory constructing realtime clients
    pub factory: Arc<dyn ClientFactory>,
    /// Machine list (read for the connectable set)
    pub machines: Arc<MachineStore>,
    /// Session state (snapshots in, machine lookups out)
    pub sessions: Arc<SessionStore>,
    /// Auto-approval policy
    pub preferences: Arc<PreferenceStore>,
    /// Per-machine connection status
    pub status: Arc<StatusStore>,
    /// Held connections
    pub manager: ConnectionManager,
    /// Auto-approval dedup state
    pub approvals: ApprovalEngine,
    /// Cancellation for the router and watcher tasks
    pub cancel: CancellationToken,

    event_tx: mpsc::Sender<(MachineId, ClientEvent)>,
    credential: RwLock<Option<String>>,
}

impl SupervisorState {
    /// Create state wired to the given inbound event channel
    pub fn new(
        config: SupervisorConfig,
        factory: Arc<dyn ClientFactory>,
        event_tx: mpsc::Sender<(MachineId, ClientEvent)>,
    ) -> Self {
        let seen_cap = config.seen_cap;
        Self {
            config,
            factory,
            machines: Arc::new(MachineStore::new()),
            sessions: Arc::new(SessionStore::new()),
            preferences: Arc::new(PreferenceStore::new()),
            status: Arc::new(StatusStore::new()),
            manager: ConnectionManager::new(),
            approvals: ApprovalEngine::new(seen_cap),
            cancel: CancellationToken::new(),
            event_tx,
            credential: RwLock::new(None),
        }
    }

    /// Store or clear the realtime credential
    pub fn set_credential(&self, credential: Option<String>) {
        *self.credential.write().unwrap() = credential;
    }

    /// Current credential, if authenticated
    pub fn credential(&self) -> Option<String> {
        self.credential.read().unwrap().clone()
    }

    /// Whether a credential is present
    pub fn authenticated(&self) -> bool {
        self.credential.read().unwrap().is_some()
    }

    /// Sender for the inbound client-event channel
    pub fn event_sender(&self) -> mpsc::Sender<(MachineId, ClientEvent)> {
        self.event_tx.clone()
    }

    /// Recompute the connectable set and converge held connections to it
    pub async fn reconcile(&self) {
        let connectable = registry::connectable(&self.machines, self.authenticated());
        let credential = self.credential().unwrap_or_default();
        tracing::debug!("Reconciling against {} connectable machines", connectable.len());
        self.manager
            .reconcile(
                &connectable,
                &self.factory,
                &credential,
                self.event_tx.clone(),
                &self.status,
            )
            .await;
    }
}
