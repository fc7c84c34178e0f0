//! Public supervisor surface
//!
//! One `Supervisor` per signed-in user. The UI layer calls its operations
//! and observes the stores it exposes; every operation is best-effort and
//! void-returning. Recovery from almost any fault is the same move:
//! recompute the desired connection set and reconcile.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use peri_core::config::SupervisorConfig;
use peri_core::traits::ClientFactory;
use peri_core::types::MachineRecord;
use peri_protocol::SessionId;

use crate::lifecycle::{self, AppPhase};
use crate::router;
use crate::state::SupervisorState;
use crate::stores::{MachineStore, PreferenceStore, SessionStore, StatusStore};

/// Handle to the connection orchestrator
pub struct Supervisor {
    state: Arc<SupervisorState>,
    router: JoinHandle<()>,
}

impl Supervisor {
    /// Create a supervisor and start its event router
    pub fn new(config: SupervisorConfig, factory: Arc<dyn ClientFactory>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.event_channel_capacity);
        let state = Arc::new(SupervisorState::new(config, factory, event_tx));
        let router = router::spawn_router(Arc::clone(&state), event_rx);

        Self { state, router }
    }

    /// Shared state, for components that need direct access
    pub fn state(&self) -> &Arc<SupervisorState> {
        &self.state
    }

    /// Machine list store handle
    pub fn machines(&self) -> Arc<MachineStore> {
        Arc::clone(&self.state.machines)
    }

    /// Session store handle
    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.state.sessions)
    }

    /// Preference store handle
    pub fn preferences(&self) -> Arc<PreferenceStore> {
        Arc::clone(&self.state.preferences)
    }

    /// Connection status store handle
    pub fn status(&self) -> Arc<StatusStore> {
        Arc::clone(&self.state.status)
    }

    /// Store or clear the realtime credential, then reconcile
    ///
    /// Clearing the credential disconnects everything: the connectable set
    /// is empty while unauthenticated.
    pub async fn set_credential(&self, credential: Option<String>) {
        self.state.set_credential(credential);
        self.state.reconcile().await;
    }

    /// Open a connection to every connectable machine
    pub async fn connect_all(&self) {
        self.state.reconcile().await;
    }

    /// Close every held connection
    pub async fn disconnect_all(&self) {
        self.state.manager.disconnect_all(&self.state.status).await;
    }

    /// Tear everything down and reconnect from scratch
    ///
    /// The settle delay between the closes and the new opens keeps a fresh
    /// connect from racing a not-yet-finished disconnect against the same
    /// endpoint.
    pub async fn refresh_all(&self) {
        tracing::info!("Manual refresh requested");
        self.disconnect_all().await;
        tokio::time::sleep(self.state.config.refresh_settle_delay).await;
        self.state.reconcile().await;
    }

    /// Replace the machine list and reconcile against it
    pub async fn sync_machines(&self, machines: Vec<MachineRecord>) {
        self.state.machines.replace_all(machines);
        self.state.reconcile().await;
    }

    /// Subscribe to a session's events and history replay
    pub async fn subscribe_to_session(&self, session_id: &SessionId) {
        self.state.subscribe_to_session(session_id).await;
    }

    /// Send a user message to a session
    pub async fn send_message(&self, session_id: &SessionId, text: &str) {
        self.state.send_message(session_id, text).await;
    }

    /// Approve a pending tool call
    pub async fn approve_tool_call(
        &self,
        session_id: &SessionId,
        request_id: &str,
        tool_call_id: &str,
    ) {
        self.state
            .approve_tool_call(session_id, request_id, tool_call_id)
            .await;
    }

    /// Deny a pending tool call
    pub async fn deny_tool_call(
        &self,
        session_id: &SessionId,
        request_id: &str,
        tool_call_id: &str,
        reason: Option<&str>,
    ) {
        self.state
            .deny_tool_call(session_id, request_id, tool_call_id, reason)
            .await;
    }

    /// Terminate a running session
    pub async fn cancel_session(&self, session_id: &SessionId) {
        self.state.cancel_session(session_id).await;
    }

    /// Watch the host app's foreground/background signal
    pub fn watch_lifecycle(&self, phases: watch::Receiver<AppPhase>) -> JoinHandle<()> {
        lifecycle::spawn_watcher(Arc::clone(&self.state), phases)
    }

    /// Stop background tasks and close every connection
    pub async fn shutdown(&self) {
        tracing::info!("Supervisor shutting down");
        self.state.cancel.cancel();
        self.disconnect_all().await;
        self.router.abort();
    }
}
