//! Command dispatcher
//!
//! Resolves which held connection receives an outbound command for a session
//! and forwards it fire-and-forget. Commands with no resolvable connection
//! are dropped, never queued: the UI already reflects connection status.

use std::sync::Arc;

use peri_core::traits::RealtimeClient;
use peri_protocol::SessionId;

use crate::state::SupervisorState;

impl SupervisorState {
    /// Connection that should receive commands for a session
    ///
    /// The session's machine wins when a connection is held for it. The
    /// fallback is the first connection opened that reports connected, which
    /// covers sessions not yet reflected in the store (e.g. immediately
    /// after creation). The first-opened order is deliberate: it matches the
    /// registry's insertion order and must not be "improved".
    pub fn resolve(&self, session_id: &SessionId) -> Option<Arc<dyn RealtimeClient>> {
        if let Some(machine_id) = self.sessions.machine_for(session_id) {
            if let Some(client) = self.manager.get(&machine_id) {
                return Some(client);
            }
        }
        self.manager.first_connected()
    }

    /// Subscribe to a session's events and history replay
    ///
    /// The history-loading flag is set unconditionally; only the delivery of
    /// the subscription depends on a connection being resolvable.
    pub async fn subscribe_to_session(&self, session_id: &SessionId) {
        self.sessions.start_history_loading(session_id);

        let Some(client) = self.resolve(session_id) else {
            tracing::debug!("No connection to subscribe to {}, dropping", session_id);
            return;
        };
        if let Err(e) = client.subscribe(std::slice::from_ref(session_id)).await {
            tracing::warn!("Subscribe to {} failed: {}", session_id, e);
        }
    }

    /// Send a user message to a session
    pub async fn send_message(&self, session_id: &SessionId, text: &str) {
        let Some(client) = self.resolve(session_id) else {
            tracing::debug!("No connection for message to {}, dropping", session_id);
            return;
        };
        if let Err(e) = client.send_message(session_id, text).await {
            tracing::warn!("Message to {} failed: {}", session_id, e);
        }
    }

    /// Approve a pending tool call
    pub async fn approve_tool_call(
        &self,
        session_id: &SessionId,
        request_id: &str,
        tool_call_id: &str,
    ) {
        let Some(client) = self.resolve(session_id) else {
            tracing::debug!("No connection for approval on {}, dropping", session_id);
            return;
        };
        if let Err(e) = client
            .approve_tool_call(session_id, request_id, tool_call_id)
            .await
        {
            tracing::warn!("Approval on {} failed: {}", session_id, e);
        }
    }

    /// Deny a pending tool call
    pub async fn deny_tool_call(
        &self,
        session_id: &SessionId,
        request_id: &str,
        tool_call_id: &str,
        reason: Option<&str>,
    ) {
        let Some(client) = self.resolve(session_id) else {
            tracing::debug!("No connection for denial on {}, dropping", session_id);
            return;
        };
        if let Err(e) = client
            .deny_tool_call(session_id, request_id, tool_call_id, reason)
            .await
        {
            tracing::warn!("Denial on {} failed: {}", session_id, e);
        }
    }

    /// Terminate a running session
    pub async fn cancel_session(&self, session_id: &SessionId) {
        let Some(client) = self.resolve(session_id) else {
            tracing::debug!("No connection to cancel {}, dropping", session_id);
            return;
        };
        if let Err(e) = client.terminate_session(session_id).await {
            tracing::warn!("Cancel of {} failed: {}", session_id, e);
        }
    }
}
