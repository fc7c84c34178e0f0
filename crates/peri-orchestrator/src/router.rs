//! Event router
//!
//! A single task drains the machine-tagged event channel every client feeds
//! and forwards each event to the right store. Handlers are synchronous
//! state writes; anything further (auto-approval) is scheduled, not inlined,
//! so a slow consumer can never stall a connection's event loop.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use peri_core::types::MachineId;
use peri_protocol::{ClientEvent, ProtocolEvent};

use crate::approval;
use crate::state::SupervisorState;

/// Spawn the router task; it stops on cancellation or channel close
pub fn spawn_router(
    state: Arc<SupervisorState>,
    mut events: mpsc::Receiver<(MachineId, ClientEvent)>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = state.cancel.cancelled() => {
                    tracing::debug!("Event router shutting down");
                    break;
                }
                received = events.recv() => {
                    match received {
                        Some((machine_id, event)) => route_event(&state, machine_id, event),
                        None => {
                            tracing::debug!("Event channel closed, router stopping");
                            break;
                        }
                    }
                }
            }
        }
    })
}

/// Forward one inbound event to shared state
fn route_event(state: &Arc<SupervisorState>, machine_id: MachineId, event: ClientEvent) {
    match event {
        ClientEvent::StatusChanged { status } => {
            tracing::debug!("Machine {} status: {}", machine_id, status);
            state.status.set_status(&machine_id, status);
        }

        ClientEvent::SessionList { sessions } => {
            tracing::debug!("Machine {} reported {} sessions", machine_id, sessions.len());
            state.sessions.replace_snapshot(&machine_id, sessions);
        }

        ClientEvent::Protocol(protocol_event) => {
            state.sessions.apply_event(&machine_id, &protocol_event);
            if let ProtocolEvent::PermissionRequested(request) = protocol_event {
                approval::handle_permission_request(state, request);
            }
        }

        ClientEvent::HistoryComplete { session_id } => {
            state.sessions.finish_history_loading(&session_id);
        }

        ClientEvent::Error { message } => {
            tracing::warn!("Machine {} connection error: {}", machine_id, message);
            state.status.set_error(&machine_id, message);
        }
    }
}
