//! Host application lifecycle
//!
//! Mobile surfaces suspend the process in the background; the watcher
//! reconciles connections on every return to the foreground, which is the
//! only externally triggered reconnect path besides a machine-list change.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::SupervisorState;

/// Foreground/background phase of the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// App is visible and interactive
    Foreground,
    /// App is suspended or hidden
    Background,
}

/// Spawn a task reconciling connections whenever the app foregrounds
pub fn spawn_watcher(
    state: Arc<SupervisorState>,
    mut phases: watch::Receiver<AppPhase>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = state.cancel.cancelled() => {
                    tracing::debug!("Lifecycle watcher shutting down");
                    break;
                }
                changed = phases.changed() => {
                    if changed.is_err() {
                        tracing::debug!("Lifecycle signal closed, watcher stopping");
                        break;
                    }
                    let phase = *phases.borrow_and_update();
                    if phase == AppPhase::Foreground {
                        tracing::info!("App foregrounded, reconciling connections");
                        state.reconcile().await;
                    }
                }
            }
        }
    })
}
