//! Auto-approval engine
//!
//! Consults the user's policy on every permission request and schedules an
//! approval exactly once per tool call. The approval is dispatched after a
//! short fixed delay rather than inside the event-handling tick, so the UI
//! can render the pending state first.
//!
//! Best-effort by design: an approval scheduled but not yet fired is lost on
//! process exit, and disconnecting a machine does not cancel its pending
//! timers; the delayed dispatch simply finds no connection and drops.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use peri_protocol::PermissionRequest;

use crate::state::SupervisorState;

/// Dedup state for auto-approvals
///
/// A tool call is approved at most once per process lifetime, tracked in a
/// bounded seen-set. When the set outgrows its cap it is cleared whole,
/// trading a theoretical re-approval after eviction for bounded memory under
/// long-lived sessions.
pub struct ApprovalEngine {
    seen: Mutex<HashSet<String>>,
    cap: usize,
}

impl ApprovalEngine {
    /// Create an engine with the given seen-set capacity
    pub fn new(cap: usize) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            cap,
        }
    }

    /// Record a tool call as actioned
    ///
    /// Returns `false` when the tool call was already seen (duplicate
    /// delivery of the same event).
    pub fn mark_seen(&self, tool_call_id: &str) -> bool {
        let mut seen = self.seen.lock().unwrap();
        if seen.contains(tool_call_id) {
            return false;
        }
        if seen.len() >= self.cap {
            tracing::info!("Approval seen-set reached {} entries, clearing", seen.len());
            seen.clear();
        }
        seen.insert(tool_call_id.to_string());
        true
    }

    /// Number of tracked tool calls
    pub fn seen_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

/// Handle a permission request delivered by the event router
///
/// Synchronous policy and dedup checks; the approval itself is scheduled on
/// a timer, never inlined into the router's tick.
pub fn handle_permission_request(state: &Arc<SupervisorState>, request: PermissionRequest) {
    if request.is_expired(SystemTime::now()) {
        tracing::debug!(
            "Permission request {} already expired, ignoring",
            request.request_id
        );
        return;
    }

    if !state.preferences.should_auto_approve(request.risk_level) {
        return;
    }

    if !state.approvals.mark_seen(&request.tool_call_id) {
        tracing::debug!(
            "Tool call {} already actioned, ignoring duplicate",
            request.tool_call_id
        );
        return;
    }

    tracing::info!(
        "Auto-approving {} tool call {} in {:?}",
        request.risk_level,
        request.tool_call_id,
        state.config.approval_delay
    );

    let state = Arc::clone(state);
    tokio::spawn(async move {
        tokio::time::sleep(state.config.approval_delay).await;
        state
            .approve_tool_call(
                &request.session_id,
                &request.request_id,
                &request.tool_call_id,
            )
            .await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_seen_once() {
        let engine = ApprovalEngine::new(10);
        assert!(engine.mark_seen("tc1"));
        assert!(!engine.mark_seen("tc1"));
        assert!(engine.mark_seen("tc2"));
    }

    #[test]
    fn test_seen_set_clears_at_cap() {
        let engine = ApprovalEngine::new(3);
        assert!(engine.mark_seen("tc1"));
        assert!(engine.mark_seen("tc2"));
        assert!(engine.mark_seen("tc3"));
        assert_eq!(engine.seen_count(), 3);

        // Cap reached: the whole set is evicted before the new entry
        assert!(engine.mark_seen("tc4"));
        assert_eq!(engine.seen_count(), 1);

        // Accepted trade-off: an evicted id can be approved again
        assert!(engine.mark_seen("tc1"));
    }
}
