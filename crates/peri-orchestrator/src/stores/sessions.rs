//! Session store

use dashmap::DashMap;

use peri_core::types::MachineId;
use peri_protocol::{ProtocolEvent, SessionId, SessionInfo, SessionStatus};

/// One tracked session
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Session identifier
    pub id: SessionId,
    /// Machine the session runs on, once known
    pub machine_id: Option<MachineId>,
    /// Last reported status
    pub status: SessionStatus,
    /// Human-readable title, if any
    pub title: Option<String>,
    /// History replay has been requested and is in flight
    pub history_loading: bool,
    /// History replay finished
    pub history_loaded: bool,
}

impl SessionRecord {
    fn placeholder(id: SessionId) -> Self {
        Self {
            id,
            machine_id: None,
            status: SessionStatus::Starting,
            title: None,
            history_loading: false,
            history_loaded: false,
        }
    }
}

/// All known sessions across all machines, keyed by session ID
///
/// Written with per-machine snapshots and protocol-event mutations by the
/// event router; read by the command dispatcher for session-to-machine
/// resolution.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionRecord>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Machine that owns a session, if the association is known
    pub fn machine_for(&self, session_id: &SessionId) -> Option<MachineId> {
        self.sessions
            .get(session_id)
            .and_then(|r| r.machine_id.clone())
    }

    /// Replace a machine's session snapshot
    ///
    /// Sessions previously attributed to the machine but absent from the new
    /// list are dropped; history flags of surviving sessions are preserved.
    pub fn replace_snapshot(&self, machine_id: &MachineId, sessions: Vec<SessionInfo>) {
        self.sessions.retain(|id, record| {
            record.machine_id.as_ref() != Some(machine_id)
                || sessions.iter().any(|s| &s.id == id)
        });

        for info in sessions {
            match self.sessions.get_mut(&info.id) {
                Some(mut record) => {
                    record.machine_id = Some(machine_id.clone());
                    record.status = info.status;
                    record.title = info.title;
                }
                None => {
                    self.sessions.insert(
                        info.id.clone(),
                        SessionRecord {
                            id: info.id,
                            machine_id: Some(machine_id.clone()),
                            status: info.status,
                            title: info.title,
                            history_loading: false,
                            history_loaded: false,
                        },
                    );
                }
            }
        }
    }

    /// Apply a protocol event from a machine's connection
    pub fn apply_event(&self, machine_id: &MachineId, event: &ProtocolEvent) {
        let session_id = event.session_id().clone();
        let mut record = self
            .sessions
            .entry(session_id.clone())
            .or_insert_with(|| SessionRecord::placeholder(session_id));
        if record.machine_id.is_none() {
            record.machine_id = Some(machine_id.clone());
        }

        match event {
            ProtocolEvent::SessionStatusChanged { status, .. } => {
                record.status = *status;
            }
            ProtocolEvent::PermissionRequested(_) => {
                record.status = SessionStatus::WaitingForApproval;
            }
            ProtocolEvent::PermissionResolved { .. } => {
                if record.status == SessionStatus::WaitingForApproval {
                    record.status = SessionStatus::Running;
                }
            }
            // Message and tool-call payloads are rendered elsewhere; only
            // the status association matters here.
            ProtocolEvent::AgentMessage { .. } | ProtocolEvent::ToolCallFinished { .. } => {}
        }
    }

    /// Mark a session's history replay as requested
    ///
    /// Set unconditionally, even when no connection can deliver the
    /// subscription; the flag reflects intent, not delivery.
    pub fn start_history_loading(&self, session_id: &SessionId) {
        let mut record = self
            .sessions
            .entry(session_id.clone())
            .or_insert_with(|| SessionRecord::placeholder(session_id.clone()));
        record.history_loading = true;
        record.history_loaded = false;
    }

    /// Mark a session's history replay as finished
    pub fn finish_history_loading(&self, session_id: &SessionId) {
        if let Some(mut record) = self.sessions.get_mut(session_id) {
            record.history_loading = false;
            record.history_loaded = true;
        }
    }

    /// Get a session by ID
    pub fn get(&self, session_id: &SessionId) -> Option<SessionRecord> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    /// List all sessions
    pub fn list(&self) -> Vec<SessionRecord> {
        self.sessions.iter().map(|r| r.clone()).collect()
    }

    /// Number of sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, status: SessionStatus) -> SessionInfo {
        SessionInfo {
            id: SessionId::new(id),
            status,
            title: None,
        }
    }

    #[test]
    fn test_snapshot_replaces_machine_sessions() {
        let store = SessionStore::new();
        let m1 = MachineId::new("m1");
        let m2 = MachineId::new("m2");

        store.replace_snapshot(
            &m1,
            vec![
                info("s1", SessionStatus::Running),
                info("s2", SessionStatus::Completed),
            ],
        );
        store.replace_snapshot(&m2, vec![info("s3", SessionStatus::Running)]);

        // s2 is gone from m1's next snapshot; m2's sessions are untouched
        store.replace_snapshot(&m1, vec![info("s1", SessionStatus::WaitingForInput)]);

        assert_eq!(store.len(), 2);
        assert!(store.get(&SessionId::new("s2")).is_none());
        assert_eq!(
            store.get(&SessionId::new("s1")).unwrap().status,
            SessionStatus::WaitingForInput
        );
        assert_eq!(store.machine_for(&SessionId::new("s3")), Some(m2));
    }

    #[test]
    fn test_snapshot_preserves_history_flags() {
        let store = SessionStore::new();
        let m1 = MachineId::new("m1");
        let s1 = SessionId::new("s1");

        store.replace_snapshot(&m1, vec![info("s1", SessionStatus::Running)]);
        store.start_history_loading(&s1);
        store.finish_history_loading(&s1);

        store.replace_snapshot(&m1, vec![info("s1", SessionStatus::Running)]);
        assert!(store.get(&s1).unwrap().history_loaded);
    }

    #[test]
    fn test_apply_event_learns_machine_association() {
        let store = SessionStore::new();
        let m1 = MachineId::new("m1");

        store.apply_event(
            &m1,
            &ProtocolEvent::SessionStatusChanged {
                session_id: SessionId::new("s1"),
                status: SessionStatus::Running,
            },
        );

        assert_eq!(store.machine_for(&SessionId::new("s1")), Some(m1));
    }

    #[test]
    fn test_permission_events_toggle_waiting_status() {
        let store = SessionStore::new();
        let m1 = MachineId::new("m1");
        let s1 = SessionId::new("s1");

        store.apply_event(
            &m1,
            &ProtocolEvent::PermissionRequested(peri_protocol::PermissionRequest {
                session_id: s1.clone(),
                request_id: "r1".to_string(),
                tool_call_id: "tc1".to_string(),
                tool_name: "bash".to_string(),
                risk_level: peri_protocol::RiskLevel::Low,
                expires_at: None,
            }),
        );
        assert_eq!(
            store.get(&s1).unwrap().status,
            SessionStatus::WaitingForApproval
        );

        store.apply_event(
            &m1,
            &ProtocolEvent::PermissionResolved {
                session_id: s1.clone(),
                request_id: "r1".to_string(),
            },
        );
        assert_eq!(store.get(&s1).unwrap().status, SessionStatus::Running);
    }

    #[test]
    fn test_history_loading_without_session() {
        let store = SessionStore::new();
        let s1 = SessionId::new("s1");

        store.start_history_loading(&s1);

        let record = store.get(&s1).unwrap();
        assert!(record.history_loading);
        assert!(record.machine_id.is_none());
    }
}
