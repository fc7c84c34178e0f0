//! Abstraction over the per-machine realtime client
//!
//! The wire protocol and framing live behind these traits; the orchestrator
//! only decides which connections exist and which one receives a command.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::ConnectionError;
use crate::types::{ConnectionStatus, MachineId};
use peri_protocol::{ClientEvent, SessionId};

/// Machine-tagged channel a client delivers its events through
///
/// Every event a client emits is tagged with the machine id the sink was
/// created for, so the router can attribute it without trusting the client.
/// `emit` never blocks; events are dropped (with a warning) if the channel
/// is full.
#[derive(Clone)]
pub struct EventSink {
    machine_id: MachineId,
    tx: mpsc::Sender<(MachineId, ClientEvent)>,
}

impl EventSink {
    /// Create a sink that tags events with the given machine id
    pub fn new(machine_id: MachineId, tx: mpsc::Sender<(MachineId, ClientEvent)>) -> Self {
        Self { machine_id, tx }
    }

    /// The machine this sink belongs to
    pub fn machine_id(&self) -> &MachineId {
        &self.machine_id
    }

    /// Deliver an event without blocking the client's event loop
    pub fn emit(&self, event: ClientEvent) {
        if let Err(e) = self.tx.try_send((self.machine_id.clone(), event)) {
            tracing::warn!("Dropping event from {}: {}", self.machine_id, e);
        }
    }
}

/// One realtime connection to a machine's agent daemon
///
/// Implementations own reconnect/backoff for their single connection; the
/// orchestrator never retries, it only decides whether the connection should
/// exist.
#[async_trait]
pub trait RealtimeClient: Send + Sync {
    /// Initiate the connection; returns once the attempt is started
    async fn connect(&self) -> Result<(), ConnectionError>;

    /// Close the connection
    async fn disconnect(&self) -> Result<(), ConnectionError>;

    /// Subscribe to events for the given sessions
    async fn subscribe(&self, session_ids: &[SessionId]) -> Result<(), ConnectionError>;

    /// Send a user message to a session
    async fn send_message(&self, session_id: &SessionId, text: &str)
        -> Result<(), ConnectionError>;

    /// Approve a pending tool call
    async fn approve_tool_call(
        &self,
        session_id: &SessionId,
        request_id: &str,
        tool_call_id: &str,
    ) -> Result<(), ConnectionError>;

    /// Deny a pending tool call
    async fn deny_tool_call(
        &self,
        session_id: &SessionId,
        request_id: &str,
        tool_call_id: &str,
        reason: Option<&str>,
    ) -> Result<(), ConnectionError>;

    /// Terminate a running session
    async fn terminate_session(&self, session_id: &SessionId) -> Result<(), ConnectionError>;

    /// Last known connection status
    fn status(&self) -> ConnectionStatus;
}

/// Factory constructing realtime clients
///
/// Provided by the surrounding application; the orchestrator calls it once
/// per connection it decides to open.
pub trait ClientFactory: Send + Sync {
    /// Construct a client for the endpoint, authenticated with the
    /// credential, delivering its events through the sink
    fn create(&self, endpoint: &str, credential: &str, events: EventSink)
        -> Arc<dyn RealtimeClient>;
}
