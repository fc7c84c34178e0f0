//! peri-orchestrator: Multi-endpoint connection orchestrator
//!
//! The orchestrator keeps one realtime connection open per reachable machine,
//! routes inbound events into shared stores the UI observes, resolves which
//! connection receives an outbound command for a session, and applies
//! debounced, idempotent auto-approval to permission requests.
//!
//! All public operations are best-effort and void-returning; recovery is
//! reconciliation-based (recompute the desired connection set and converge).

pub mod approval;
pub mod dispatch;
pub mod lifecycle;
pub mod manager;
pub mod registry;
pub mod router;
pub mod state;
pub mod stores;
pub mod supervisor;

pub use lifecycle::AppPhase;
pub use state::SupervisorState;
pub use supervisor::Supervisor;
