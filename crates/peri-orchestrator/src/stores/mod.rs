//! Shared state stores
//!
//! These are the external collaborators from the reviewed design, expressed
//! as injected store structs rather than ambient globals. The orchestrator
//! reads them for input and writes only through their setters; the UI layer
//! observes them through the `Arc` handles the supervisor exposes.

mod machines;
mod preferences;
mod sessions;
mod status;

pub use machines::MachineStore;
pub use preferences::{AutoApprovalPolicy, PreferenceStore};
pub use sessions::{SessionRecord, SessionStore};
pub use status::{EndpointStatus, StatusStore};
