//! peri-core: Core abstractions and configuration for Periscope
//!
//! This crate provides shared types, the error taxonomy, configuration
//! structures, and the realtime-client traits used by the orchestrator.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::PeriError;
pub use types::{ConnectionStatus, MachineId, MachineRecord};
