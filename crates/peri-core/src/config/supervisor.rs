//! Supervisor configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::serde_utils::duration_millis;

/// Configuration for the connection supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Delay between a permission-request event and the scheduled
    /// auto-approval, so the UI can render the pending state first
    #[serde(with = "duration_millis")]
    pub approval_delay: Duration,

    /// Delay between disconnect-all and reconnect during a manual refresh,
    /// letting closes settle before new opens against the same endpoint
    #[serde(with = "duration_millis")]
    pub refresh_settle_delay: Duration,

    /// Maximum size of the auto-approval seen-set before it is cleared
    pub seen_cap: usize,

    /// Capacity of the inbound client-event channel
    pub event_channel_capacity: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            approval_delay: Duration::from_millis(300),
            refresh_settle_delay: Duration::from_millis(500),
            seen_cap: 1000,
            event_channel_capacity: 256,
        }
    }
}
