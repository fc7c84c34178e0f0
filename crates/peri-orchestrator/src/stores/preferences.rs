//! Auto-approval preferences

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use peri_protocol::RiskLevel;

/// User-configured auto-approval policy
///
/// A pure mapping from risk classification to allow/deny: approvals are
/// allowed up to and including `max_risk` when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoApprovalPolicy {
    /// Whether auto-approval is enabled at all
    pub enabled: bool,
    /// Highest risk level that may be auto-approved
    pub max_risk: RiskLevel,
}

impl AutoApprovalPolicy {
    /// Policy that approves nothing
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_risk: RiskLevel::Low,
        }
    }

    /// Policy that approves up to the given risk level
    pub fn up_to(max_risk: RiskLevel) -> Self {
        Self {
            enabled: true,
            max_risk,
        }
    }

    /// Whether a request at this risk level may be auto-approved
    pub fn allows(&self, risk: RiskLevel) -> bool {
        self.enabled && risk <= self.max_risk
    }
}

impl Default for AutoApprovalPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Preference store consulted by the auto-approval engine
///
/// Persistence of the policy belongs to the surrounding application; the
/// orchestrator only reads it.
#[derive(Default)]
pub struct PreferenceStore {
    policy: RwLock<AutoApprovalPolicy>,
}

impl PreferenceStore {
    /// Create a store with the approve-nothing default
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the policy
    pub fn set_policy(&self, policy: AutoApprovalPolicy) {
        *self.policy.write().unwrap() = policy;
    }

    /// Current policy
    pub fn policy(&self) -> AutoApprovalPolicy {
        *self.policy.read().unwrap()
    }

    /// Whether a request at this risk level should be auto-approved
    pub fn should_auto_approve(&self, risk: RiskLevel) -> bool {
        self.policy().allows(risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_policy_denies_everything() {
        let store = PreferenceStore::new();
        assert!(!store.should_auto_approve(RiskLevel::Low));
        assert!(!store.should_auto_approve(RiskLevel::High));
    }

    #[test]
    fn test_max_risk_is_inclusive() {
        let store = PreferenceStore::new();
        store.set_policy(AutoApprovalPolicy::up_to(RiskLevel::Medium));

        assert!(store.should_auto_approve(RiskLevel::Low));
        assert!(store.should_auto_approve(RiskLevel::Medium));
        assert!(!store.should_auto_approve(RiskLevel::High));
    }
}
