//! Permission requests and risk classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

use crate::session::SessionId;

/// Risk classification a daemon assigns to a tool call
///
/// Ordered so a maximum-risk auto-approval policy is a plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Read-only or trivially reversible (e.g. reading a file)
    Low,
    /// Mutates local state (e.g. editing a file, running a build)
    Medium,
    /// Hard to reverse or leaves the machine (e.g. git push, network calls)
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// A permission prompt the agent issues before a risky tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRequest {
    /// Session the request belongs to
    pub session_id: SessionId,
    /// Identifier of this request
    pub request_id: String,
    /// Identifier of the tool call awaiting approval
    pub tool_call_id: String,
    /// Name of the tool the agent wants to run
    pub tool_name: String,
    /// Risk classification assigned by the daemon
    pub risk_level: RiskLevel,
    /// When the request expires server-side, if the daemon set a deadline
    pub expires_at: Option<SystemTime>,
}

impl PermissionRequest {
    /// Whether the request is already past its expiry
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(expires_at: Option<SystemTime>) -> PermissionRequest {
        PermissionRequest {
            session_id: SessionId::new("s1"),
            request_id: "req-1".to_string(),
            tool_call_id: "tc-1".to_string(),
            tool_name: "bash".to_string(),
            risk_level: RiskLevel::Medium,
            expires_at,
        }
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_risk_level_serde() {
        let json = serde_json::to_string(&RiskLevel::High).unwrap();
        assert_eq!(json, r#""high""#);
        let parsed: RiskLevel = serde_json::from_str(r#""low""#).unwrap();
        assert_eq!(parsed, RiskLevel::Low);
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let req = request(None);
        assert!(!req.is_expired(SystemTime::now()));
    }

    #[test]
    fn test_expired_request() {
        let now = SystemTime::now();
        let req = request(Some(now - Duration::from_secs(1)));
        assert!(req.is_expired(now));

        let req = request(Some(now + Duration::from_secs(60)));
        assert!(!req.is_expired(now));
    }
}
