//! Authorization decisions
//!
//! The guard keeps no session table and no global credential state; the
//! caller passes the principal into every check. Session validity is
//! checked before capability membership, so an expired session with a
//! missing capability reports the expiry.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_core::{Capability, Principal};

/// Why a mutation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DenyReason {
    /// The principal's session window has elapsed
    #[error("session expired")]
    SessionExpired,

    /// The principal does not hold the required capability
    #[error("missing capability: {0}")]
    MissingCapability(Capability),
}

/// Result of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDecision {
    /// The mutation may proceed
    Allow,
    /// The mutation is refused
    Deny(DenyReason),
}

impl AccessDecision {
    /// True when the mutation may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// The denial reason, if refused
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::Deny(reason) => Some(*reason),
        }
    }
}

/// Stateless authorization gate for mutating operations
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard;

impl AccessGuard {
    /// Create a guard
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `principal` may perform an operation requiring
    /// `capability` at time `now_ms`
    pub fn authorize(
        &self,
        principal: &Principal,
        capability: Capability,
        now_ms: u64,
    ) -> AccessDecision {
        if !principal.is_session_valid(now_ms) {
            tracing::debug!(actor = %principal.id, "session expired");
            return AccessDecision::Deny(DenyReason::SessionExpired);
        }
        if !principal.has_capability(capability) {
            tracing::debug!(actor = %principal.id, %capability, "capability missing");
            return AccessDecision::Deny(DenyReason::MissingCapability(capability));
        }
        AccessDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::ActorId;

    fn principal(capabilities: &[Capability], issued_ms: u64, timeout_ms: u64) -> Principal {
        Principal::new(
            ActorId::from("alice"),
            capabilities.iter().copied(),
            issued_ms,
            timeout_ms,
        )
    }

    #[test]
    fn allows_valid_session_with_capability() {
        let guard = AccessGuard::new();
        let p = principal(&[Capability::Create], 0, 1_000);
        assert!(guard.authorize(&p, Capability::Create, 500).is_allowed());
    }

    #[test]
    fn denies_missing_capability() {
        let guard = AccessGuard::new();
        let p = principal(&[Capability::Create], 0, 1_000);
        assert_eq!(
            guard.authorize(&p, Capability::Delete, 500).deny_reason(),
            Some(DenyReason::MissingCapability(Capability::Delete))
        );
    }

    #[test]
    fn session_expiry_wins_over_missing_capability() {
        let guard = AccessGuard::new();
        let p = principal(&[], 0, 100);
        assert_eq!(
            guard.authorize(&p, Capability::Delete, 500).deny_reason(),
            Some(DenyReason::SessionExpired)
        );
    }

    #[test]
    fn boundary_instant_is_still_valid() {
        let guard = AccessGuard::new();
        let p = principal(&[Capability::Update], 100, 400);
        assert!(guard.authorize(&p, Capability::Update, 500).is_allowed());
        assert!(!guard.authorize(&p, Capability::Update, 501).is_allowed());
    }
}
