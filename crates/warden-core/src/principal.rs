//! Principals, sessions, and capability tags
//!
//! A [`Principal`] is an authenticated actor carrying a capability set and
//! a session window. Principals are plain values passed explicitly into
//! every guarded call; there is no process-wide session table or static
//! credential store.

use crate::identifiers::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A named permission required to perform a given mutation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// Create new records
    Create,
    /// Update existing records
    Update,
    /// Delete individual records
    Delete,
    /// Clear the entire archive
    Clear,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Create => "create",
            Capability::Update => "update",
            Capability::Delete => "delete",
            Capability::Clear => "clear",
        };
        write!(f, "{name}")
    }
}

/// An authenticated actor attempting mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Actor identifier, stamped on mutations and audit entries
    pub id: ActorId,
    /// Capability tags this principal holds
    pub permissions: BTreeSet<Capability>,
    /// When the session was issued, milliseconds
    pub session_issued_at_ms: u64,
    /// How long the session stays valid, milliseconds
    pub session_timeout_ms: u64,
}

impl Principal {
    /// Build a principal with the given capability set and session window
    pub fn new(
        id: ActorId,
        permissions: impl IntoIterator<Item = Capability>,
        session_issued_at_ms: u64,
        session_timeout_ms: u64,
    ) -> Self {
        Self {
            id,
            permissions: permissions.into_iter().collect(),
            session_issued_at_ms,
            session_timeout_ms,
        }
    }

    /// Whether the session is still valid at `now_ms`
    pub fn is_session_valid(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.session_issued_at_ms) <= self.session_timeout_ms
    }

    /// Whether this principal holds the given capability
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.permissions.contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(issued_ms: u64, timeout_ms: u64) -> Principal {
        Principal::new(
            ActorId::from("alice"),
            [Capability::Create, Capability::Update],
            issued_ms,
            timeout_ms,
        )
    }

    #[test]
    fn session_valid_within_timeout() {
        let p = principal(1_000, 500);
        assert!(p.is_session_valid(1_000));
        assert!(p.is_session_valid(1_500));
        assert!(!p.is_session_valid(1_501));
    }

    #[test]
    fn session_valid_when_clock_behind_issue_time() {
        // Issued-in-the-future sessions count as valid rather than
        // underflowing; the guard treats them as freshly issued.
        let p = principal(2_000, 500);
        assert!(p.is_session_valid(1_000));
    }

    #[test]
    fn capability_membership() {
        let p = principal(0, 1_000);
        assert!(p.has_capability(Capability::Create));
        assert!(!p.has_capability(Capability::Delete));
    }
}
