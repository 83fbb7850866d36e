//! Append-only audit trail
//!
//! Every mutation attempt that reaches a terminal outcome leaves exactly
//! one entry here, successful or not. Entries are immutable once appended
//! and live for the process lifetime. Sequence numbers are assigned under
//! the append lock as `previous + 1`, so they form a gapless total order
//! across all concurrent appenders.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use warden_core::{ActorId, RecordId};

/// Kind of mutation an audit entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// A record creation attempt
    Create,
    /// A record update attempt
    Update,
    /// A record deletion attempt
    Delete,
    /// A whole-archive clear attempt
    Clear,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Clear => "clear",
        };
        write!(f, "{name}")
    }
}

/// How a mutation attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditOutcome {
    /// The archive was mutated
    Success,
    /// The access guard refused the principal
    Denied,
    /// Validation rejected the proposal, or the store reported a
    /// caller-input problem (absent or duplicate id, stale version)
    ValidationFailed,
    /// The external link was interrupted before commit; nothing mutated
    LinkInterrupted,
}

/// One immutable entry in the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Strictly increasing, gapless sequence number starting at 1
    pub sequence: u64,
    /// When the entry was appended, milliseconds
    pub timestamp_ms: u64,
    /// Principal that attempted the mutation
    pub actor: ActorId,
    /// Kind of mutation attempted
    pub action: AuditAction,
    /// Target record; `None` for whole-archive actions
    pub target: Option<RecordId>,
    /// How the attempt ended
    pub outcome: AuditOutcome,
}

/// Conjunctive filter over audit entries; unset parts match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Match only entries by this actor
    pub actor: Option<ActorId>,
    /// Match only entries targeting this record
    pub target: Option<RecordId>,
    /// Match only entries with this action
    pub action: Option<AuditAction>,
    /// Match only entries with this outcome
    pub outcome: Option<AuditOutcome>,
}

impl AuditFilter {
    /// A filter that matches every entry
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to a single actor
    pub fn by_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Restrict to a single target record
    pub fn by_target(mut self, target: RecordId) -> Self {
        self.target = Some(target);
        self
    }

    /// Restrict to a single action kind
    pub fn by_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Restrict to a single outcome
    pub fn by_outcome(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    fn matches(&self, entry: &AuditEntry) -> bool {
        self.actor.as_ref().map_or(true, |a| *a == entry.actor)
            && self
                .target
                .as_ref()
                .map_or(true, |t| Some(t) == entry.target.as_ref())
            && self.action.map_or(true, |a| a == entry.action)
            && self.outcome.map_or(true, |o| o == entry.outcome)
    }
}

/// Thread-safe, append-only sequence of audit entries
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append one entry, assigning the next sequence number atomically
    pub fn append(
        &self,
        actor: ActorId,
        action: AuditAction,
        target: Option<RecordId>,
        outcome: AuditOutcome,
        timestamp_ms: u64,
    ) -> AuditEntry {
        let mut entries = self.entries.lock();
        let entry = AuditEntry {
            sequence: entries.len() as u64 + 1,
            timestamp_ms,
            actor,
            action,
            target,
            outcome,
        };
        entries.push(entry.clone());
        entry
    }

    /// Snapshot of every entry matching the filter, in sequence order
    pub fn query(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        let entries = self.entries.lock();
        entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect()
    }

    /// Number of entries appended so far
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append_n(log: &AuditLog, n: u64) {
        for i in 0..n {
            log.append(
                ActorId::from("alice"),
                AuditAction::Update,
                Some(RecordId::new(format!("R{i}"))),
                AuditOutcome::Success,
                i,
            );
        }
    }

    #[test]
    fn sequence_starts_at_one_and_is_gapless() {
        let log = AuditLog::new();
        append_n(&log, 5);
        let sequences: Vec<u64> = log
            .query(&AuditFilter::any())
            .into_iter()
            .map(|e| e.sequence)
            .collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let log = AuditLog::new();
        log.append(
            ActorId::from("alice"),
            AuditAction::Create,
            Some(RecordId::from("T1")),
            AuditOutcome::Success,
            10,
        );
        log.append(
            ActorId::from("bob"),
            AuditAction::Delete,
            Some(RecordId::from("T1")),
            AuditOutcome::Denied,
            20,
        );
        log.append(
            ActorId::from("alice"),
            AuditAction::Clear,
            None,
            AuditOutcome::LinkInterrupted,
            30,
        );

        let alice_only = log.query(&AuditFilter::any().by_actor(ActorId::from("alice")));
        assert_eq!(alice_only.len(), 2);

        let denied_t1 = log.query(
            &AuditFilter::any()
                .by_target(RecordId::from("T1"))
                .by_outcome(AuditOutcome::Denied),
        );
        assert_eq!(denied_t1.len(), 1);
        assert_eq!(denied_t1[0].actor, ActorId::from("bob"));

        let clears = log.query(&AuditFilter::any().by_action(AuditAction::Clear));
        assert_eq!(clears.len(), 1);
        assert_eq!(clears[0].target, None);
    }

    #[test]
    fn len_tracks_appends() {
        let log = AuditLog::new();
        assert!(log.is_empty());
        append_n(&log, 3);
        assert_eq!(log.len(), 3);
    }
}
