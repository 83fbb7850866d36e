//! Workflow states and terminal outcomes
//!
//! Every unsuccessful terminal state carries a [`FailureKind`] so callers
//! can distinguish "insufficient permission" from "invalid input" from
//! "connection problem" without string matching.

use serde::{Deserialize, Serialize};
use warden_core::{ArchiveError, Record, RecordId, ValidationFailure};
use warden_guard::DenyReason;

/// What a successful commit did to the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationEffect {
    /// A record was created
    Created(Record),
    /// A record was updated to a new version
    Updated(Record),
    /// A record was deleted
    Deleted(RecordId),
    /// The archive was cleared of this many records
    Cleared(usize),
}

/// Why a workflow ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The access guard refused the principal
    PermissionDenied(DenyReason),
    /// The validation policy rejected the proposed fields
    Validation(ValidationFailure),
    /// The external link was interrupted before commit
    LinkInterrupted,
    /// The store reported a caller-input problem at commit time
    Archive(ArchiveError),
}

/// Observable state of a mutation workflow
///
/// The transient `Validating` and `Committing` phases complete within
/// `submit` and `confirm` respectively and are never observable between
/// calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    /// No mutation submitted yet
    Idle,
    /// Validation passed; awaiting `confirm` or `cancel`
    AwaitingConfirmation,
    /// The mutation was committed
    Succeeded(MutationEffect),
    /// The attempt ended without mutating the archive (or, for archive
    /// errors, without the requested change taking effect)
    Failed(FailureKind),
    /// The caller cancelled before confirmation
    Cancelled,
}

impl WorkflowState {
    /// True for `Succeeded`, `Failed`, and `Cancelled`
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Succeeded(_) | WorkflowState::Failed(_) | WorkflowState::Cancelled
        )
    }

    /// The failure kind, when this is a failed terminal state
    pub fn failure(&self) -> Option<&FailureKind> {
        match self {
            WorkflowState::Failed(kind) => Some(kind),
            _ => None,
        }
    }
}
