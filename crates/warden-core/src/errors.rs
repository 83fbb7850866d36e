//! Unified error taxonomy
//!
//! Every expected business condition is a typed value, never a panic:
//! not-found, already-exists, version conflicts, validation failures, and
//! workflow protocol misuse all surface as `Result` errors or outcome
//! values that callers match on.

use crate::identifiers::RecordId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Archive-level failures reported by the record store
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ArchiveError {
    /// The requested record id is absent from the archive
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// CREATE attempted against an id already present (create is not upsert)
    #[error("record already exists: {0}")]
    AlreadyExists(RecordId),

    /// An expected-version precondition did not hold at commit time
    #[error("version conflict on {id}: expected {expected}, found {found}")]
    VersionConflict {
        /// Target record id
        id: RecordId,
        /// Version the caller expected
        expected: u64,
        /// Version actually present
        found: u64,
    },
}

/// A validation policy rejected the proposed fields
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("validation failed: {}", messages.join("; "))]
pub struct ValidationFailure {
    /// One message per rejected aspect
    pub messages: Vec<String>,
}

impl ValidationFailure {
    /// Build a failure from one or more messages
    pub fn new(messages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a failure with a single message
    pub fn message(message: impl Into<String>) -> Self {
        Self::new([message])
    }
}

/// Caller-protocol misuse of the mutation workflow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// An operation was called in a phase that does not accept it
    #[error("invalid workflow transition: {operation} not permitted in {phase}")]
    InvalidTransition {
        /// The operation that was attempted
        operation: &'static str,
        /// The phase the workflow was in
        phase: &'static str,
    },
}
