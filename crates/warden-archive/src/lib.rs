//! # Warden Archive - Shared Mutable State
//!
//! The two pieces of shared mutable state in the system, each behind its
//! own lock discipline:
//!
//! - [`RecordStore`]: the concurrent keyed map of versioned records,
//!   guarded by a single fair reader/writer lock per store instance.
//! - [`AuditLog`]: the append-only, gaplessly-sequenced trail of mutation
//!   attempts and their outcomes.
//!
//! No other component touches the underlying map or sequence directly;
//! all access goes through the lock-guarded methods here. Neither type
//! performs I/O, validation, or confirmation waits while holding a lock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Append-only audit trail
pub mod audit;

/// Concurrent keyed record store
pub mod store;

pub use audit::{AuditAction, AuditEntry, AuditFilter, AuditLog, AuditOutcome};
pub use store::RecordStore;
