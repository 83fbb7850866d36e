//! # Warden Core - Foundation Types
//!
//! Foundational types for the concurrent guarded archive: records,
//! principals, capabilities, the unified error taxonomy, and the
//! injection seams (validation and clock) shared by the higher layers.
//!
//! This crate holds no locks and no shared mutable state. Everything here
//! is a plain value or a pure function of its inputs; concurrency control
//! lives in `warden-archive`, orchestration in `warden-workflow`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Record, actor, and workflow identifiers
pub mod identifiers;

/// Field names, values, and the ordered field mapping
pub mod fields;

/// Versioned archive records
pub mod record;

/// Principals, sessions, and capability tags
pub mod principal;

/// Clock abstraction for timestamp injection
pub mod clock;

/// Unified error taxonomy
pub mod errors;

/// Caller-supplied validation policies
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use errors::{ArchiveError, ValidationFailure, WorkflowError};
pub use fields::{FieldMap, FieldValue};
pub use identifiers::{ActorId, RecordId, WorkflowId};
pub use principal::{Capability, Principal};
pub use record::Record;
pub use validation::{accept_all, require_fields, ValidationPolicy};
