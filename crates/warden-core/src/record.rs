//! Versioned archive records

use crate::fields::FieldMap;
use crate::identifiers::{ActorId, RecordId};
use serde::{Deserialize, Serialize};

/// A versioned record held by the archive
///
/// Invariants maintained by `warden-archive`:
/// - `id` never changes after creation
/// - `version` increments by exactly 1 on every successful mutation
/// - `last_modified_at_ms >= created_at_ms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique record identifier, immutable after creation
    pub id: RecordId,
    /// Ordered field payload
    pub fields: FieldMap,
    /// Monotonically increasing version, 1 on creation
    pub version: u64,
    /// Creation timestamp, milliseconds
    pub created_at_ms: u64,
    /// Last successful mutation timestamp, milliseconds
    pub last_modified_at_ms: u64,
    /// Principal that performed the last successful mutation
    pub last_modified_by: ActorId,
}

impl Record {
    /// Build a freshly created record at version 1
    pub fn create(id: RecordId, fields: FieldMap, actor: ActorId, now_ms: u64) -> Self {
        Self {
            id,
            fields,
            version: 1,
            created_at_ms: now_ms,
            last_modified_at_ms: now_ms,
            last_modified_by: actor,
        }
    }
}
