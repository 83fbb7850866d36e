//! Concurrent keyed record store
//!
//! One `parking_lot::RwLock` guards the record map. Any number of readers
//! proceed together; a writer takes exclusive access. parking_lot's
//! task-fair queueing keeps neither side starved. Lock guards are scoped
//! to each method body, so every exit path releases.
//!
//! Readers always receive defensive copies taken while the lock is held;
//! callers can never reach the live map outside the lock discipline.

use parking_lot::RwLock;
use std::collections::HashMap;
use warden_core::{ActorId, ArchiveError, FieldMap, Record, RecordId};

/// Thread-safe keyed archive of versioned records
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<HashMap<RecordId, Record>>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a copy of the record with the given id
    pub fn get(&self, id: &RecordId) -> Result<Record, ArchiveError> {
        let records = self.records.read();
        records
            .get(id)
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(id.clone()))
    }

    /// Copies of all current records; order is not significant
    pub fn list(&self) -> Vec<Record> {
        let records = self.records.read();
        records.values().cloned().collect()
    }

    /// Insert a freshly created record
    ///
    /// Create is not upsert: an occupied id is rejected. The stored
    /// record's version is pinned to 1 regardless of the draft's value.
    pub fn put(&self, record: Record) -> Result<Record, ArchiveError> {
        let mut records = self.records.write();
        if records.contains_key(&record.id) {
            return Err(ArchiveError::AlreadyExists(record.id));
        }
        let stored = Record {
            version: 1,
            ..record
        };
        tracing::debug!(record_id = %stored.id, "record created");
        records.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    /// Atomic read-modify-write of one record
    ///
    /// The load, mutation, version bump, and store all happen under a
    /// single write-lock acquisition, so no other writer can interleave:
    /// two concurrent replaces can never both read version N. When
    /// `expected_version` is given and does not match, nothing changes
    /// and a version conflict is reported.
    ///
    /// The mutator runs while the write lock is held; it must be short
    /// and must not call back into the store.
    pub fn replace<F>(
        &self,
        id: &RecordId,
        actor: &ActorId,
        now_ms: u64,
        expected_version: Option<u64>,
        mutator: F,
    ) -> Result<Record, ArchiveError>
    where
        F: FnOnce(&mut FieldMap),
    {
        let mut records = self.records.write();
        let record = records
            .get_mut(id)
            .ok_or_else(|| ArchiveError::NotFound(id.clone()))?;
        if let Some(expected) = expected_version {
            if record.version != expected {
                return Err(ArchiveError::VersionConflict {
                    id: id.clone(),
                    expected,
                    found: record.version,
                });
            }
        }
        mutator(&mut record.fields);
        record.version += 1;
        // Keeps last_modified_at_ms >= created_at_ms even if a manual
        // clock runs behind the creation stamp.
        record.last_modified_at_ms = now_ms.max(record.created_at_ms);
        record.last_modified_by = actor.clone();
        tracing::debug!(record_id = %id, version = record.version, "record replaced");
        Ok(record.clone())
    }

    /// Remove the record with the given id, reporting whether it existed
    pub fn remove(&self, id: &RecordId) -> bool {
        let mut records = self.records.write();
        let removed = records.remove(id).is_some();
        if removed {
            tracing::debug!(record_id = %id, "record removed");
        }
        removed
    }

    /// Remove every record, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut records = self.records.write();
        let removed = records.len();
        records.clear();
        if removed > 0 {
            tracing::debug!(removed, "archive cleared");
        }
        removed
    }

    /// Number of records currently held
    pub fn count(&self) -> usize {
        self.records.read().len()
    }
}
