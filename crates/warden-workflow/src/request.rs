//! Mutation requests submitted to the workflow

use serde::{Deserialize, Serialize};
use warden_archive::AuditAction;
use warden_core::{Capability, FieldMap, RecordId};

/// One proposed archive mutation
///
/// Updates carry the changed fields as an overlay (inserted over the
/// current field set at commit time) plus an optional expected-version
/// precondition for optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationRequest {
    /// Create a new record
    Create {
        /// Id the new record will be stored under
        id: RecordId,
        /// Initial field set
        fields: FieldMap,
    },
    /// Update an existing record
    Update {
        /// Target record
        id: RecordId,
        /// Fields to insert or overwrite
        changes: FieldMap,
        /// When set, the commit fails unless the record is still at
        /// this version
        expected_version: Option<u64>,
    },
    /// Delete one record
    Delete {
        /// Target record
        id: RecordId,
    },
    /// Remove every record in the archive
    Clear,
}

impl MutationRequest {
    /// Shorthand for an update without a version precondition
    pub fn update(id: impl Into<RecordId>, changes: FieldMap) -> Self {
        Self::Update {
            id: id.into(),
            changes,
            expected_version: None,
        }
    }

    /// The capability a principal must hold to perform this request
    pub fn required_capability(&self) -> Capability {
        match self {
            MutationRequest::Create { .. } => Capability::Create,
            MutationRequest::Update { .. } => Capability::Update,
            MutationRequest::Delete { .. } => Capability::Delete,
            MutationRequest::Clear => Capability::Clear,
        }
    }

    /// The audit action this request is recorded as
    pub fn audit_action(&self) -> AuditAction {
        match self {
            MutationRequest::Create { .. } => AuditAction::Create,
            MutationRequest::Update { .. } => AuditAction::Update,
            MutationRequest::Delete { .. } => AuditAction::Delete,
            MutationRequest::Clear => AuditAction::Clear,
        }
    }

    /// The record this request targets; `None` for whole-archive actions
    pub fn target(&self) -> Option<&RecordId> {
        match self {
            MutationRequest::Create { id, .. }
            | MutationRequest::Update { id, .. }
            | MutationRequest::Delete { id } => Some(id),
            MutationRequest::Clear => None,
        }
    }

    /// The proposed fields a validation policy should inspect, when the
    /// request carries any
    pub fn proposed_fields(&self) -> Option<&FieldMap> {
        match self {
            MutationRequest::Create { fields, .. } => Some(fields),
            MutationRequest::Update { changes, .. } => Some(changes),
            MutationRequest::Delete { .. } | MutationRequest::Clear => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::fields::field_map;

    #[test]
    fn capability_matches_request_kind() {
        assert_eq!(
            MutationRequest::Clear.required_capability(),
            Capability::Clear
        );
        assert_eq!(
            MutationRequest::Delete {
                id: RecordId::from("T1")
            }
            .required_capability(),
            Capability::Delete
        );
    }

    #[test]
    fn clear_has_no_target_and_no_fields() {
        assert_eq!(MutationRequest::Clear.target(), None);
        assert_eq!(MutationRequest::Clear.proposed_fields(), None);
    }

    #[test]
    fn update_exposes_changes_for_validation() {
        let request = MutationRequest::update("T1", field_map([("name", "Geometry")]));
        let fields = request.proposed_fields().expect("update carries fields");
        assert!(fields.contains_key("name"));
    }
}
