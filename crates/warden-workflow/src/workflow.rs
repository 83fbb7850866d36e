//! The workflow state machine
//!
//! Ordering invariant: the link check happens before any store call, and
//! an interrupted link terminates the attempt before anything is mutated.
//! Exactly one audit entry is appended per submit-to-terminal path; a
//! pre-validation cancel appends none. The workflow holds no lock of its
//! own — only the brief store and log acquisitions inside the calls it
//! makes.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::outcome::{FailureKind, MutationEffect, WorkflowState};
use crate::request::MutationRequest;
use warden_archive::{AuditLog, AuditOutcome, RecordStore};
use warden_core::{
    ActorId, ArchiveError, Clock, Principal, Record, ValidationPolicy, WorkflowError, WorkflowId,
};
use warden_guard::{AccessDecision, AccessGuard, ExternalLink};

enum Phase {
    Idle,
    AwaitingConfirmation {
        actor: ActorId,
        request: MutationRequest,
    },
    Terminal(WorkflowState),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingConfirmation { .. } => "awaiting-confirmation",
            Phase::Terminal(_) => "terminal",
        }
    }
}

/// One guarded mutation attempt against a shared archive
///
/// A workflow instance is single-use: `submit` once, then `confirm` or
/// `cancel`. Run any number of instances concurrently against the same
/// store, audit log, and link.
pub struct MutationWorkflow {
    id: WorkflowId,
    guard: AccessGuard,
    store: Arc<RecordStore>,
    audit: Arc<AuditLog>,
    link: Arc<ExternalLink>,
    clock: Arc<dyn Clock>,
    phase: Phase,
}

impl MutationWorkflow {
    /// Build a workflow over the shared collaborators
    pub fn new(
        store: Arc<RecordStore>,
        audit: Arc<AuditLog>,
        link: Arc<ExternalLink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            id: WorkflowId::new(),
            guard: AccessGuard::new(),
            store,
            audit,
            link,
            clock,
            phase: Phase::Idle,
        }
    }

    /// This instance's identifier
    pub fn id(&self) -> WorkflowId {
        self.id
    }

    /// The currently observable state
    pub fn state(&self) -> WorkflowState {
        match &self.phase {
            Phase::Idle => WorkflowState::Idle,
            Phase::AwaitingConfirmation { .. } => WorkflowState::AwaitingConfirmation,
            Phase::Terminal(state) => state.clone(),
        }
    }

    /// Submit a mutation: authorize the principal, validate the proposed
    /// fields, and park awaiting confirmation
    ///
    /// A denial or validation failure terminates the workflow with one
    /// audit entry and no archive mutation.
    pub fn submit(
        &mut self,
        principal: &Principal,
        request: MutationRequest,
        validation: &dyn ValidationPolicy,
    ) -> Result<WorkflowState, WorkflowError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(WorkflowError::InvalidTransition {
                operation: "submit",
                phase: self.phase.name(),
            });
        }

        let now_ms = self.clock.now_ms();
        debug!(
            workflow = %self.id,
            actor = %principal.id,
            action = %request.audit_action(),
            "mutation submitted"
        );

        if let AccessDecision::Deny(reason) =
            self.guard
                .authorize(principal, request.required_capability(), now_ms)
        {
            warn!(workflow = %self.id, actor = %principal.id, %reason, "mutation denied");
            return Ok(self.finish(
                &principal.id,
                &request,
                AuditOutcome::Denied,
                WorkflowState::Failed(FailureKind::PermissionDenied(reason)),
                now_ms,
            ));
        }

        if let Some(fields) = request.proposed_fields() {
            if let Err(failure) = validation.validate(fields) {
                debug!(workflow = %self.id, %failure, "validation rejected proposal");
                return Ok(self.finish(
                    &principal.id,
                    &request,
                    AuditOutcome::ValidationFailed,
                    WorkflowState::Failed(FailureKind::Validation(failure)),
                    now_ms,
                ));
            }
        }

        self.phase = Phase::AwaitingConfirmation {
            actor: principal.id.clone(),
            request,
        };
        Ok(WorkflowState::AwaitingConfirmation)
    }

    /// Confirm the parked mutation: check the link, then commit
    ///
    /// The link check comes first; an interrupted link terminates the
    /// attempt with the archive untouched. Once committing begins the
    /// attempt runs to a terminal outcome and cannot be cancelled.
    pub fn confirm(&mut self) -> Result<WorkflowState, WorkflowError> {
        let (actor, request) = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::AwaitingConfirmation { actor, request } => (actor, request),
            other => {
                let phase = other.name();
                self.phase = other;
                return Err(WorkflowError::InvalidTransition {
                    operation: "confirm",
                    phase,
                });
            }
        };

        let now_ms = self.clock.now_ms();
        if !self.link.check().is_available() {
            warn!(workflow = %self.id, actor = %actor, "link interrupted before commit");
            return Ok(self.finish(
                &actor,
                &request,
                AuditOutcome::LinkInterrupted,
                WorkflowState::Failed(FailureKind::LinkInterrupted),
                now_ms,
            ));
        }

        let state = match self.commit(&actor, &request, now_ms) {
            Ok(effect) => {
                info!(workflow = %self.id, actor = %actor, action = %request.audit_action(), "mutation committed");
                self.finish(
                    &actor,
                    &request,
                    AuditOutcome::Success,
                    WorkflowState::Succeeded(effect),
                    now_ms,
                )
            }
            Err(err) => {
                // Absent or duplicate ids and stale versions are caller-input
                // problems, recorded as validation failures.
                debug!(workflow = %self.id, actor = %actor, error = %err, "commit rejected by store");
                self.finish(
                    &actor,
                    &request,
                    AuditOutcome::ValidationFailed,
                    WorkflowState::Failed(FailureKind::Archive(err)),
                    now_ms,
                )
            }
        };
        Ok(state)
    }

    /// Cancel a parked mutation before confirmation
    ///
    /// Nothing was attempted against the archive, so no audit entry is
    /// appended.
    pub fn cancel(&mut self) -> Result<WorkflowState, WorkflowError> {
        if !matches!(self.phase, Phase::AwaitingConfirmation { .. }) {
            return Err(WorkflowError::InvalidTransition {
                operation: "cancel",
                phase: self.phase.name(),
            });
        }
        debug!(workflow = %self.id, "mutation cancelled before confirmation");
        self.phase = Phase::Terminal(WorkflowState::Cancelled);
        Ok(WorkflowState::Cancelled)
    }

    fn commit(
        &self,
        actor: &ActorId,
        request: &MutationRequest,
        now_ms: u64,
    ) -> Result<MutationEffect, ArchiveError> {
        match request {
            MutationRequest::Create { id, fields } => {
                let record = self.store.put(Record::create(
                    id.clone(),
                    fields.clone(),
                    actor.clone(),
                    now_ms,
                ))?;
                Ok(MutationEffect::Created(record))
            }
            MutationRequest::Update {
                id,
                changes,
                expected_version,
            } => {
                let record =
                    self.store
                        .replace(id, actor, now_ms, *expected_version, |fields| {
                            for (name, value) in changes {
                                fields.insert(name.clone(), value.clone());
                            }
                        })?;
                Ok(MutationEffect::Updated(record))
            }
            MutationRequest::Delete { id } => {
                if self.store.remove(id) {
                    Ok(MutationEffect::Deleted(id.clone()))
                } else {
                    Err(ArchiveError::NotFound(id.clone()))
                }
            }
            MutationRequest::Clear => Ok(MutationEffect::Cleared(self.store.clear())),
        }
    }

    fn finish(
        &mut self,
        actor: &ActorId,
        request: &MutationRequest,
        outcome: AuditOutcome,
        state: WorkflowState,
        now_ms: u64,
    ) -> WorkflowState {
        self.audit.append(
            actor.clone(),
            request.audit_action(),
            request.target().cloned(),
            outcome,
            now_ms,
        );
        self.phase = Phase::Terminal(state.clone());
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use warden_core::validation::accept_all;
    use warden_core::Capability;
    use warden_testkit::{admin, algebra_fields, principal_with, ManualClock};

    fn workflow(link: ExternalLink) -> (MutationWorkflow, Arc<RecordStore>, Arc<AuditLog>) {
        let store = Arc::new(RecordStore::new());
        let audit = Arc::new(AuditLog::new());
        let wf = MutationWorkflow::new(
            Arc::clone(&store),
            Arc::clone(&audit),
            Arc::new(link),
            ManualClock::shared(1_000),
        );
        (wf, store, audit)
    }

    fn create_t1() -> MutationRequest {
        MutationRequest::Create {
            id: "T1".into(),
            fields: algebra_fields(),
        }
    }

    #[test]
    fn submit_parks_awaiting_confirmation() {
        let (mut wf, store, audit) = workflow(ExternalLink::always_available());
        let state = wf
            .submit(&admin("alice"), create_t1(), &accept_all())
            .expect("first submit");
        assert_eq!(state, WorkflowState::AwaitingConfirmation);
        // Nothing committed and nothing audited until confirm.
        assert_eq!(store.count(), 0);
        assert!(audit.is_empty());
    }

    #[test]
    fn second_submit_is_a_protocol_error() {
        let (mut wf, _store, _audit) = workflow(ExternalLink::always_available());
        wf.submit(&admin("alice"), create_t1(), &accept_all())
            .expect("first submit");
        let err = wf
            .submit(&admin("alice"), create_t1(), &accept_all())
            .expect_err("second submit");
        assert_matches!(
            err,
            WorkflowError::InvalidTransition {
                operation: "submit",
                phase: "awaiting-confirmation"
            }
        );
        // The parked mutation is unaffected.
        assert_eq!(wf.state(), WorkflowState::AwaitingConfirmation);
    }

    #[test]
    fn confirm_before_submit_is_a_protocol_error() {
        let (mut wf, _store, _audit) = workflow(ExternalLink::always_available());
        let err = wf.confirm().expect_err("nothing submitted");
        assert_matches!(
            err,
            WorkflowError::InvalidTransition {
                operation: "confirm",
                phase: "idle"
            }
        );
        assert_eq!(wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn cancel_after_terminal_is_a_protocol_error() {
        let (mut wf, _store, _audit) = workflow(ExternalLink::always_available());
        wf.submit(&admin("alice"), create_t1(), &accept_all())
            .expect("submit");
        wf.confirm().expect("confirm");
        let err = wf.cancel().expect_err("already terminal");
        assert_matches!(
            err,
            WorkflowError::InvalidTransition {
                operation: "cancel",
                phase: "terminal"
            }
        );
    }

    #[test]
    fn denied_submit_terminates_with_one_audit_entry() {
        let (mut wf, store, audit) = workflow(ExternalLink::always_available());
        let reader = principal_with("bob", [Capability::Update]);
        let state = wf
            .submit(&reader, create_t1(), &accept_all())
            .expect("submit");
        assert_matches!(
            state,
            WorkflowState::Failed(FailureKind::PermissionDenied(_))
        );
        assert_eq!(store.count(), 0);
        assert_eq!(audit.len(), 1);
        // Terminal: confirm no longer possible.
        assert!(wf.confirm().is_err());
    }

    #[test]
    fn expired_session_is_denied_before_validation() {
        let (mut wf, store, audit) = workflow(ExternalLink::always_available());
        let stale = warden_testkit::expired_principal("old", 1_000);
        let state = wf
            .submit(&stale, create_t1(), &accept_all())
            .expect("submit");
        assert_matches!(
            state,
            WorkflowState::Failed(FailureKind::PermissionDenied(
                warden_guard::DenyReason::SessionExpired
            ))
        );
        assert_eq!(store.count(), 0);
        assert_eq!(audit.len(), 1);
    }

    #[test]
    fn validation_failure_terminates_before_confirmation() {
        let (mut wf, store, audit) = workflow(ExternalLink::always_available());
        let policy = warden_core::validation::require_fields(["room"]);
        let state = wf
            .submit(&admin("alice"), create_t1(), &policy)
            .expect("submit");
        assert_matches!(state, WorkflowState::Failed(FailureKind::Validation(_)));
        assert_eq!(store.count(), 0);
        assert_eq!(audit.len(), 1);
    }

    #[test]
    fn delete_of_absent_record_fails_as_archive_error() {
        let (mut wf, _store, audit) = workflow(ExternalLink::always_available());
        wf.submit(
            &admin("alice"),
            MutationRequest::Delete { id: "ghost".into() },
            &accept_all(),
        )
        .expect("submit");
        let state = wf.confirm().expect("confirm");
        assert_matches!(
            state,
            WorkflowState::Failed(FailureKind::Archive(ArchiveError::NotFound(_)))
        );
        assert_eq!(audit.len(), 1);
    }

    #[test]
    fn stale_expected_version_conflicts_at_commit() {
        let (mut wf, store, _audit) = workflow(ExternalLink::always_available());
        store
            .put(Record::create(
                "T1".into(),
                algebra_fields(),
                ActorId::from("seed"),
                0,
            ))
            .expect("fresh id");

        wf.submit(
            &admin("alice"),
            MutationRequest::Update {
                id: "T1".into(),
                changes: algebra_fields(),
                expected_version: Some(5),
            },
            &accept_all(),
        )
        .expect("submit");
        let state = wf.confirm().expect("confirm");
        assert_matches!(
            state,
            WorkflowState::Failed(FailureKind::Archive(ArchiveError::VersionConflict { .. }))
        );
        assert_eq!(store.get(&"T1".into()).expect("present").version, 1);
    }

    #[test]
    fn clear_commits_with_clear_capability() {
        let (mut wf, store, audit) = workflow(ExternalLink::always_available());
        store
            .put(Record::create(
                "T1".into(),
                algebra_fields(),
                ActorId::from("seed"),
                0,
            ))
            .expect("fresh id");

        wf.submit(&admin("alice"), MutationRequest::Clear, &accept_all())
            .expect("submit");
        let state = wf.confirm().expect("confirm");
        assert_eq!(
            state,
            WorkflowState::Succeeded(MutationEffect::Cleared(1))
        );
        assert_eq!(store.count(), 0);
        assert_eq!(audit.len(), 1);
        assert_eq!(audit.query(&Default::default())[0].target, None);
    }
}
