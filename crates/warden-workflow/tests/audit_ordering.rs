//! Audit ordering under many concurrent workflows
//!
//! N workflows, each its own instance over the same store, audit log, and
//! link, each driven to a terminal state from its own thread: the audit
//! sequence must come out exactly 1..=N with no gaps, whatever the
//! interleaving, and every outcome must match its workflow's terminal
//! state.

use std::sync::Arc;

use warden_archive::{AuditFilter, AuditLog, AuditOutcome, RecordStore};
use warden_core::fields::field_map;
use warden_core::validation::accept_all;
use warden_core::Capability;
use warden_guard::ExternalLink;
use warden_testkit::{admin, principal_with, ManualClock};
use warden_workflow::{MutationRequest, MutationWorkflow, WorkflowState};

const WORKFLOWS: usize = 24;

#[test]
fn terminal_states_produce_a_gapless_audit_sequence() {
    let store = Arc::new(RecordStore::new());
    let audit = Arc::new(AuditLog::new());
    let link = Arc::new(ExternalLink::always_available());
    let clock = ManualClock::shared(1_000);

    let mut handles = Vec::new();
    for i in 0..WORKFLOWS {
        let store = Arc::clone(&store);
        let audit = Arc::clone(&audit);
        let link = Arc::clone(&link);
        let clock = Arc::clone(&clock);
        handles.push(std::thread::spawn(move || {
            let mut wf =
                MutationWorkflow::new(store, audit, link, clock);
            // A third of the workflows are denied; the rest create
            // distinct records.
            let principal = if i % 3 == 0 {
                principal_with(&format!("reader-{i}"), std::iter::empty::<Capability>())
            } else {
                admin(&format!("writer-{i}"))
            };
            wf.submit(
                &principal,
                MutationRequest::Create {
                    id: format!("R{i}").into(),
                    fields: field_map([("slot", i as i64)]),
                },
                &accept_all(),
            )
            .expect("submit");
            if wf.state() == WorkflowState::AwaitingConfirmation {
                wf.confirm().expect("confirm");
            }
            wf.state()
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.join().expect("workflow thread") {
            WorkflowState::Succeeded(_) => succeeded += 1,
            WorkflowState::Failed(_) => {}
            other => panic!("non-terminal end state: {other:?}"),
        }
    }

    assert_eq!(store.count(), succeeded);

    let entries = audit.query(&AuditFilter::any());
    assert_eq!(entries.len(), WORKFLOWS);
    let mut sequences: Vec<u64> = entries.iter().map(|e| e.sequence).collect();
    sequences.sort_unstable();
    let expected: Vec<u64> = (1..=WORKFLOWS as u64).collect();
    assert_eq!(sequences, expected);

    let successes = audit
        .query(&AuditFilter::any().by_outcome(AuditOutcome::Success))
        .len();
    assert_eq!(successes, succeeded);
    let denied = audit
        .query(&AuditFilter::any().by_outcome(AuditOutcome::Denied))
        .len();
    assert_eq!(denied, WORKFLOWS - succeeded);
}
