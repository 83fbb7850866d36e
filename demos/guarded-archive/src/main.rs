//! Guarded archive demo
//!
//! Seeds a few records through the full workflow, then runs a burst of
//! updates over a flaky link and prints the audit trail. Run with
//! `RUST_LOG=debug` to watch the workflow decisions.

use std::sync::Arc;

use warden_archive::{AuditFilter, AuditLog, RecordStore};
use warden_core::fields::field_map;
use warden_core::validation::require_fields;
use warden_core::{ActorId, Capability, Clock, Principal, SystemClock};
use warden_guard::ExternalLink;
use warden_workflow::{MutationRequest, MutationWorkflow, WorkflowState};

fn operator(clock: &dyn Clock) -> Principal {
    Principal::new(
        ActorId::from("operator"),
        [
            Capability::Create,
            Capability::Update,
            Capability::Delete,
            Capability::Clear,
        ],
        clock.now_ms(),
        3_600_000,
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(RecordStore::new());
    let audit = Arc::new(AuditLog::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let principal = operator(clock.as_ref());

    // Seeding runs over a reliable link.
    let reliable = Arc::new(ExternalLink::always_available());
    for (id, name) in [("T1", "Algebra"), ("T2", "Geometry"), ("T3", "History")] {
        let mut wf = MutationWorkflow::new(
            Arc::clone(&store),
            Arc::clone(&audit),
            Arc::clone(&reliable),
            Arc::clone(&clock),
        );
        wf.submit(
            &principal,
            MutationRequest::Create {
                id: id.into(),
                fields: field_map([("name", name)]),
            },
            &require_fields(["name"]),
        )
        .expect("fresh workflow");
        wf.confirm().expect("awaiting confirmation");
    }
    tracing::info!(records = store.count(), "archive seeded");

    // Updates run over a link that drops a quarter of the checks.
    let flaky = Arc::new(ExternalLink::flaky(0.25));
    let mut interrupted = 0;
    for round in 0..12 {
        let id = ["T1", "T2", "T3"][round % 3];
        let mut wf = MutationWorkflow::new(
            Arc::clone(&store),
            Arc::clone(&audit),
            Arc::clone(&flaky),
            Arc::clone(&clock),
        );
        wf.submit(
            &principal,
            MutationRequest::update(id, field_map([("round", round as i64)])),
            &require_fields(["round"]),
        )
        .expect("fresh workflow");
        if let WorkflowState::Failed(_) = wf.confirm().expect("awaiting confirmation") {
            interrupted += 1;
        }
    }
    tracing::info!(interrupted, "update burst finished");

    for record in store.list() {
        println!(
            "{} v{} {}",
            record.id,
            record.version,
            serde_json::to_string(&record.fields).expect("fields serialize")
        );
    }
    println!("--- audit trail ---");
    for entry in audit.query(&AuditFilter::any()) {
        println!(
            "#{:<3} {:<8} {:<7} {:<8} {:?}",
            entry.sequence,
            entry.actor,
            entry.action,
            entry.target.map(|t| t.to_string()).unwrap_or_else(|| "*".into()),
            entry.outcome
        );
    }
}
