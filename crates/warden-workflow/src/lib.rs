//! # Warden Workflow - Guarded Mutation Orchestration
//!
//! The validate → confirm → commit state machine wrapping every archive
//! mutation:
//!
//! ```text
//! Idle → Validating → AwaitingConfirmation → Committing → {Succeeded, Failed, Cancelled}
//! ```
//!
//! `submit` runs the access guard and the caller-supplied validation
//! policy (the Validating phase), then parks awaiting confirmation.
//! `confirm` checks the external link and only then mutates the archive;
//! an interrupted link means the archive is untouched. `cancel` is only
//! possible while awaiting confirmation; once committing begins the
//! attempt runs to a terminal outcome.
//!
//! Exactly one audit entry is appended per submit-to-terminal path; a
//! pre-validation cancel appends none. Every unsuccessful terminal state
//! is a typed outcome — nothing here is fatal to the process, and the
//! workflow never retries on its own.
//!
//! Each workflow instance owns its state machine. Instances interact with
//! the shared store and audit log only through their lock-guarded calls,
//! so any number of workflows may run concurrently.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Mutation requests submitted to the workflow
pub mod request;

/// Workflow states and terminal outcomes
pub mod outcome;

/// The workflow state machine
pub mod workflow;

pub use outcome::{FailureKind, MutationEffect, WorkflowState};
pub use request::MutationRequest;
pub use workflow::MutationWorkflow;
