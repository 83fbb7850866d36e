//! # Warden Guard - Access Decisions and Link Simulation
//!
//! Two small gatekeepers consulted by the mutation workflow:
//!
//! - [`AccessGuard`]: decides whether a principal may perform a mutation.
//!   Stateless; each decision is a pure function of the principal, the
//!   required capability, and the current time. Denial is a normal value,
//!   never an error or a panic.
//! - [`ExternalLink`]: models an external dependency whose availability is
//!   outside this system's control. Backed by an injected policy so tests
//!   force either outcome deterministically and demos fail probabilistically.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Authorization decisions
pub mod access;

/// External link simulation
pub mod link;

pub use access::{AccessDecision, AccessGuard, DenyReason};
pub use link::{ExternalLink, LinkStatus};
