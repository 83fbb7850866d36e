//! # Warden Testkit - Deterministic Test Fixtures
//!
//! Fixtures shared by the warden test suites: a manually driven clock,
//! principal builders, and scripted link policies. Dev-dependency only;
//! nothing here belongs in production paths.

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use warden_core::fields::field_map;
use warden_core::{ActorId, Capability, Clock, FieldMap, Principal};

/// A clock that only moves when the test says so
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    /// Shared handle starting at `now_ms`
    pub fn shared(now_ms: u64) -> Arc<Self> {
        Arc::new(Self::new(now_ms))
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// A principal with the given capabilities and a session that stays
/// valid for the whole test (issued at 0, day-long timeout)
pub fn principal_with(id: &str, capabilities: impl IntoIterator<Item = Capability>) -> Principal {
    Principal::new(ActorId::from(id), capabilities, 0, 86_400_000)
}

/// A principal holding every capability
pub fn admin(id: &str) -> Principal {
    principal_with(
        id,
        [
            Capability::Create,
            Capability::Update,
            Capability::Delete,
            Capability::Clear,
        ],
    )
}

/// A principal whose session expired before the test clock starts
pub fn expired_principal(id: &str, now_ms: u64) -> Principal {
    Principal::new(
        ActorId::from(id),
        [
            Capability::Create,
            Capability::Update,
            Capability::Delete,
            Capability::Clear,
        ],
        0,
        now_ms.saturating_sub(1),
    )
}

/// A link policy that replays the given interruption script, then
/// repeats the final answer; an empty script never interrupts
pub fn scripted_link_policy(
    script: impl IntoIterator<Item = bool>,
) -> impl Fn() -> bool + Send + Sync + 'static {
    let script: VecDeque<bool> = script.into_iter().collect();
    let last = script.back().copied().unwrap_or(false);
    let remaining = Mutex::new(script);
    move || remaining.lock().pop_front().unwrap_or(last)
}

/// The field set used throughout the scenario tests
pub fn algebra_fields() -> FieldMap {
    field_map([("name", "Algebra")])
}
