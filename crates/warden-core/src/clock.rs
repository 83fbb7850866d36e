//! Clock abstraction for timestamp injection
//!
//! Timestamps enter the system through a [`Clock`] handle so tests can
//! drive time deterministically (`warden-testkit` provides a manual
//! clock). Production callers use [`SystemClock`].

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of millisecond timestamps
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
