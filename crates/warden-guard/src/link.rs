//! External link simulation
//!
//! Models the flaky external service the archive depends on. The decision
//! comes from an injected policy closure rather than a hidden random
//! source, so tests can force either outcome and demos can inject a
//! probabilistic one. Checking the link never touches archive state.

use rand::Rng;
use std::fmt;

/// Outcome of a link check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// The external service answered; commits may proceed
    Available,
    /// The external service is unreachable; nothing may be committed
    Interrupted,
}

impl LinkStatus {
    /// True when the link answered
    pub fn is_available(&self) -> bool {
        matches!(self, LinkStatus::Available)
    }
}

type LinkPolicy = Box<dyn Fn() -> bool + Send + Sync>;

/// Simulated external dependency with injectable availability
pub struct ExternalLink {
    // Returns true when the link is interrupted.
    policy: LinkPolicy,
}

impl ExternalLink {
    /// A link governed by the given policy; the policy returns `true`
    /// when the link should report itself interrupted
    pub fn from_policy(policy: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    /// A link that always answers
    pub fn always_available() -> Self {
        Self::from_policy(|| false)
    }

    /// A link that is always down
    pub fn always_interrupted() -> Self {
        Self::from_policy(|| true)
    }

    /// A link that is interrupted with the given probability per check
    ///
    /// Demo-oriented; tests should prefer deterministic policies.
    pub fn flaky(failure_rate: f64) -> Self {
        let rate = failure_rate.clamp(0.0, 1.0);
        Self::from_policy(move || rand::thread_rng().gen_bool(rate))
    }

    /// Consult the policy once
    pub fn check(&self) -> LinkStatus {
        if (self.policy)() {
            tracing::debug!("external link interrupted");
            LinkStatus::Interrupted
        } else {
            LinkStatus::Available
        }
    }
}

impl fmt::Debug for ExternalLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalLink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fixed_policies() {
        assert_eq!(ExternalLink::always_available().check(), LinkStatus::Available);
        assert_eq!(
            ExternalLink::always_interrupted().check(),
            LinkStatus::Interrupted
        );
    }

    #[test]
    fn policy_is_consulted_per_check() {
        let calls = std::sync::Arc::new(AtomicUsize::new(0));
        let counter = std::sync::Arc::clone(&calls);
        let link = ExternalLink::from_policy(move || {
            counter.fetch_add(1, Ordering::SeqCst) % 2 == 0
        });
        assert_eq!(link.check(), LinkStatus::Interrupted);
        assert_eq!(link.check(), LinkStatus::Available);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn flaky_extremes_are_deterministic() {
        assert!(ExternalLink::flaky(0.0).check().is_available());
        assert!(!ExternalLink::flaky(1.0).check().is_available());
    }
}
