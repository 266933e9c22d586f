//! Quiet-period debouncing for rapidly changing input.
//!
//! The debouncer is clock-driven rather than timer-driven: callers push values
//! with the current instant and poll once [`Debouncer::deadline`] has passed.
//! This keeps it usable from any event loop and deterministic under test.

use std::time::Duration;

use tokio::time::Instant;

/// Holds the latest input and releases it after `quiet` has elapsed with no
/// further input.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, quiet: Duration) -> Self {
        Self {
            quiet,
            settled: initial,
            pending: None,
        }
    }

    /// Record a new input, restarting the quiet window.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// Instant at which the pending value becomes eligible, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Release the pending value once its quiet window has elapsed.
    ///
    /// Returns `Some` only when the settled value actually changes.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending.take() {
            Some((value, at)) if at <= now => {
                if value == self.settled {
                    return None;
                }
                self.settled = value.clone();
                Some(value)
            }
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Overwrite both the settled and pending value without emitting.
    ///
    /// Used when state is restored from outside (e.g. the address bar), where
    /// there is nothing to wait for.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.settled = value;
    }

    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn rapid_updates_settle_once_to_last_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(String::new(), QUIET);

        d.push("t".into(), t0);
        d.push("tr".into(), t0 + Duration::from_millis(100));
        d.push("tra".into(), t0 + Duration::from_millis(250));

        // 300ms after the first edit, but only 50ms after the last
        assert_eq!(d.poll(t0 + Duration::from_millis(300)), None);
        assert_eq!(d.settled(), "");

        let settle_at = t0 + Duration::from_millis(250) + QUIET;
        assert_eq!(d.deadline(), Some(settle_at));
        assert_eq!(d.poll(settle_at), Some("tra".to_string()));
        assert_eq!(d.settled(), "tra");

        // Nothing further to emit
        assert_eq!(d.deadline(), None);
        assert_eq!(d.poll(settle_at + QUIET), None);
    }

    #[test]
    fn returning_to_settled_value_emits_nothing() {
        let t0 = Instant::now();
        let mut d = Debouncer::new("gan".to_string(), QUIET);
        d.push("gans".into(), t0);
        d.push("gan".into(), t0 + Duration::from_millis(10));
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn reset_discards_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(String::new(), QUIET);
        d.push("bert".into(), t0);
        d.reset("vit".into());
        assert_eq!(d.deadline(), None);
        assert_eq!(d.settled(), "vit");
        assert_eq!(d.poll(t0 + QUIET), None);
    }
}
