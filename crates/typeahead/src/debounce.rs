//! Trailing-edge debouncing on top of the core timer manager.
//!
//! Each [`Debouncer::push`] restarts a one-shot timer. The value settles once
//! the timer expires without another push. Time is passed in explicitly so
//! hosts and tests control the clock.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use typeahead_core::logging::targets;
use typeahead_core::{TimerId, TimerManager};

/// Delays a value until it has been stable for a quiet period.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use typeahead::Debouncer;
///
/// let start = Instant::now();
/// let mut debouncer = Debouncer::new(Duration::from_millis(300));
///
/// debouncer.push("c".to_string(), start);
/// debouncer.push("ca".to_string(), start + Duration::from_millis(50));
/// debouncer.push("cat".to_string(), start + Duration::from_millis(100));
///
/// assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);
/// assert_eq!(debouncer.poll(start + Duration::from_millis(400)), Some("cat".to_string()));
/// ```
#[derive(Debug)]
pub struct Debouncer<V> {
    delay: Duration,
    timers: TimerManager,
    pending: Option<(TimerId, V)>,
    settled: Option<V>,
}

impl<V: Clone + PartialEq + Debug> Debouncer<V> {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timers: TimerManager::new(),
            pending: None,
            settled: None,
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new value, restarting the quiet period at `now`.
    pub fn push(&mut self, value: V, now: Instant) {
        if let Some((id, _)) = self.pending.take() {
            let _ = self.timers.stop(id);
        }
        let id = self.timers.start_one_shot_at(now, self.delay);
        tracing::trace!(target: targets::DEBOUNCE, ?value, "debounce restarted");
        self.pending = Some((id, value));
    }

    /// Settle the pending value if its quiet period has elapsed by `now`.
    ///
    /// Returns the value only when it differs from the previously settled
    /// one.
    pub fn poll(&mut self, now: Instant) -> Option<V> {
        let expired = self.timers.process_expired_at(now);
        let id = self.pending.as_ref().map(|(id, _)| *id)?;
        if !expired.contains(&id) {
            return None;
        }

        let (_, value) = self.pending.take()?;
        if self.settled.as_ref() == Some(&value) {
            tracing::trace!(target: targets::DEBOUNCE, ?value, "debounced value unchanged");
            return None;
        }

        tracing::debug!(target: targets::DEBOUNCE, ?value, "debounced value settled");
        self.settled = Some(value.clone());
        Some(value)
    }

    /// Drop the pending value without settling it.
    ///
    /// Returns `true` if a value was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some((id, _)) => {
                let _ = self.timers.stop(id);
                true
            }
            None => false,
        }
    }

    /// Mark `value` as settled without waiting, dropping any pending value.
    pub fn settle(&mut self, value: V) {
        self.cancel();
        self.settled = Some(value);
    }

    /// Forget the pending and settled values.
    pub fn reset(&mut self) {
        self.cancel();
        self.timers.clear();
        self.settled = None;
    }

    /// Whether a value is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The value waiting to settle, if any.
    pub fn pending_value(&self) -> Option<&V> {
        self.pending.as_ref().map(|(_, value)| value)
    }

    /// The most recently settled value.
    pub fn settled(&self) -> Option<&V> {
        self.settled.as_ref()
    }

    /// Time left until the pending value settles.
    pub fn time_until_due(&mut self, now: Instant) -> Option<Duration> {
        if self.pending.is_none() {
            return None;
        }
        self.timers.time_until_next_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_settles_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(300));

        d.push("a".to_string(), start);
        assert!(d.is_pending());
        assert_eq!(d.poll(start + ms(299)), None);
        assert_eq!(d.poll(start + ms(300)), Some("a".to_string()));
        assert!(!d.is_pending());
        assert_eq!(d.settled().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_rapid_pushes_settle_once_with_latest() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(300));

        d.push("c".to_string(), start);
        d.push("ca".to_string(), start + ms(50));
        d.push("cat".to_string(), start + ms(100));

        let mut settled = Vec::new();
        for step in 0..=10 {
            if let Some(v) = d.poll(start + ms(step * 50)) {
                settled.push(v);
            }
        }
        assert_eq!(settled, vec!["cat".to_string()]);
    }

    #[test]
    fn test_unchanged_value_does_not_resettle() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(10));

        d.push(1, start);
        assert_eq!(d.poll(start + ms(10)), Some(1));
        d.push(2, start + ms(20));
        d.push(1, start + ms(21));
        assert_eq!(d.poll(start + ms(40)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(100));

        assert!(!d.cancel());
        d.push("x", start);
        assert!(d.cancel());
        assert_eq!(d.poll(start + ms(500)), None);
        assert_eq!(d.settled(), None);
    }

    #[test]
    fn test_settle_and_reset() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(100));

        d.push("x", start);
        d.settle("");
        assert!(!d.is_pending());
        assert_eq!(d.settled(), Some(&""));

        d.reset();
        assert_eq!(d.settled(), None);
    }

    #[test]
    fn test_zero_delay_settles_immediately() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.push("now", start);
        assert_eq!(d.poll(start), Some("now"));
    }

    #[test]
    fn test_time_until_due() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(300));
        assert_eq!(d.time_until_due(start), None);

        d.push("q", start);
        assert_eq!(d.time_until_due(start + ms(100)), Some(ms(200)));
        assert_eq!(d.time_until_due(start + ms(400)), Some(Duration::ZERO));
    }
}
