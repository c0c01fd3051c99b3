use std::time::{Duration, Instant};

/// Coalesces a burst of scheduled values into one, delivered after a
/// quiet period. Time is supplied by the caller so the event loop (or a
/// test) decides what "now" is.
#[derive(Debug)]
pub struct Debouncer<T> {
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer { pending: None }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending value and restart the quiet period.
    pub fn schedule(&mut self, value: T, delay: Duration, now: Instant) {
        self.pending = Some((value, now + delay));
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Drop the pending value, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, d)| *d)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_fires_once_with_last_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();
        let mut fired = Vec::new();

        d.schedule("a", DELAY, t0);
        d.schedule("ab", DELAY, t0 + ms(50));
        d.schedule("abc", DELAY, t0 + ms(100));

        // walk the clock in 10ms steps well past the last deadline
        for step in 0..=100 {
            let now = t0 + ms(step * 10);
            if let Some(v) = d.take_due(now) {
                fired.push((v, now));
            }
        }

        assert_eq!(fired.len(), 1);
        let (value, at) = fired[0];
        assert_eq!(value, "abc");
        assert!(at >= t0 + ms(400));
    }

    #[test]
    fn not_due_before_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();
        d.schedule(1, DELAY, t0);
        assert_eq!(d.take_due(t0 + ms(299)), None);
        assert!(d.is_pending());
        assert_eq!(d.take_due(t0 + ms(300)), Some(1));
        assert!(!d.is_pending());
        assert_eq!(d.take_due(t0 + ms(900)), None);
    }

    #[test]
    fn reschedule_moves_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();
        d.schedule(1, DELAY, t0);
        d.schedule(2, DELAY, t0 + ms(250));
        assert_eq!(d.deadline(), Some(t0 + ms(550)));
        assert_eq!(d.take_due(t0 + ms(400)), None);
    }

    #[test]
    fn cancel_drops_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();
        d.schedule("x", DELAY, t0);
        assert_eq!(d.cancel(), Some("x"));
        assert_eq!(d.take_due(t0 + ms(1000)), None);
        assert_eq!(d.deadline(), None);
    }
}
