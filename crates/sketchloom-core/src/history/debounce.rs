//! Trailing-edge debounce with a single pending deadline.

use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

/// Coalesces bursts of triggers into one firing `delay` after the last.
///
/// There is at most one pending deadline: scheduling again replaces it.
/// The owner drives time by calling [`Debouncer::poll`] from its event loop.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending deadline and start a new one from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Fire immediately if anything is pending.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(150);

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(start);
        assert!(!d.poll(start + Duration::from_millis(149)));
        assert!(d.poll(start + DELAY));
        assert!(!d.poll(start + DELAY * 2));
    }

    #[test]
    fn test_reschedule_replaces_deadline() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(start);
        d.schedule(start + Duration::from_millis(100));
        assert!(!d.poll(start + DELAY));
        assert!(d.poll(start + Duration::from_millis(250)));
    }

    #[test]
    fn test_cancel_and_flush() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(start);
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.poll(start + DELAY));

        d.schedule(start);
        assert!(d.flush());
        assert!(!d.flush());
    }
}
