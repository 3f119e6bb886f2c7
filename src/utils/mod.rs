//! Utilities module for Markdown Kit
//!
//! Shared helpers:
//! - Debouncing
//! - Debounced change notification for downstream consumers (preview, persistence)

use std::time::{Duration, Instant};

/// Trailing-edge debounce: settles once no trigger arrived for `delay`
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_trigger: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_trigger: None,
        }
    }

    /// Record activity
    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    pub fn trigger_at(&mut self, now: Instant) {
        self.last_trigger = Some(now);
    }

    /// Check if the quiet period since the last trigger has elapsed
    pub fn is_settled(&self) -> bool {
        self.is_settled_at(Instant::now())
    }

    pub fn is_settled_at(&self, now: Instant) -> bool {
        match self.last_trigger {
            Some(last) => now.saturating_duration_since(last) >= self.delay,
            None => false,
        }
    }

    /// Reset the debouncer
    pub fn reset(&mut self) {
        self.last_trigger = None;
    }
}

/// Holds the newest edited buffer and releases it once input has been quiet
/// for the debounce window. Intermediate buffers are dropped.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    debouncer: Debouncer,
    pending: Option<String>,
}

impl ChangeNotifier {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            debouncer: Debouncer::new(delay_ms),
            pending: None,
        }
    }

    /// Record an edited buffer
    pub fn push(&mut self, buffer: String) {
        self.push_at(buffer, Instant::now());
    }

    pub fn push_at(&mut self, buffer: String, now: Instant) {
        self.pending = Some(buffer);
        self.debouncer.trigger_at(now);
    }

    /// The buffer to emit, if the window has elapsed
    pub fn poll(&mut self) -> Option<String> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<String> {
        if self.pending.is_some() && self.debouncer.is_settled_at(now) {
            self.debouncer.reset();
            return self.pending.take();
        }
        None
    }

    /// Emit whatever is pending right away (e.g. on blur or unmount)
    pub fn flush(&mut self) -> Option<String> {
        self.debouncer.reset();
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debouncer_settles_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(100);
        assert!(!debouncer.is_settled_at(start));
        debouncer.trigger_at(start);
        assert!(!debouncer.is_settled_at(start + Duration::from_millis(50)));
        assert!(debouncer.is_settled_at(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_notifier_emits_latest_once() {
        let start = Instant::now();
        let mut notifier = ChangeNotifier::new(400);
        notifier.push_at("a".to_string(), start);
        notifier.push_at("ab".to_string(), start + Duration::from_millis(200));

        // Still inside the window of the second edit
        assert_eq!(notifier.poll_at(start + Duration::from_millis(500)), None);
        assert_eq!(
            notifier.poll_at(start + Duration::from_millis(600)),
            Some("ab".to_string())
        );
        assert_eq!(notifier.poll_at(start + Duration::from_millis(2000)), None);
    }

    #[test]
    fn test_flush() {
        let mut notifier = ChangeNotifier::new(400);
        notifier.push("draft".to_string());
        assert!(notifier.has_pending());
        assert_eq!(notifier.flush(), Some("draft".to_string()));
        assert!(!notifier.has_pending());
    }
}
