//! Debouncing for editors that re-validate on every keystroke.
//!
//! The engine itself is synchronous and stateless; a caller that wants to
//! avoid re-parsing on every edit owns a [`Debouncer`] and feeds it the
//! current time, so nothing here spawns timers or reads the clock.
//!
//! ```rust
//! use cron_insight::{Debouncer, Schedule};
//! use std::time::{Duration, Instant};
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(300));
//! let start = Instant::now();
//! debouncer.submit("*/5 * * *".to_string(), start);
//! debouncer.submit("*/5 * * * *".to_string(), start + Duration::from_millis(100));
//!
//! assert_eq!(None, debouncer.poll(start + Duration::from_millis(300)));
//! let settled = debouncer.poll(start + Duration::from_millis(400)).unwrap();
//! assert!(Schedule::parse(&settled, false).is_ok());
//! ```

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Holds the latest submitted value until no new value has arrived for the
/// quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet_period: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl<T> Debouncer<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet period at `now`.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some((now, value));
    }

    /// Hands back the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    /// When the pending value becomes ready, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
            .as_ref()
            .map(|(submitted, _)| *submitted + self.quiet_period)
    }

    /// Drops the pending value without evaluating it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
