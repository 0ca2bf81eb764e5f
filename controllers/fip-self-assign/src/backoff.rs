//! # Exponential Backoff
//!
//! Delay inserted between failed assignment attempts within one cycle.
//!
//! Each failure multiplies the delay by a fixed factor, capped at a maximum:
//! `next = min(current * factor, max)`. With the defaults (1s, x2, 2m) the
//! sequence is 1s, 2s, 4s, 8s, 16s, 32s, 64s, 120s (max), 120s, ...
//!
//! A fresh backoff is built for every assignment attempt sequence, so the
//! delay never carries over from one cycle to the next.

use std::time::Duration;

/// Backoff parameters as configured on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffSettings {
    /// Delay after the first failure
    pub initial: Duration,
    /// Multiplier applied after each failure
    pub factor: f64,
    /// Ceiling for the delay
    pub max: Duration,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::from_secs(120),
        }
    }
}

/// Exponential backoff calculator
///
/// A factor of 1 or less is accepted and yields a constant or shrinking
/// delay. Overflow while multiplying saturates to `max`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    settings: BackoffSettings,
    current: Duration,
}

impl ExponentialBackoff {
    /// Create a backoff starting at `settings.initial`, capped at `settings.max`
    #[must_use]
    pub fn new(settings: BackoffSettings) -> Self {
        Self {
            settings,
            current: settings.initial.min(settings.max),
        }
    }

    /// Get the current delay and advance the sequence
    pub fn next_backoff(&mut self) -> Duration {
        let result = self.current;
        self.current = Self::advance(self.current, self.settings.factor, self.settings.max);
        result
    }

    fn advance(current: Duration, factor: f64, max: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * factor)
            .map_or(max, |next| next.min(max))
    }
}
