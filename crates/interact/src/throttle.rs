//! Frame-clocked throttling of hover raycasts.

use crate::error::InteractionError;
use tracing::trace;

/// Default hover polling interval (roughly 30 Hz).
pub const DEFAULT_THROTTLING_TIME_MS: f64 = 33.0;

/// Accumulates render-clock deltas and gates pointer-move processing.
///
/// After a move is processed, further moves are suppressed until the
/// accumulated frame time reaches the interval. The overshoot is carried
/// into the next period (`accumulated % interval`) instead of being
/// dropped, which keeps the long-run sampling rate stable under frame
/// jitter. An interval of zero never suppresses.
#[derive(Debug, Clone, PartialEq)]
pub struct Throttle {
    interval_ms: f64,
    accumulated_ms: f64,
    suppressed: bool,
    detached: bool,
}

impl Throttle {
    /// Create a throttle; negative or non-finite intervals are rejected.
    pub fn new(interval_ms: f64) -> Result<Self, InteractionError> {
        if !interval_ms.is_finite() || interval_ms < 0.0 {
            return Err(InteractionError::InvalidThrottlingTime(interval_ms));
        }
        Ok(Self {
            interval_ms,
            accumulated_ms: 0.0,
            suppressed: false,
            detached: false,
        })
    }

    /// Configured interval in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Time accumulated toward the next period.
    pub fn accumulated_ms(&self) -> f64 {
        self.accumulated_ms
    }

    /// Whether pointer moves are currently dropped.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Feed one frame delta. Negative and non-finite deltas count as zero.
    pub fn tick(&mut self, delta_ms: f64) {
        if self.detached {
            return;
        }
        let delta = if delta_ms.is_finite() && delta_ms > 0.0 {
            delta_ms
        } else {
            if delta_ms != 0.0 {
                trace!(delta_ms, "clamping irregular frame delta");
            }
            0.0
        };

        if self.interval_ms <= 0.0 {
            self.accumulated_ms = 0.0;
            self.suppressed = false;
            return;
        }

        self.accumulated_ms += delta;
        if self.accumulated_ms < self.interval_ms {
            return;
        }
        self.suppressed = false;
        self.accumulated_ms %= self.interval_ms;
    }

    /// Claim the right to process one pointer move.
    ///
    /// Returns `false` while suppressed (or once detached); otherwise
    /// returns `true` and suppresses until the next period completes.
    pub fn try_acquire(&mut self) -> bool {
        if self.detached {
            return false;
        }
        if self.interval_ms <= 0.0 {
            return true;
        }
        if self.suppressed {
            return false;
        }
        self.suppressed = true;
        true
    }

    /// Zero the state and stop reacting to ticks and moves.
    pub fn detach(&mut self) {
        self.accumulated_ms = 0.0;
        self.suppressed = false;
        self.detached = true;
    }
}
