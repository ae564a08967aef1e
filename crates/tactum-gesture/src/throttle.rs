//! Classic throttle for move handling: at most one delivery per window,
//! with trailing-edge delivery of the newest pending batch.
//!
//! Not a debounce. Under sustained 120Hz input with a 16ms window the
//! handler still runs every 16ms; the trailing timer only exists so the
//! final sample of a burst is never lost.

use smallvec::SmallVec;
use tactum_core::platform::TimerToken;

use crate::types::TouchPoint;

/// One move delivery's worth of samples.
pub(crate) type SampleBatch = SmallVec<[TouchPoint; 2]>;

/// What the caller should do with an offered batch.
#[derive(Debug, PartialEq)]
pub(crate) enum ThrottleDecision {
    /// Process the batch now.
    Deliver,
    /// Batch stored as pending; schedule a trailing timer with this delay.
    Schedule { delay_ms: f64 },
    /// Batch stored as pending; a trailing timer is already on its way.
    Absorbed,
}

#[derive(Debug, Default)]
pub(crate) struct MoveThrottle {
    window_ms: f64,
    last_delivery_ms: Option<f64>,
    pending: Option<SampleBatch>,
    timer: Option<TimerToken>,
}

impl MoveThrottle {
    pub(crate) fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            ..Self::default()
        }
    }

    /// Offer a batch arriving at `now_ms` (the newest sample timestamp).
    ///
    /// A later batch replaces any pending one wholesale; only the newest
    /// pending batch is ever delivered on the trailing edge.
    pub(crate) fn offer(&mut self, samples: SampleBatch, now_ms: f64) -> ThrottleDecision {
        if self.window_ms <= 0.0 {
            self.last_delivery_ms = Some(now_ms);
            return ThrottleDecision::Deliver;
        }
        match self.last_delivery_ms {
            Some(last) if now_ms - last < self.window_ms => {
                self.pending = Some(samples);
                if self.timer.is_some() {
                    ThrottleDecision::Absorbed
                } else {
                    ThrottleDecision::Schedule {
                        delay_ms: (last + self.window_ms - now_ms).max(0.0),
                    }
                }
            }
            _ => {
                self.last_delivery_ms = Some(now_ms);
                ThrottleDecision::Deliver
            }
        }
    }

    /// Record the trailing timer so unregistration can cancel it.
    pub(crate) fn set_timer(&mut self, token: TimerToken) {
        self.timer = Some(token);
    }

    /// Claim the pending batch when the trailing timer fires.
    pub(crate) fn take_pending(&mut self) -> Option<SampleBatch> {
        self.timer = None;
        let pending = self.pending.take();
        if let Some(batch) = &pending {
            if let Some(newest) = batch.last() {
                self.last_delivery_ms = Some(newest.time_ms);
            }
        }
        pending
    }

    /// Drop pending state and return the timer token to cancel, if any.
    pub(crate) fn clear(&mut self) -> Option<TimerToken> {
        self.pending = None;
        self.timer.take()
    }
}
