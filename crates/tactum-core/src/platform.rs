//! Platform service traits.
//!
//! These traits let the capability and gesture layers delegate scheduling
//! to the host environment, so the same state machines run against real
//! browser timers or a manual test driver.

/// Opaque handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One-shot timer scheduling.
///
/// Implementations run the callback once after roughly `delay_ms`
/// milliseconds on the host's event loop. Cancelling an already-fired or
/// unknown token is a no-op; callers rely on that to make teardown
/// idempotent.
pub trait TimerDriver {
    /// Schedule `callback` to run once after `delay_ms`.
    fn schedule(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerToken;

    /// Cancel a previously scheduled timer if it has not fired yet.
    fn cancel(&self, token: TimerToken);
}
