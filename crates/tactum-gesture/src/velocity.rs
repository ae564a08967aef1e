//! Instantaneous velocity from consecutive touch samples.

use crate::types::{Point, Velocity};

#[derive(Debug, Clone, Copy)]
struct Sample {
    time_ms: f64,
    position: Point,
}

/// Tracks velocity as the position delta between the last two samples,
/// in px/ms.
///
/// Deliberately instantaneous rather than averaged over the whole
/// contact: classification cares about the speed at release, so a slow
/// drag that ends in a fast flick still reads as fast.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    prev: Option<Sample>,
    velocity: Velocity,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next sample. Samples with a non-increasing timestamp are
    /// absorbed without touching the current velocity estimate.
    pub fn add_sample(&mut self, time_ms: f64, position: Point) {
        if let Some(prev) = self.prev {
            let dt = time_ms - prev.time_ms;
            if dt > 0.0 {
                self.velocity = Velocity {
                    x: ((position.x - prev.position.x) as f64 / dt) as f32,
                    y: ((position.y - prev.position.y) as f64 / dt) as f32,
                };
            }
        }
        self.prev = Some(Sample { time_ms, position });
    }

    /// Velocity over the most recent sample pair; zero until two samples
    /// with distinct timestamps have been seen.
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn reset(&mut self) {
        self.prev = None;
        self.velocity = Velocity::ZERO;
    }
}
