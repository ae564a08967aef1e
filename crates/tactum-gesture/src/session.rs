//! Per-contact tracking state.

use crate::config::MOVEMENT_SLOP_PX;
use crate::types::{Point, SwipeDirection, TouchId, TouchPoint, Velocity};
use crate::velocity::VelocityTracker;

/// Live tracking state for one contact between touch-start and
/// end/cancel.
///
/// Owned exclusively by the recognizer's per-element session map and
/// never handed out by reference across callback boundaries.
#[derive(Debug, Clone)]
pub struct TouchSession {
    pub identifier: TouchId,
    pub start_time_ms: f64,
    pub current_time_ms: f64,
    pub start_position: Point,
    pub start_page_position: Point,
    pub current_position: Point,
    pub current_page_position: Point,
    /// Current position relative to the registered element's origin.
    pub element_position: Point,
    /// Cumulative Euclidean distance from the start position.
    pub distance: f32,
    /// Direction of the cumulative displacement, locked once travel
    /// exceeds the movement slop.
    pub direction: Option<SwipeDirection>,
    tracker: VelocityTracker,
}

impl TouchSession {
    pub(crate) fn begin(sample: &TouchPoint, element_origin: Point) -> Self {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(sample.time_ms, sample.position);
        Self {
            identifier: sample.id,
            start_time_ms: sample.time_ms,
            current_time_ms: sample.time_ms,
            start_position: sample.position,
            start_page_position: sample.page_position,
            current_position: sample.position,
            current_page_position: sample.page_position,
            element_position: Point::new(
                sample.position.x - element_origin.x,
                sample.position.y - element_origin.y,
            ),
            distance: 0.0,
            direction: None,
            tracker,
        }
    }

    /// Fold the next sample for this contact into the session.
    pub(crate) fn advance(&mut self, sample: &TouchPoint, element_origin: Point) {
        self.current_time_ms = sample.time_ms;
        self.current_position = sample.position;
        self.current_page_position = sample.page_position;
        self.element_position = Point::new(
            sample.position.x - element_origin.x,
            sample.position.y - element_origin.y,
        );
        self.tracker.add_sample(sample.time_ms, sample.position);
        self.distance = self.start_position.distance_to(sample.position);

        let dx = sample.position.x - self.start_position.x;
        let dy = sample.position.y - self.start_position.y;
        if self.distance > MOVEMENT_SLOP_PX {
            self.direction = Some(classify_direction(dx, dy));
        }
    }

    /// Instantaneous velocity at the latest sample, px/ms.
    pub fn velocity(&self) -> Velocity {
        self.tracker.velocity()
    }

    /// Contact duration so far.
    pub fn duration_ms(&self) -> f64 {
        self.current_time_ms - self.start_time_ms
    }
}

/// Map a displacement vector to a cardinal direction.
///
/// Sectors by displacement angle: within 45 degrees of +x is right, past
/// 135 degrees is left, positive y (downward in screen coordinates) is
/// down, otherwise up.
pub(crate) fn classify_direction(dx: f32, dy: f32) -> SwipeDirection {
    let angle = dy.atan2(dx).to_degrees();
    if angle.abs() <= 45.0 {
        SwipeDirection::Right
    } else if angle.abs() >= 135.0 {
        SwipeDirection::Left
    } else if angle > 0.0 {
        SwipeDirection::Down
    } else {
        SwipeDirection::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: TouchId, x: f32, y: f32, time_ms: f64) -> TouchPoint {
        TouchPoint {
            id,
            position: Point::new(x, y),
            page_position: Point::new(x, y),
            time_ms,
        }
    }

    #[test]
    fn direction_sectors() {
        assert_eq!(classify_direction(100.0, 0.0), SwipeDirection::Right);
        assert_eq!(classify_direction(100.0, 40.0), SwipeDirection::Right);
        assert_eq!(classify_direction(-100.0, 0.0), SwipeDirection::Left);
        assert_eq!(classify_direction(-100.0, -40.0), SwipeDirection::Left);
        assert_eq!(classify_direction(0.0, 100.0), SwipeDirection::Down);
        assert_eq!(classify_direction(0.0, -100.0), SwipeDirection::Up);
        assert_eq!(classify_direction(30.0, -100.0), SwipeDirection::Up);
    }

    #[test]
    fn direction_locks_only_past_slop() {
        let mut session = TouchSession::begin(&sample(1, 0.0, 0.0, 0.0), Point::default());
        session.advance(&sample(1, 5.0, 0.0, 10.0), Point::default());
        assert_eq!(session.direction, None);

        session.advance(&sample(1, 30.0, 0.0, 20.0), Point::default());
        assert_eq!(session.direction, Some(SwipeDirection::Right));
    }

    #[test]
    fn distance_is_from_start_not_path_length() {
        let mut session = TouchSession::begin(&sample(1, 0.0, 0.0, 0.0), Point::default());
        session.advance(&sample(1, 100.0, 0.0, 10.0), Point::default());
        session.advance(&sample(1, 0.0, 0.0, 20.0), Point::default());
        assert_eq!(session.distance, 0.0);
    }

    #[test]
    fn element_position_tracks_origin() {
        let origin = Point::new(40.0, 60.0);
        let mut session = TouchSession::begin(&sample(1, 50.0, 70.0, 0.0), origin);
        assert_eq!(session.element_position, Point::new(10.0, 10.0));

        session.advance(&sample(1, 90.0, 60.0, 10.0), origin);
        assert_eq!(session.element_position, Point::new(50.0, 0.0));
    }

    #[test]
    fn velocity_reflects_latest_pair() {
        let mut session = TouchSession::begin(&sample(1, 0.0, 0.0, 0.0), Point::default());
        session.advance(&sample(1, 20.0, 0.0, 10.0), Point::default());
        session.advance(&sample(1, 60.0, 0.0, 20.0), Point::default());
        assert!((session.velocity().x - 4.0).abs() < 1e-6);
    }
}
