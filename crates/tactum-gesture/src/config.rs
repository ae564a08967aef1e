//! Shared gesture thresholds and per-recognizer configuration.
//!
//! Thresholds are intentionally shared between the provisional
//! classification done during moves and the final classification at
//! touch-end, so a gesture never flips class between the two.
//!
//! Values are in logical (CSS) pixels and milliseconds.

/// Movement slop in logical pixels.
///
/// Below this cumulative distance a contact still counts as stationary:
/// tap and hold remain eligible and no swipe direction is locked. 10px
/// absorbs finger jitter on touch screens while staying responsive for
/// intentional drags.
pub const MOVEMENT_SLOP_PX: f32 = 10.0;

/// Default press duration after which a stationary contact is a hold.
pub const DEFAULT_HOLD_THRESHOLD_MS: f64 = 500.0;

/// Default cumulative travel distance for a swipe.
pub const DEFAULT_SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Default release velocity for a swipe, in px/ms.
///
/// Velocity is instantaneous (last two move samples), so a slow drag
/// that ends in a quick flick still swipes.
pub const DEFAULT_SWIPE_VELOCITY_THRESHOLD: f32 = 0.3;

/// Default refractory window between consecutive taps.
pub const DEFAULT_TAP_DEBOUNCE_MS: f64 = 300.0;

/// Accessibility floor for touch target size, in logical pixels.
///
/// Registering a smaller element logs a warning but is not refused.
pub const MIN_TOUCH_TARGET_PX: f32 = 44.0;

/// Default move-handler throttle window (~one delivery per 60fps frame).
pub const DEFAULT_THROTTLE_MS: f64 = 16.0;

/// Default advisory cap on simultaneously tracked contacts per element.
pub const DEFAULT_MAX_CONCURRENT_TOUCHES: usize = 10;

/// Tunables for one [`crate::GestureRecognizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Refractory window between consecutive taps on the same element.
    pub tap_debounce_ms: f64,
    /// Press duration after which a stationary contact classifies as hold.
    pub hold_threshold_ms: f64,
    /// Cumulative travel distance required for a swipe.
    pub swipe_threshold_px: f32,
    /// Instantaneous release velocity required for a swipe, px/ms.
    pub swipe_velocity_threshold: f32,
    /// Accessibility floor; smaller registrations warn.
    pub min_touch_target_px: f32,
    /// Move-handler throttle window; `0` disables throttling.
    pub throttle_ms: f64,
    /// Gate on invoking swipe callbacks.
    pub enable_swipe_gestures: bool,
    /// Advisory soft cap on concurrent contacts per element.
    pub max_concurrent_touches: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_debounce_ms: DEFAULT_TAP_DEBOUNCE_MS,
            hold_threshold_ms: DEFAULT_HOLD_THRESHOLD_MS,
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            swipe_velocity_threshold: DEFAULT_SWIPE_VELOCITY_THRESHOLD,
            min_touch_target_px: MIN_TOUCH_TARGET_PX,
            throttle_ms: DEFAULT_THROTTLE_MS,
            enable_swipe_gestures: true,
            max_concurrent_touches: DEFAULT_MAX_CONCURRENT_TOUCHES,
        }
    }
}

impl GestureConfig {
    /// Config with throttling disabled, used where the host already
    /// paces move events (and by most tests).
    pub fn unthrottled() -> Self {
        Self {
            throttle_ms: 0.0,
            ..Self::default()
        }
    }
}
