//! Gesture layer vocabulary: raw touch samples, classified outcomes, the
//! externally visible gesture state, and per-element callbacks.

use std::fmt;
use std::rc::Rc;

/// Stable identifier for one contact point, carried by the host from
/// touch-start through end/cancel.
pub type TouchId = u64;

/// A point in logical (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Instantaneous velocity in px/ms, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// One raw contact sample as delivered by the host.
///
/// `position` is in viewport (client) coordinates, `page_position` in
/// document coordinates; `time_ms` is the host event timestamp. The
/// state machine is driven entirely by these timestamps, never by a wall
/// clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: TouchId,
    pub position: Point,
    pub page_position: Point,
    pub time_ms: f64,
}

/// Cardinal swipe direction, classified from the cumulative displacement
/// angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Provisional gesture class tracked mid-flight. Tap is decided only at
/// touch-end, so it never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Hold,
    Swipe,
}

/// The single externally visible gesture per element.
///
/// Aggregates however many concurrent contacts the element is tracking;
/// `is_active` is true exactly while at least one contact is live.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureState {
    pub is_active: bool,
    pub kind: Option<GestureKind>,
    pub start_time_ms: f64,
    pub start_position: Point,
    pub current_position: Point,
    pub velocity: Velocity,
    pub distance: f32,
    pub direction: Option<SwipeDirection>,
}

impl GestureState {
    pub(crate) fn idle() -> Self {
        Self {
            is_active: false,
            kind: None,
            start_time_ms: 0.0,
            start_position: Point::default(),
            current_position: Point::default(),
            velocity: Velocity::ZERO,
            distance: 0.0,
            direction: None,
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Position and extent of a registered element, in viewport coordinates.
///
/// The origin anchors element-relative touch positions; hosts should
/// refresh it when the element moves (the web adapter does so on every
/// touch-start).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementGeometry {
    pub origin: Point,
    pub size: Size,
}

/// Payload for a classified gesture (tap, hold, or swipe).
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    /// Release position in viewport coordinates.
    pub position: Point,
    /// Release position relative to the registered element.
    pub element_position: Point,
    /// Contact duration from start to release.
    pub duration_ms: f64,
    /// Cumulative Euclidean distance from the start position.
    pub distance: f32,
    /// Instantaneous velocity at release, px/ms.
    pub velocity: Velocity,
    /// Locked direction, present once travel exceeded the movement slop.
    pub direction: Option<SwipeDirection>,
}

/// What the host should do with the native event that produced a
/// touch-start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartDisposition {
    /// Suppress the host's default handling (scroll/zoom) for this event.
    pub suppress_default: bool,
}

pub(crate) type GestureFn = Rc<dyn Fn(&GestureEvent)>;
pub(crate) type TouchFn = Rc<dyn Fn(&TouchPoint, &GestureState)>;
pub(crate) type StateFn = Rc<dyn Fn(&GestureState)>;

/// Optional per-element callbacks.
///
/// Exactly one of `on_tap` / `on_hold` / `on_swipe` fires per ended
/// contact; the raw `on_touch_*` callbacks mirror the host events after
/// session bookkeeping; `on_gesture_start` / `on_gesture_end` bracket the
/// aggregate gesture.
#[derive(Clone, Default)]
pub struct GestureCallbacks {
    pub(crate) on_tap: Option<GestureFn>,
    pub(crate) on_hold: Option<GestureFn>,
    pub(crate) on_swipe: Option<GestureFn>,
    pub(crate) on_touch_start: Option<TouchFn>,
    pub(crate) on_touch_move: Option<TouchFn>,
    pub(crate) on_touch_end: Option<TouchFn>,
    pub(crate) on_gesture_start: Option<StateFn>,
    pub(crate) on_gesture_end: Option<StateFn>,
}

impl GestureCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tap(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_tap = Some(Rc::new(f));
        self
    }

    pub fn on_hold(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_hold = Some(Rc::new(f));
        self
    }

    pub fn on_swipe(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_swipe = Some(Rc::new(f));
        self
    }

    pub fn on_touch_start(mut self, f: impl Fn(&TouchPoint, &GestureState) + 'static) -> Self {
        self.on_touch_start = Some(Rc::new(f));
        self
    }

    pub fn on_touch_move(mut self, f: impl Fn(&TouchPoint, &GestureState) + 'static) -> Self {
        self.on_touch_move = Some(Rc::new(f));
        self
    }

    pub fn on_touch_end(mut self, f: impl Fn(&TouchPoint, &GestureState) + 'static) -> Self {
        self.on_touch_end = Some(Rc::new(f));
        self
    }

    pub fn on_gesture_start(mut self, f: impl Fn(&GestureState) + 'static) -> Self {
        self.on_gesture_start = Some(Rc::new(f));
        self
    }

    pub fn on_gesture_end(mut self, f: impl Fn(&GestureState) + 'static) -> Self {
        self.on_gesture_end = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for GestureCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureCallbacks")
            .field("on_tap", &self.on_tap.is_some())
            .field("on_hold", &self.on_hold.is_some())
            .field("on_swipe", &self.on_swipe.is_some())
            .field("on_touch_start", &self.on_touch_start.is_some())
            .field("on_touch_move", &self.on_touch_move.is_some())
            .field("on_touch_end", &self.on_touch_end.is_some())
            .field("on_gesture_start", &self.on_gesture_start.is_some())
            .field("on_gesture_end", &self.on_gesture_end.is_some())
            .finish()
    }
}
