//! Touch session tracking and tap / hold / swipe classification.
//!
//! The recognizer is host-agnostic: adapters translate native events
//! into [`TouchPoint`] samples and feed them to a [`GestureRecognizer`]
//! registration; classification results come back through
//! [`GestureCallbacks`]. Timing is taken from event timestamps, so the
//! whole state machine is deterministic for a given sample sequence.

pub mod config;
pub mod recognizer;
pub mod session;
pub mod throttle;
pub mod types;
pub mod velocity;

pub use config::GestureConfig;
pub use recognizer::{ElementId, GestureRecognizer};
pub use session::TouchSession;
pub use types::{
    ElementGeometry, GestureCallbacks, GestureEvent, GestureKind, GestureState, Point, Size,
    StartDisposition, SwipeDirection, TouchId, TouchPoint, Velocity,
};
pub use velocity::VelocityTracker;
