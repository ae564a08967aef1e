//! Web platform adapter for Tactum.
//!
//! Supplies the browser-backed implementations of the core service
//! traits and the DOM wiring: [`WebSignals`] for capability probes,
//! [`WebTimers`] for throttle timers, [`watch_viewport`] to keep a store
//! current across resize/rotation, and [`TouchBridge`] to feed an
//! element's touch events into a recognizer.

pub mod signals;
pub mod timers;
pub mod touch;
pub mod viewport;

pub use signals::WebSignals;
pub use timers::WebTimers;
pub use touch::{AttachError, TouchBridge};
pub use viewport::{watch_viewport, ViewportWatch};
