//! Testing utilities and harness for Tactum.
//!
//! Scripted probes, a manual timer driver, and a touch robot so the
//! capability and gesture layers can be exercised deterministically
//! without a browser.

pub mod robot;
pub mod signals;
pub mod timers;

pub use robot::{CallbackRecorder, GestureRecord, TouchRobot};
pub use signals::ScriptedSignals;
pub use timers::ManualTimers;
