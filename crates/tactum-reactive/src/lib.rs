//! Render-friendly bindings over the capability store and gesture
//! recognizer.
//!
//! Declarative UI hosts own component lifecycles, not event plumbing:
//! these adapters translate "mount / unmount / target changed" into
//! subscribe / unsubscribe and register / unregister, and expose derived
//! capability queries that are always computed from the latest snapshot.

pub mod capability_binding;
pub mod gesture_binding;

pub use capability_binding::CapabilityBinding;
pub use gesture_binding::{ElementKey, GestureBinding};
