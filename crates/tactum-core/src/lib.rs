//! Core runtime for Tactum: device capability detection and the shared
//! capability store.
//!
//! The crate is host-agnostic. All environment access goes through the
//! [`SignalProbe`] trait, and scheduling goes through [`TimerDriver`];
//! platform adapters (see `tactum-platform`) supply real implementations,
//! tests supply scripted ones.

pub mod capabilities;
pub mod detector;
pub mod platform;
pub mod probe;
pub mod store;

pub use capabilities::{
    CapabilitySnapshot, DeviceType, Orientation, PerformanceLevel, PrimaryInput, ScreenMetrics,
};
pub use platform::{TimerDriver, TimerToken};
pub use probe::{MediaFeature, ProbeError, SignalProbe};
pub use store::{CapabilityStore, Subscription, ViewportEvent};
