//! Raw environment signals.
//!
//! [`SignalProbe`] is the seam between capability detection and the host:
//! every heuristic input (media queries, touch point counts, screen
//! geometry, memory hints) is read through it. Probe methods return
//! `Result` so each signal can fail independently; the detector converts
//! failures into safe defaults and a probe failure can never abort
//! snapshot construction.

use std::fmt;

/// CSS media features the detector queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFeature {
    /// `(pointer: coarse)` — the primary pointer is inaccurate (finger).
    CoarsePointer,
    /// `(pointer: fine)` — the primary pointer is accurate (mouse, pen).
    FinePointer,
    /// `(hover: hover)` — the primary pointer can hover.
    Hover,
    /// `(hover: none)` — the primary pointer cannot hover.
    NoHover,
    /// `(prefers-reduced-motion: reduce)`.
    ReducedMotion,
}

impl MediaFeature {
    /// The media query string a CSS-backed probe should evaluate.
    pub fn query(self) -> &'static str {
        match self {
            Self::CoarsePointer => "(pointer: coarse)",
            Self::FinePointer => "(pointer: fine)",
            Self::Hover => "(hover: hover)",
            Self::NoHover => "(hover: none)",
            Self::ReducedMotion => "(prefers-reduced-motion: reduce)",
        }
    }
}

/// Why a single signal could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// The host environment does not expose this signal at all.
    Unsupported,
    /// The signal exists but reading it failed, e.g. access denied in a
    /// locked-down embedded context.
    Denied,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "signal not exposed by this host"),
            Self::Denied => write!(f, "signal read was denied by the host"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Read access to the raw signals capability detection samples.
///
/// Implementations must be cheap, synchronous reads; they are invoked
/// from inside event handlers. They must not panic: a signal that cannot
/// be read is reported as [`ProbeError`].
pub trait SignalProbe {
    /// Layout viewport size in CSS pixels (`innerWidth`/`innerHeight`).
    fn viewport_size(&self) -> Result<(u32, u32), ProbeError>;

    /// Physical screen size.
    fn screen_size(&self) -> Result<(u32, u32), ProbeError>;

    /// OS-available screen region.
    fn avail_screen_size(&self) -> Result<(u32, u32), ProbeError>;

    /// Device pixel ratio.
    fn pixel_ratio(&self) -> Result<f64, ProbeError>;

    /// Whether the given CSS media feature currently matches.
    fn media_matches(&self, feature: MediaFeature) -> Result<bool, ProbeError>;

    /// Whether the host surfaces touch event handlers (`ontouchstart` on
    /// the window or document root).
    fn has_touch_handler(&self) -> Result<bool, ProbeError>;

    /// Maximum simultaneous touch contacts, including any legacy vendor
    /// fallback the host still reports.
    fn max_touch_points(&self) -> Result<u32, ProbeError>;

    /// Legacy document-level touch object check.
    fn legacy_document_touch(&self) -> Result<bool, ProbeError>;

    /// Whether the host surfaces mouse-enter handlers.
    fn has_mouse_enter_handler(&self) -> Result<bool, ProbeError>;

    /// Whether the host surfaces keyboard event handlers.
    fn has_keyboard_handler(&self) -> Result<bool, ProbeError>;

    /// Approximate device memory in GiB.
    fn device_memory_gb(&self) -> Result<f64, ProbeError>;

    /// Logical CPU count.
    fn hardware_concurrency(&self) -> Result<u32, ProbeError>;

    /// Whether the host dispatches unified pointer events.
    fn supports_pointer_events(&self) -> Result<bool, ProbeError>;
}
