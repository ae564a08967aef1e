//! Immutable device capability snapshots.
//!
//! A [`CapabilitySnapshot`] describes the input and performance
//! characteristics of the host at one point in time. Snapshots are
//! recomputed wholesale and replaced, never patched in place, so a
//! reference to one is always internally consistent.

/// Coarse device class, derived from the layout viewport.
///
/// Classification uses the larger viewport dimension so that rotating a
/// device never changes its class, only its [`Orientation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

/// Viewport orientation, derived from width vs. height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// The single interaction modality the UI should optimize for, even when
/// several are technically available.
///
/// Exactly one of touch or mouse is primary for any snapshot; representing
/// the choice as an enum makes the "never both, never neither" invariant
/// unrepresentable rather than merely checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryInput {
    Touch,
    Mouse,
}

/// Rough performance tier used to scale down visual effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PerformanceLevel {
    Low,
    Medium,
    High,
}

/// Viewport and physical screen geometry.
///
/// `width`/`height` are the layout viewport; `screen_*` and `avail_*` are
/// the physical screen and its OS-available region. Layout decisions key
/// off the viewport, not the hardware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Device pixel ratio, clamped to at least 1.0.
    pub pixel_ratio: f64,
}

impl ScreenMetrics {
    /// The larger viewport dimension, used for device classification.
    pub fn max_viewport_dimension(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            avail_width: 0,
            avail_height: 0,
            screen_width: 0,
            screen_height: 0,
            pixel_ratio: 1.0,
        }
    }
}

/// Immutable record of the host device's input and performance
/// characteristics.
///
/// Produced by [`crate::detector::capture_snapshot`] and cached by
/// [`crate::store::CapabilityStore`]. The capability flags (`has_touch`,
/// `has_mouse`, `has_keyboard`) are independent and not mutually
/// exclusive; `primary_input` is the derived tie-break between them.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitySnapshot {
    pub has_touch: bool,
    pub has_mouse: bool,
    pub has_keyboard: bool,
    pub screen: ScreenMetrics,
    pub device_type: DeviceType,
    pub orientation: Orientation,
    /// Approximate device memory in GiB, when the host exposes it.
    pub device_memory_gb: Option<f64>,
    /// Logical CPU count, defaulting to 4 when unknown.
    pub hardware_concurrency: u32,
    pub supports_pointer_events: bool,
    pub supports_hover: bool,
    pub prefers_reduced_motion: bool,
    pub primary_input: PrimaryInput,
}

impl CapabilitySnapshot {
    pub fn is_primary_touch(&self) -> bool {
        self.primary_input == PrimaryInput::Touch
    }

    pub fn is_primary_mouse(&self) -> bool {
        self.primary_input == PrimaryInput::Mouse
    }

    pub fn is_mobile(&self) -> bool {
        self.device_type == DeviceType::Mobile
    }

    pub fn is_tablet(&self) -> bool {
        self.device_type == DeviceType::Tablet
    }

    pub fn is_desktop(&self) -> bool {
        self.device_type == DeviceType::Desktop
    }

    /// Performance tier for this snapshot.
    ///
    /// Recomputed on every call; the heuristic is cheap and callers must
    /// never observe a tier that disagrees with the snapshot it came from.
    pub fn performance_level(&self) -> PerformanceLevel {
        crate::detector::performance_level(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: u32, height: u32) -> ScreenMetrics {
        ScreenMetrics {
            width,
            height,
            avail_width: width,
            avail_height: height,
            screen_width: width,
            screen_height: height,
            pixel_ratio: 1.0,
        }
    }

    fn snapshot(primary: PrimaryInput) -> CapabilitySnapshot {
        CapabilitySnapshot {
            has_touch: true,
            has_mouse: true,
            has_keyboard: true,
            screen: metrics(800, 1200),
            device_type: DeviceType::Tablet,
            orientation: Orientation::Portrait,
            device_memory_gb: Some(4.0),
            hardware_concurrency: 4,
            supports_pointer_events: true,
            supports_hover: false,
            prefers_reduced_motion: false,
            primary_input: primary,
        }
    }

    #[test]
    fn primary_input_accessors_are_exclusive() {
        for primary in [PrimaryInput::Touch, PrimaryInput::Mouse] {
            let snap = snapshot(primary);
            assert!(snap.is_primary_touch() ^ snap.is_primary_mouse());
        }
    }

    #[test]
    fn max_viewport_dimension_ignores_orientation() {
        assert_eq!(metrics(800, 1200).max_viewport_dimension(), 1200);
        assert_eq!(metrics(1200, 800).max_viewport_dimension(), 1200);
    }
}
