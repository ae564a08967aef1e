//! Capability detection heuristics.
//!
//! Pure functions from probed signals to a [`CapabilitySnapshot`]. Each
//! heuristic ORs several independent signals so that a host hiding one
//! API (or denying a read) degrades the answer instead of breaking it.
//! Failed probes are logged at `warn` and fall back to conservative
//! defaults; nothing in this module returns an error to the caller.

use crate::capabilities::{
    CapabilitySnapshot, DeviceType, Orientation, PerformanceLevel, PrimaryInput, ScreenMetrics,
};
use crate::probe::{MediaFeature, ProbeError, SignalProbe};

/// Largest viewport dimension still classified as a phone.
pub const MOBILE_MAX_VIEWPORT_PX: u32 = 768;

/// Largest viewport dimension still classified as a tablet; anything
/// larger is desktop.
pub const TABLET_MAX_VIEWPORT_PX: u32 = 1024;

/// Logical CPU count assumed when the host does not report one.
pub const DEFAULT_HARDWARE_CONCURRENCY: u32 = 4;

fn signal(name: &str, result: Result<bool, ProbeError>) -> bool {
    match result {
        Ok(value) => value,
        Err(err) => {
            log::warn!("capability probe '{name}' failed: {err}");
            false
        }
    }
}

/// Whether any touch input signal is present.
///
/// ORs five independent signals: a touch handler surface, a nonzero touch
/// point count (including the legacy vendor property), a coarse primary
/// pointer, a hoverless primary pointer, and the legacy document-touch
/// object. A host that fails every probe reports no touch.
pub fn detect_touch(probe: &dyn SignalProbe) -> bool {
    let touch_points = match probe.max_touch_points() {
        Ok(points) => points > 0,
        Err(err) => {
            log::warn!("capability probe 'max_touch_points' failed: {err}");
            false
        }
    };

    signal("touch_handler", probe.has_touch_handler())
        || touch_points
        || signal("coarse_pointer", probe.media_matches(MediaFeature::CoarsePointer))
        || signal("no_hover", probe.media_matches(MediaFeature::NoHover))
        || signal("document_touch", probe.legacy_document_touch())
}

/// Whether any mouse input signal is present.
pub fn detect_mouse(probe: &dyn SignalProbe) -> bool {
    signal("fine_pointer", probe.media_matches(MediaFeature::FinePointer))
        || signal("hover", probe.media_matches(MediaFeature::Hover))
        || signal("mouse_enter", probe.has_mouse_enter_handler())
}

/// Whether a keyboard is likely attached.
///
/// Hosts expose no direct keyboard capability signal, so the presence of
/// a keyboard handler surface is combined with the mouse heuristic:
/// pointer-driven hosts virtually always have a keyboard.
pub fn detect_keyboard(probe: &dyn SignalProbe, has_mouse: bool) -> bool {
    signal("keyboard_handler", probe.has_keyboard_handler()) || has_mouse
}

/// Classify the device from viewport dimensions.
///
/// Uses the larger dimension so rotation never reclassifies the device,
/// and the layout viewport rather than the physical screen because layout
/// is what consumers adapt to.
pub fn device_type_for(width: u32, height: u32) -> DeviceType {
    let max_dimension = width.max(height);
    if max_dimension <= MOBILE_MAX_VIEWPORT_PX {
        DeviceType::Mobile
    } else if max_dimension <= TABLET_MAX_VIEWPORT_PX {
        DeviceType::Tablet
    } else {
        DeviceType::Desktop
    }
}

/// Orientation from viewport dimensions. A square viewport is portrait.
pub fn orientation_for(width: u32, height: u32) -> Orientation {
    if width > height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

/// Tie-break between touch and mouse for the primary interaction method.
///
/// Phones are always touch-first and desktops always mouse-first,
/// whatever else they report. Tablets are touch-first whenever touch is
/// present, even with a mouse attached; that is a deliberate product
/// policy, not an oversight.
pub fn determine_primary_input(device_type: DeviceType, has_touch: bool) -> PrimaryInput {
    match device_type {
        DeviceType::Mobile => PrimaryInput::Touch,
        DeviceType::Desktop => PrimaryInput::Mouse,
        DeviceType::Tablet => {
            if has_touch {
                PrimaryInput::Touch
            } else {
                PrimaryInput::Mouse
            }
        }
    }
}

/// Performance tier heuristic over an existing snapshot.
pub fn performance_level(snapshot: &CapabilitySnapshot) -> PerformanceLevel {
    let memory = snapshot.device_memory_gb.unwrap_or(0.0);
    let cores = snapshot.hardware_concurrency;

    if snapshot.device_type == DeviceType::Desktop && (memory >= 8.0 || cores >= 8) {
        PerformanceLevel::High
    } else if snapshot.device_type == DeviceType::Tablet || memory >= 4.0 || cores >= 4 {
        PerformanceLevel::Medium
    } else {
        PerformanceLevel::Low
    }
}

fn capture_screen_metrics(probe: &dyn SignalProbe) -> ScreenMetrics {
    let mut metrics = ScreenMetrics::default();

    match probe.viewport_size() {
        Ok((width, height)) => {
            metrics.width = width;
            metrics.height = height;
        }
        Err(err) => log::warn!("capability probe 'viewport_size' failed: {err}"),
    }
    match probe.screen_size() {
        Ok((width, height)) => {
            metrics.screen_width = width;
            metrics.screen_height = height;
        }
        Err(err) => log::warn!("capability probe 'screen_size' failed: {err}"),
    }
    match probe.avail_screen_size() {
        Ok((width, height)) => {
            metrics.avail_width = width;
            metrics.avail_height = height;
        }
        Err(err) => log::warn!("capability probe 'avail_screen_size' failed: {err}"),
    }
    match probe.pixel_ratio() {
        Ok(ratio) => metrics.pixel_ratio = ratio.max(1.0),
        Err(err) => log::warn!("capability probe 'pixel_ratio' failed: {err}"),
    }

    metrics
}

/// Build a full capability snapshot from the probe's current signals.
///
/// Every probe read is independently fallible; a failing signal is logged
/// and replaced with its safe default, so this function always produces a
/// snapshot.
pub fn capture_snapshot(probe: &dyn SignalProbe) -> CapabilitySnapshot {
    let screen = capture_screen_metrics(probe);

    let has_touch = detect_touch(probe);
    let has_mouse = detect_mouse(probe);
    let has_keyboard = detect_keyboard(probe, has_mouse);

    let device_type = device_type_for(screen.width, screen.height);
    let orientation = orientation_for(screen.width, screen.height);

    let device_memory_gb = match probe.device_memory_gb() {
        Ok(memory) => Some(memory),
        Err(err) => {
            log::warn!("capability probe 'device_memory' failed: {err}");
            None
        }
    };
    let hardware_concurrency = match probe.hardware_concurrency() {
        Ok(cores) if cores > 0 => cores,
        Ok(_) => DEFAULT_HARDWARE_CONCURRENCY,
        Err(err) => {
            log::warn!("capability probe 'hardware_concurrency' failed: {err}");
            DEFAULT_HARDWARE_CONCURRENCY
        }
    };

    CapabilitySnapshot {
        has_touch,
        has_mouse,
        has_keyboard,
        screen,
        device_type,
        orientation,
        device_memory_gb,
        hardware_concurrency,
        supports_pointer_events: signal("pointer_events", probe.supports_pointer_events()),
        supports_hover: signal("hover", probe.media_matches(MediaFeature::Hover)),
        prefers_reduced_motion: signal(
            "reduced_motion",
            probe.media_matches(MediaFeature::ReducedMotion),
        ),
        primary_input: determine_primary_input(device_type, has_touch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Minimal scriptable probe for heuristic tests. The richer harness
    /// lives in tactum-testing; this one avoids a circular dev-dependency.
    struct TestProbe {
        viewport: (u32, u32),
        touch_points: u32,
        touch_handler: bool,
        matching: HashSet<MediaFeature>,
        memory: Option<f64>,
        cores: Option<u32>,
        failing: bool,
    }

    impl TestProbe {
        fn new(viewport: (u32, u32)) -> Self {
            Self {
                viewport,
                touch_points: 0,
                touch_handler: false,
                matching: HashSet::new(),
                memory: None,
                cores: None,
                failing: false,
            }
        }

        fn with_touch_handler(mut self) -> Self {
            self.touch_handler = true;
            self
        }

        fn with_touch_points(mut self, points: u32) -> Self {
            self.touch_points = points;
            self
        }

        fn with_media(mut self, feature: MediaFeature) -> Self {
            self.matching.insert(feature);
            self
        }

        fn with_memory(mut self, gb: f64) -> Self {
            self.memory = Some(gb);
            self
        }

        fn with_cores(mut self, cores: u32) -> Self {
            self.cores = Some(cores);
            self
        }

        fn failing_everything(mut self) -> Self {
            self.failing = true;
            self
        }

        fn check<T>(&self, value: T) -> Result<T, ProbeError> {
            if self.failing {
                Err(ProbeError::Denied)
            } else {
                Ok(value)
            }
        }
    }

    impl SignalProbe for TestProbe {
        fn viewport_size(&self) -> Result<(u32, u32), ProbeError> {
            self.check(self.viewport)
        }

        fn screen_size(&self) -> Result<(u32, u32), ProbeError> {
            self.check(self.viewport)
        }

        fn avail_screen_size(&self) -> Result<(u32, u32), ProbeError> {
            self.check(self.viewport)
        }

        fn pixel_ratio(&self) -> Result<f64, ProbeError> {
            self.check(1.0)
        }

        fn media_matches(&self, feature: MediaFeature) -> Result<bool, ProbeError> {
            self.check(self.matching.contains(&feature))
        }

        fn has_touch_handler(&self) -> Result<bool, ProbeError> {
            self.check(self.touch_handler)
        }

        fn max_touch_points(&self) -> Result<u32, ProbeError> {
            self.check(self.touch_points)
        }

        fn legacy_document_touch(&self) -> Result<bool, ProbeError> {
            self.check(false)
        }

        fn has_mouse_enter_handler(&self) -> Result<bool, ProbeError> {
            self.check(false)
        }

        fn has_keyboard_handler(&self) -> Result<bool, ProbeError> {
            self.check(false)
        }

        fn device_memory_gb(&self) -> Result<f64, ProbeError> {
            self.memory.ok_or(ProbeError::Unsupported).and_then(|m| self.check(m))
        }

        fn hardware_concurrency(&self) -> Result<u32, ProbeError> {
            self.cores.ok_or(ProbeError::Unsupported).and_then(|c| self.check(c))
        }

        fn supports_pointer_events(&self) -> Result<bool, ProbeError> {
            self.check(false)
        }
    }

    #[test]
    fn device_classification_thresholds() {
        assert_eq!(device_type_for(320, 480), DeviceType::Mobile);
        assert_eq!(device_type_for(768, 600), DeviceType::Mobile);
        assert_eq!(device_type_for(769, 600), DeviceType::Tablet);
        assert_eq!(device_type_for(600, 1024), DeviceType::Tablet);
        assert_eq!(device_type_for(1025, 700), DeviceType::Desktop);
        assert_eq!(device_type_for(1920, 1080), DeviceType::Desktop);
    }

    #[test]
    fn orientation_from_viewport() {
        assert_eq!(orientation_for(800, 1200), Orientation::Portrait);
        assert_eq!(orientation_for(1200, 800), Orientation::Landscape);
        assert_eq!(orientation_for(800, 800), Orientation::Portrait);
    }

    #[test]
    fn tablet_tie_break_prefers_touch() {
        assert_eq!(
            determine_primary_input(DeviceType::Tablet, true),
            PrimaryInput::Touch
        );
        assert_eq!(
            determine_primary_input(DeviceType::Tablet, false),
            PrimaryInput::Mouse
        );
        // Phones and desktops ignore the flags entirely.
        assert_eq!(
            determine_primary_input(DeviceType::Mobile, false),
            PrimaryInput::Touch
        );
        assert_eq!(
            determine_primary_input(DeviceType::Desktop, true),
            PrimaryInput::Mouse
        );
    }

    #[test]
    fn phone_viewport_with_touch_handler() {
        // 375x667 with a touch handler present.
        let probe = TestProbe::new((375, 667)).with_touch_handler();
        let snap = capture_snapshot(&probe);
        assert_eq!(snap.device_type, DeviceType::Mobile);
        assert!(snap.has_touch);
        assert!(snap.is_primary_touch());
        assert!(!snap.is_primary_mouse());
    }

    #[test]
    fn desktop_viewport_with_fine_pointer() {
        let probe = TestProbe::new((1920, 1080)).with_media(MediaFeature::FinePointer);
        let snap = capture_snapshot(&probe);
        assert_eq!(snap.device_type, DeviceType::Desktop);
        assert!(!snap.has_touch);
        assert!(snap.has_mouse);
        assert!(snap.is_primary_mouse());
    }

    #[test]
    fn tablet_portrait_with_touch_points() {
        let probe = TestProbe::new((800, 1200)).with_touch_points(5);
        let snap = capture_snapshot(&probe);
        assert_eq!(snap.device_type, DeviceType::Tablet);
        assert_eq!(snap.orientation, Orientation::Portrait);
        assert!(snap.is_primary_touch());
    }

    #[test]
    fn low_end_phone_performance_level() {
        let probe = TestProbe::new((375, 667))
            .with_touch_handler()
            .with_memory(2.0)
            .with_cores(2);
        let snap = capture_snapshot(&probe);
        assert_eq!(snap.performance_level(), PerformanceLevel::Low);
    }

    #[test]
    fn desktop_performance_tiers() {
        let high = TestProbe::new((1920, 1080)).with_memory(16.0).with_cores(12);
        assert_eq!(
            capture_snapshot(&high).performance_level(),
            PerformanceLevel::High
        );

        let medium = TestProbe::new((1920, 1080)).with_memory(4.0).with_cores(4);
        assert_eq!(
            capture_snapshot(&medium).performance_level(),
            PerformanceLevel::Medium
        );
    }

    #[test]
    fn tablet_is_at_least_medium() {
        let probe = TestProbe::new((800, 1200)).with_touch_points(5).with_cores(2);
        assert_eq!(
            capture_snapshot(&probe).performance_level(),
            PerformanceLevel::Medium
        );
    }

    #[test]
    fn failing_probes_still_produce_a_snapshot() {
        let probe = TestProbe::new((1920, 1080)).failing_everything();
        let snap = capture_snapshot(&probe);
        assert!(!snap.has_touch);
        assert!(!snap.has_mouse);
        assert_eq!(snap.screen.width, 0);
        assert_eq!(snap.hardware_concurrency, DEFAULT_HARDWARE_CONCURRENCY);
        assert_eq!(snap.device_memory_gb, None);
        // Exclusivity holds even on a fully degraded snapshot.
        assert!(snap.is_primary_touch() ^ snap.is_primary_mouse());
    }

    #[test]
    fn unknown_concurrency_defaults_to_four() {
        let probe = TestProbe::new((375, 667)).with_touch_handler();
        let snap = capture_snapshot(&probe);
        assert_eq!(snap.hardware_concurrency, DEFAULT_HARDWARE_CONCURRENCY);
    }
}
