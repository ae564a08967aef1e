//! Scriptable signal probe.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use tactum_core::probe::{MediaFeature, ProbeError, SignalProbe};

/// A [`SignalProbe`] whose every signal is settable from the test body.
///
/// All fields are interior-mutable so a test can hold an `Rc` to the
/// probe, hand a clone to a store, and mutate signals between refreshes
/// to simulate rotation, resize, or a locked-down host.
pub struct ScriptedSignals {
    viewport: Cell<(u32, u32)>,
    screen: Cell<(u32, u32)>,
    avail: Cell<(u32, u32)>,
    pixel_ratio: Cell<f64>,
    media: RefCell<HashSet<MediaFeature>>,
    touch_handler: Cell<bool>,
    max_touch_points: Cell<u32>,
    document_touch: Cell<bool>,
    mouse_enter: Cell<bool>,
    keyboard: Cell<bool>,
    device_memory: Cell<Option<f64>>,
    cores: Cell<Option<u32>>,
    pointer_events: Cell<bool>,
    deny_all: Cell<bool>,
}

impl ScriptedSignals {
    pub fn new(viewport: (u32, u32)) -> Rc<Self> {
        Rc::new(Self {
            viewport: Cell::new(viewport),
            screen: Cell::new(viewport),
            avail: Cell::new(viewport),
            pixel_ratio: Cell::new(1.0),
            media: RefCell::new(HashSet::new()),
            touch_handler: Cell::new(false),
            max_touch_points: Cell::new(0),
            document_touch: Cell::new(false),
            mouse_enter: Cell::new(false),
            keyboard: Cell::new(false),
            device_memory: Cell::new(None),
            cores: Cell::new(None),
            pointer_events: Cell::new(false),
            deny_all: Cell::new(false),
        })
    }

    /// A typical phone: small viewport, touch everything, no hover.
    pub fn phone() -> Rc<Self> {
        let signals = Self::new((375, 667));
        signals.touch_handler.set(true);
        signals.max_touch_points.set(5);
        signals.set_media(MediaFeature::CoarsePointer, true);
        signals.set_media(MediaFeature::NoHover, true);
        signals.pointer_events.set(true);
        signals
    }

    /// A tablet-range viewport in portrait with multi-touch.
    pub fn tablet() -> Rc<Self> {
        let signals = Self::new((800, 1200));
        signals.max_touch_points.set(5);
        signals.set_media(MediaFeature::CoarsePointer, true);
        signals.pointer_events.set(true);
        signals
    }

    /// A desktop: large viewport, fine pointer, hover, keyboard.
    pub fn desktop() -> Rc<Self> {
        let signals = Self::new((1920, 1080));
        signals.set_media(MediaFeature::FinePointer, true);
        signals.set_media(MediaFeature::Hover, true);
        signals.mouse_enter.set(true);
        signals.keyboard.set(true);
        signals.pointer_events.set(true);
        signals
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.viewport.set((width, height));
    }

    pub fn rotate(&self) {
        let (width, height) = self.viewport.get();
        self.viewport.set((height, width));
    }

    pub fn set_media(&self, feature: MediaFeature, matches: bool) {
        let mut media = self.media.borrow_mut();
        if matches {
            media.insert(feature);
        } else {
            media.remove(&feature);
        }
    }

    pub fn set_touch_handler(&self, present: bool) {
        self.touch_handler.set(present);
    }

    pub fn set_max_touch_points(&self, points: u32) {
        self.max_touch_points.set(points);
    }

    pub fn set_device_memory(&self, gb: Option<f64>) {
        self.device_memory.set(gb);
    }

    pub fn set_hardware_concurrency(&self, cores: Option<u32>) {
        self.cores.set(cores);
    }

    /// Make every subsequent probe read fail, as in a locked-down host.
    pub fn deny_everything(&self) {
        self.deny_all.set(true);
    }

    fn read<T>(&self, value: T) -> Result<T, ProbeError> {
        if self.deny_all.get() {
            Err(ProbeError::Denied)
        } else {
            Ok(value)
        }
    }
}

impl SignalProbe for ScriptedSignals {
    fn viewport_size(&self) -> Result<(u32, u32), ProbeError> {
        self.read(self.viewport.get())
    }

    fn screen_size(&self) -> Result<(u32, u32), ProbeError> {
        self.read(self.screen.get())
    }

    fn avail_screen_size(&self) -> Result<(u32, u32), ProbeError> {
        self.read(self.avail.get())
    }

    fn pixel_ratio(&self) -> Result<f64, ProbeError> {
        self.read(self.pixel_ratio.get())
    }

    fn media_matches(&self, feature: MediaFeature) -> Result<bool, ProbeError> {
        self.read(self.media.borrow().contains(&feature))
    }

    fn has_touch_handler(&self) -> Result<bool, ProbeError> {
        self.read(self.touch_handler.get())
    }

    fn max_touch_points(&self) -> Result<u32, ProbeError> {
        self.read(self.max_touch_points.get())
    }

    fn legacy_document_touch(&self) -> Result<bool, ProbeError> {
        self.read(self.document_touch.get())
    }

    fn has_mouse_enter_handler(&self) -> Result<bool, ProbeError> {
        self.read(self.mouse_enter.get())
    }

    fn has_keyboard_handler(&self) -> Result<bool, ProbeError> {
        self.read(self.keyboard.get())
    }

    fn device_memory_gb(&self) -> Result<f64, ProbeError> {
        match self.device_memory.get() {
            Some(gb) => self.read(gb),
            None => Err(ProbeError::Unsupported),
        }
    }

    fn hardware_concurrency(&self) -> Result<u32, ProbeError> {
        match self.cores.get() {
            Some(cores) => self.read(cores),
            None => Err(ProbeError::Unsupported),
        }
    }

    fn supports_pointer_events(&self) -> Result<bool, ProbeError> {
        self.read(self.pointer_events.get())
    }
}
