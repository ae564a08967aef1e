//! Browser-backed signal probe.

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::Window;

use tactum_core::probe::{MediaFeature, ProbeError, SignalProbe};

/// [`SignalProbe`] over `window` / `navigator` / `screen`.
///
/// Modern signals go through typed `web-sys` bindings; legacy and
/// experimental ones (`ontouchstart`, `msMaxTouchPoints`, `DocumentTouch`,
/// `deviceMemory`) are read reflectively so a host that lacks them
/// degrades to a [`ProbeError`] instead of a missing-import failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSignals;

impl WebSignals {
    pub fn new() -> Self {
        Self
    }
}

fn window() -> Result<Window, ProbeError> {
    web_sys::window().ok_or(ProbeError::Unsupported)
}

fn has_property(target: &JsValue, name: &str) -> Result<bool, ProbeError> {
    Reflect::has(target, &JsValue::from_str(name)).map_err(|_| ProbeError::Denied)
}

fn numeric_property(target: &JsValue, name: &str) -> Result<f64, ProbeError> {
    let value = Reflect::get(target, &JsValue::from_str(name)).map_err(|_| ProbeError::Denied)?;
    value.as_f64().ok_or(ProbeError::Unsupported)
}

fn dimension(value: Result<JsValue, JsValue>) -> Result<u32, ProbeError> {
    value
        .map_err(|_| ProbeError::Denied)?
        .as_f64()
        .ok_or(ProbeError::Unsupported)
        .map(|v| v.max(0.0) as u32)
}

impl SignalProbe for WebSignals {
    fn viewport_size(&self) -> Result<(u32, u32), ProbeError> {
        let window = window()?;
        Ok((
            dimension(window.inner_width())?,
            dimension(window.inner_height())?,
        ))
    }

    fn screen_size(&self) -> Result<(u32, u32), ProbeError> {
        let screen = window()?.screen().map_err(|_| ProbeError::Denied)?;
        let width = screen.width().map_err(|_| ProbeError::Denied)?;
        let height = screen.height().map_err(|_| ProbeError::Denied)?;
        Ok((width.max(0) as u32, height.max(0) as u32))
    }

    fn avail_screen_size(&self) -> Result<(u32, u32), ProbeError> {
        let screen = window()?.screen().map_err(|_| ProbeError::Denied)?;
        let width = screen.avail_width().map_err(|_| ProbeError::Denied)?;
        let height = screen.avail_height().map_err(|_| ProbeError::Denied)?;
        Ok((width.max(0) as u32, height.max(0) as u32))
    }

    fn pixel_ratio(&self) -> Result<f64, ProbeError> {
        Ok(window()?.device_pixel_ratio())
    }

    fn media_matches(&self, feature: MediaFeature) -> Result<bool, ProbeError> {
        let list = window()?
            .match_media(feature.query())
            .map_err(|_| ProbeError::Denied)?
            .ok_or(ProbeError::Unsupported)?;
        Ok(list.matches())
    }

    fn has_touch_handler(&self) -> Result<bool, ProbeError> {
        let window = window()?;
        if has_property(window.as_ref(), "ontouchstart")? {
            return Ok(true);
        }
        let root = window
            .document()
            .and_then(|document| document.document_element());
        match root {
            Some(root) => has_property(root.as_ref(), "ontouchstart"),
            None => Ok(false),
        }
    }

    fn max_touch_points(&self) -> Result<u32, ProbeError> {
        let window = window()?;
        let navigator = window.navigator();
        let standard = navigator.max_touch_points().max(0) as u32;
        // Old IE/Edge reported the vendor-prefixed property only.
        let legacy = numeric_property(navigator.as_ref(), "msMaxTouchPoints")
            .map(|points| points.max(0.0) as u32)
            .unwrap_or(0);
        Ok(standard.max(legacy))
    }

    fn legacy_document_touch(&self) -> Result<bool, ProbeError> {
        let window = window()?;
        let ctor = Reflect::get(window.as_ref(), &JsValue::from_str("DocumentTouch"))
            .map_err(|_| ProbeError::Denied)?;
        Ok(ctor.is_function())
    }

    fn has_mouse_enter_handler(&self) -> Result<bool, ProbeError> {
        has_property(window()?.as_ref(), "onmouseenter")
    }

    fn has_keyboard_handler(&self) -> Result<bool, ProbeError> {
        has_property(window()?.as_ref(), "onkeydown")
    }

    fn device_memory_gb(&self) -> Result<f64, ProbeError> {
        let window = window()?;
        numeric_property(window.navigator().as_ref(), "deviceMemory")
    }

    fn hardware_concurrency(&self) -> Result<u32, ProbeError> {
        let window = window()?;
        let cores = window.navigator().hardware_concurrency();
        if cores > 0.0 {
            Ok(cores as u32)
        } else {
            Err(ProbeError::Unsupported)
        }
    }

    fn supports_pointer_events(&self) -> Result<bool, ProbeError> {
        has_property(window()?.as_ref(), "PointerEvent")
    }
}
