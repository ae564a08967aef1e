//! Viewport event wiring for the capability store.

use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::EventTarget;

use tactum_core::{CapabilityStore, ViewportEvent};

struct ListenerBinding {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl ListenerBinding {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut()>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            kind,
            closure,
        })
    }
}

impl Drop for ListenerBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Keeps the store recomputing on `resize` and orientation changes.
///
/// Prefers `screen.orientation`'s `change` event and falls back to the
/// legacy window `orientationchange`. Dropping the watch removes both
/// listeners.
pub struct ViewportWatch {
    _resize: ListenerBinding,
    _orientation: Option<ListenerBinding>,
}

/// Attach viewport listeners feeding `store`.
pub fn watch_viewport(store: &Rc<CapabilityStore>) -> Result<ViewportWatch, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let resize = {
        let store = store.clone();
        let closure = Closure::wrap(Box::new(move || {
            store.handle_viewport_event(ViewportEvent::Resized);
        }) as Box<dyn FnMut()>);
        ListenerBinding::attach(window.clone().into(), "resize", closure)?
    };

    let orientation_closure = {
        let store = store.clone();
        Closure::wrap(Box::new(move || {
            store.handle_viewport_event(ViewportEvent::OrientationChanged);
        }) as Box<dyn FnMut()>)
    };

    let orientation_target = window
        .screen()
        .ok()
        .filter(|screen| {
            // Only trust the typed binding where the API actually exists.
            Reflect::get(screen.as_ref(), &JsValue::from_str("orientation"))
                .map(|value| !value.is_undefined() && !value.is_null())
                .unwrap_or(false)
        })
        .map(|screen| ("change", EventTarget::from(screen.orientation())))
        .unwrap_or_else(|| ("orientationchange", window.into()));

    let orientation = match ListenerBinding::attach(
        orientation_target.1,
        orientation_target.0,
        orientation_closure,
    ) {
        Ok(binding) => Some(binding),
        Err(err) => {
            log::warn!("could not attach orientation listener: {err:?}");
            None
        }
    };

    Ok(ViewportWatch {
        _resize: resize,
        _orientation: orientation,
    })
}
