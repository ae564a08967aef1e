//! DOM touch event bridge for one element.

use std::fmt;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, TouchEvent};

use tactum_gesture::{
    ElementGeometry, ElementId, GestureCallbacks, GestureRecognizer, Point, Size, TouchPoint,
};

/// Expando property memoizing the registration id on the DOM node, used
/// only to refuse double-attachment.
const REGISTRATION_PROPERTY: &str = "__tactumRegistration";

/// Why an element could not be bridged.
#[derive(Debug)]
pub enum AttachError {
    /// The element already has a live bridge.
    AlreadyAttached,
    /// A DOM call failed while wiring listeners.
    Dom(JsValue),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAttached => write!(f, "element already has a gesture registration"),
            Self::Dom(err) => write!(f, "listener wiring failed: {err:?}"),
        }
    }
}

impl std::error::Error for AttachError {}

struct TouchListener {
    element: HtmlElement,
    kind: &'static str,
    closure: Closure<dyn FnMut(TouchEvent)>,
}

impl TouchListener {
    fn attach(
        element: &HtmlElement,
        kind: &'static str,
        closure: Closure<dyn FnMut(TouchEvent)>,
    ) -> Result<Self, AttachError> {
        element
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(AttachError::Dom)?;
        Ok(Self {
            element: element.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for TouchListener {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

fn element_geometry(element: &HtmlElement) -> ElementGeometry {
    let rect = element.get_bounding_client_rect();
    ElementGeometry {
        origin: Point::new(rect.x() as f32, rect.y() as f32),
        size: Size::new(rect.width() as f32, rect.height() as f32),
    }
}

/// Changed contacts of a touch event as recognizer samples. Entries the
/// browser hands us without data are skipped.
fn changed_samples(event: &TouchEvent) -> Vec<TouchPoint> {
    let touches = event.changed_touches();
    let mut samples = Vec::with_capacity(touches.length() as usize);
    for index in 0..touches.length() {
        let Some(touch) = touches.item(index) else {
            log::trace!("touch list entry {index} missing, skipped");
            continue;
        };
        samples.push(TouchPoint {
            id: i64::from(touch.identifier()) as u64,
            position: Point::new(touch.client_x() as f32, touch.client_y() as f32),
            page_position: Point::new(touch.page_x() as f32, touch.page_y() as f32),
            time_ms: event.time_stamp(),
        });
    }
    samples
}

/// Owns the DOM listeners and recognizer registration for one element.
///
/// Dropping the bridge removes the listeners, clears the memoized id,
/// and unregisters, so no callback can reach a detached element.
pub struct TouchBridge {
    recognizer: Rc<GestureRecognizer>,
    element: HtmlElement,
    id: ElementId,
    _listeners: Vec<TouchListener>,
}

impl TouchBridge {
    /// Wire an element into the recognizer.
    ///
    /// Refuses to attach twice to the same node: the registration id is
    /// memoized on the node and checked first.
    pub fn attach(
        recognizer: Rc<GestureRecognizer>,
        element: &HtmlElement,
        callbacks: GestureCallbacks,
    ) -> Result<Self, AttachError> {
        let key = JsValue::from_str(REGISTRATION_PROPERTY);
        let existing = Reflect::get(element.as_ref(), &key).map_err(AttachError::Dom)?;
        if existing.as_f64().is_some() {
            return Err(AttachError::AlreadyAttached);
        }

        let id = recognizer.register(element_geometry(element), callbacks);
        Reflect::set(element.as_ref(), &key, &JsValue::from_f64(id.raw() as f64))
            .map_err(AttachError::Dom)?;

        let mut listeners = Vec::with_capacity(4);

        {
            let recognizer = recognizer.clone();
            let element_handle = element.clone();
            let closure = Closure::wrap(Box::new(move |event: TouchEvent| {
                // The element may have moved since the last gesture;
                // re-anchor element-relative coordinates.
                recognizer.update_geometry(id, element_geometry(&element_handle));
                let disposition = recognizer.touch_start(id, &changed_samples(&event));
                if disposition.suppress_default {
                    event.prevent_default();
                }
            }) as Box<dyn FnMut(TouchEvent)>);
            listeners.push(TouchListener::attach(element, "touchstart", closure)?);
        }
        {
            let recognizer = recognizer.clone();
            let closure = Closure::wrap(Box::new(move |event: TouchEvent| {
                recognizer.touch_move(id, &changed_samples(&event));
            }) as Box<dyn FnMut(TouchEvent)>);
            listeners.push(TouchListener::attach(element, "touchmove", closure)?);
        }
        {
            let recognizer = recognizer.clone();
            let closure = Closure::wrap(Box::new(move |event: TouchEvent| {
                recognizer.touch_end(id, &changed_samples(&event));
            }) as Box<dyn FnMut(TouchEvent)>);
            listeners.push(TouchListener::attach(element, "touchend", closure)?);
        }
        {
            let recognizer = recognizer.clone();
            let closure = Closure::wrap(Box::new(move |_event: TouchEvent| {
                recognizer.touch_cancel(id);
            }) as Box<dyn FnMut(TouchEvent)>);
            listeners.push(TouchListener::attach(element, "touchcancel", closure)?);
        }

        Ok(Self {
            recognizer,
            element: element.clone(),
            id,
            _listeners: listeners,
        })
    }

    pub fn element_id(&self) -> ElementId {
        self.id
    }
}

impl Drop for TouchBridge {
    fn drop(&mut self) {
        let key = JsValue::from_str(REGISTRATION_PROPERTY);
        let _ = Reflect::delete_property(self.element.unchecked_ref::<js_sys::Object>(), &key);
        self.recognizer.unregister(self.id);
    }
}
