//! Per-component gesture registration lifecycle.

use std::cell::RefCell;
use std::rc::Rc;

use tactum_gesture::{ElementGeometry, ElementId, GestureCallbacks, GestureRecognizer};

/// Opaque identity of the host element a binding targets.
///
/// Hosts pick a value that is stable for "the same element" across
/// renders (the web adapter derives one from the DOM node); a changed
/// key is what triggers replacement of the underlying registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementKey(u64);

impl ElementKey {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Manages at most one recognizer registration for a mounted component.
///
/// Attaching a different element key tears the previous registration
/// down fully (sessions, pending timers) before the new one is created;
/// re-attaching the same key only refreshes geometry. Detach and drop
/// both unregister, so an unmounted component can never receive another
/// callback.
pub struct GestureBinding {
    recognizer: Rc<GestureRecognizer>,
    current: RefCell<Option<(ElementKey, ElementId)>>,
}

impl GestureBinding {
    pub fn new(recognizer: Rc<GestureRecognizer>) -> Self {
        Self {
            recognizer,
            current: RefCell::new(None),
        }
    }

    /// Bind the component to a concrete element.
    ///
    /// Callbacks are bound when a key is first attached; a same-key
    /// re-attach keeps the existing registration (and its callbacks) and
    /// only refreshes geometry.
    pub fn attach(
        &self,
        key: ElementKey,
        geometry: ElementGeometry,
        callbacks: GestureCallbacks,
    ) -> ElementId {
        if let Some((current_key, current_id)) = *self.current.borrow() {
            if current_key == key {
                self.recognizer.update_geometry(current_id, geometry);
                return current_id;
            }
            log::debug!(
                "gesture target changed ({} -> {}), replacing registration",
                current_key.raw(),
                key.raw(),
            );
            self.recognizer.unregister(current_id);
        }

        let id = self.recognizer.register(geometry, callbacks);
        *self.current.borrow_mut() = Some((key, id));
        id
    }

    /// Tear down the current registration, if any. Idempotent.
    pub fn detach(&self) {
        if let Some((_, id)) = self.current.borrow_mut().take() {
            self.recognizer.unregister(id);
        }
    }

    /// Handle of the live registration, if attached.
    pub fn element_id(&self) -> Option<ElementId> {
        (*self.current.borrow()).map(|(_, id)| id)
    }
}

impl Drop for GestureBinding {
    fn drop(&mut self) {
        self.detach();
    }
}
