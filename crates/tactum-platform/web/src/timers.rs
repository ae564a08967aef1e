//! `setTimeout`-backed timer driver.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use tactum_core::platform::{TimerDriver, TimerToken};

struct LiveTimer {
    handle: i32,
    // Keeps the JS shim alive until the timeout fires or is cancelled.
    _closure: Closure<dyn FnMut()>,
}

/// [`TimerDriver`] over `setTimeout` / `clearTimeout`.
///
/// Closures are retained in a live-timer table and released when the
/// timeout fires or is cancelled, so cancelled registrations cannot keep
/// dangling callbacks alive.
#[derive(Default)]
pub struct WebTimers {
    next_token: Cell<u64>,
    live: Rc<RefCell<HashMap<u64, LiveTimer>>>,
}

impl WebTimers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

impl TimerDriver for WebTimers {
    fn schedule(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerToken {
        let raw = self.next_token.get() + 1;
        self.next_token.set(raw);
        let token = TimerToken::new(raw);

        let live = self.live.clone();
        let callback = RefCell::new(Some(callback));
        let closure = Closure::wrap(Box::new(move || {
            live.borrow_mut().remove(&raw);
            if let Some(callback) = callback.borrow_mut().take() {
                callback();
            }
        }) as Box<dyn FnMut()>);

        let Some(window) = web_sys::window() else {
            log::warn!("no window to schedule a timer on");
            return token;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms.max(0.0) as i32,
        ) {
            Ok(handle) => {
                self.live.borrow_mut().insert(
                    raw,
                    LiveTimer {
                        handle,
                        _closure: closure,
                    },
                );
            }
            Err(err) => log::warn!("setTimeout failed: {err:?}"),
        }
        token
    }

    fn cancel(&self, token: TimerToken) {
        if let Some(timer) = self.live.borrow_mut().remove(&token.raw()) {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(timer.handle);
            }
        }
    }
}
