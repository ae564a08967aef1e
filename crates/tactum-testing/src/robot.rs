//! Scripted touch input against a recognizer registration.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tactum_gesture::{
    ElementId, GestureCallbacks, GestureEvent, GestureRecognizer, GestureState, Point, TouchId,
    TouchPoint,
};

use crate::timers::ManualTimers;

/// Drives synthetic touch sequences through one element registration,
/// keeping its own event clock in lockstep with a [`ManualTimers`]
/// driver so trailing throttle timers fire where real time would put
/// them.
pub struct TouchRobot {
    recognizer: Rc<GestureRecognizer>,
    element: ElementId,
    timers: Option<Rc<ManualTimers>>,
    now_ms: Cell<f64>,
    next_contact: Cell<TouchId>,
    active: Cell<Option<(TouchId, Point)>>,
}

impl TouchRobot {
    pub fn new(recognizer: Rc<GestureRecognizer>, element: ElementId) -> Self {
        Self {
            recognizer,
            element,
            timers: None,
            now_ms: Cell::new(0.0),
            next_contact: Cell::new(1),
            active: Cell::new(None),
        }
    }

    /// Keep the given manual timer driver advancing with the robot clock.
    pub fn with_timers(mut self, timers: Rc<ManualTimers>) -> Self {
        self.timers = Some(timers);
        self
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }

    /// Advance the event clock (and any attached timer driver).
    pub fn advance(&self, delta_ms: f64) {
        let now = self.now_ms.get() + delta_ms;
        self.now_ms.set(now);
        if let Some(timers) = &self.timers {
            timers.advance_to(now);
        }
    }

    fn sample(&self, id: TouchId, x: f32, y: f32) -> TouchPoint {
        TouchPoint {
            id,
            position: Point::new(x, y),
            page_position: Point::new(x, y),
            time_ms: self.now_ms.get(),
        }
    }

    /// Put a new contact down and make it the robot's active contact.
    pub fn press(&self, x: f32, y: f32) -> TouchId {
        let id = self.next_contact.get();
        self.next_contact.set(id + 1);
        self.active.set(Some((id, Point::new(x, y))));
        self.recognizer
            .touch_start(self.element, &[self.sample(id, x, y)]);
        id
    }

    /// Move the active contact to an absolute position.
    pub fn drag_to(&self, x: f32, y: f32) {
        if let Some((id, _)) = self.active.get() {
            self.active.set(Some((id, Point::new(x, y))));
            self.recognizer
                .touch_move(self.element, &[self.sample(id, x, y)]);
        }
    }

    /// Linear drag from the current position in `steps` evenly spaced
    /// move samples over `duration_ms`.
    pub fn drag_linear(&self, to_x: f32, to_y: f32, duration_ms: f64, steps: u32) {
        let Some((_, from)) = self.active.get() else { return };
        let steps = steps.max(1);
        for step in 1..=steps {
            self.advance(duration_ms / f64::from(steps));
            let t = step as f32 / steps as f32;
            self.drag_to(from.x + (to_x - from.x) * t, from.y + (to_y - from.y) * t);
        }
    }

    /// Lift the active contact at its current position.
    pub fn release(&self) {
        if let Some((id, position)) = self.active.take() {
            self.recognizer
                .touch_end(self.element, &[self.sample(id, position.x, position.y)]);
        }
    }

    /// Cancel everything on the element (as the host does when e.g. a
    /// system gesture steals the contacts).
    pub fn cancel(&self) {
        self.active.set(None);
        self.recognizer.touch_cancel(self.element);
    }

    /// Press-release within the tap window.
    pub fn tap(&self, x: f32, y: f32) {
        self.press(x, y);
        self.advance(50.0);
        self.release();
    }

    /// Press, wait out `duration_ms`, release without moving.
    pub fn hold(&self, x: f32, y: f32, duration_ms: f64) {
        self.press(x, y);
        self.advance(duration_ms);
        self.release();
    }

    /// Press and drag quickly, then release: a swipe at roughly
    /// `distance / duration` px/ms.
    pub fn swipe(&self, from: (f32, f32), to: (f32, f32), duration_ms: f64, steps: u32) {
        self.press(from.0, from.1);
        self.drag_linear(to.0, to.1, duration_ms, steps);
        self.release();
    }
}

/// What a [`CallbackRecorder`] saw, in firing order.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureRecord {
    Tap(GestureEvent),
    Hold(GestureEvent),
    Swipe(GestureEvent),
    TouchStart(TouchPoint),
    TouchMove(TouchPoint),
    TouchEnd(TouchPoint),
    GestureStart(GestureState),
    GestureEnd(GestureState),
}

/// Records every callback invocation for assertions.
#[derive(Clone, Default)]
pub struct CallbackRecorder {
    records: Rc<RefCell<Vec<GestureRecord>>>,
}

impl CallbackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A full set of callbacks, each appending to this recorder.
    pub fn callbacks(&self) -> GestureCallbacks {
        let push = |records: &Rc<RefCell<Vec<GestureRecord>>>, record: GestureRecord| {
            records.borrow_mut().push(record);
        };
        let r = self.records.clone();
        let callbacks = GestureCallbacks::new()
            .on_tap(move |event| push(&r, GestureRecord::Tap(event.clone())));
        let r = self.records.clone();
        let callbacks = callbacks.on_hold(move |event| push(&r, GestureRecord::Hold(event.clone())));
        let r = self.records.clone();
        let callbacks =
            callbacks.on_swipe(move |event| push(&r, GestureRecord::Swipe(event.clone())));
        let r = self.records.clone();
        let callbacks =
            callbacks.on_touch_start(move |point, _| push(&r, GestureRecord::TouchStart(*point)));
        let r = self.records.clone();
        let callbacks =
            callbacks.on_touch_move(move |point, _| push(&r, GestureRecord::TouchMove(*point)));
        let r = self.records.clone();
        let callbacks =
            callbacks.on_touch_end(move |point, _| push(&r, GestureRecord::TouchEnd(*point)));
        let r = self.records.clone();
        let callbacks = callbacks
            .on_gesture_start(move |state| push(&r, GestureRecord::GestureStart(state.clone())));
        let r = self.records.clone();
        callbacks.on_gesture_end(move |state| push(&r, GestureRecord::GestureEnd(state.clone())))
    }

    pub fn records(&self) -> Vec<GestureRecord> {
        self.records.borrow().clone()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    pub fn taps(&self) -> usize {
        self.count(|record| matches!(record, GestureRecord::Tap(_)))
    }

    pub fn holds(&self) -> usize {
        self.count(|record| matches!(record, GestureRecord::Hold(_)))
    }

    pub fn swipes(&self) -> usize {
        self.count(|record| matches!(record, GestureRecord::Swipe(_)))
    }

    pub fn move_deliveries(&self) -> usize {
        self.count(|record| matches!(record, GestureRecord::TouchMove(_)))
    }

    pub fn last_swipe(&self) -> Option<GestureEvent> {
        self.records.borrow().iter().rev().find_map(|record| match record {
            GestureRecord::Swipe(event) => Some(event.clone()),
            _ => None,
        })
    }

    pub fn last_gesture_end(&self) -> Option<GestureState> {
        self.records.borrow().iter().rev().find_map(|record| match record {
            GestureRecord::GestureEnd(state) => Some(state.clone()),
            _ => None,
        })
    }

    fn count(&self, predicate: impl Fn(&GestureRecord) -> bool) -> usize {
        self.records.borrow().iter().filter(|record| predicate(record)).count()
    }
}
