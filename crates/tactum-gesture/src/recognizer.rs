//! Per-element gesture recognition.
//!
//! One [`GestureRecognizer`] owns an arena of element registrations.
//! Each registration independently tracks its active contacts as
//! [`TouchSession`]s and collapses them into a single externally visible
//! [`GestureState`]. Classification happens in two places: provisionally
//! during (throttled) moves, and finally at touch-end, where exactly one
//! of tap / hold / swipe fires per ended contact.
//!
//! Callbacks are always invoked with no internal borrows held, so a
//! callback may re-enter the recognizer (including unregistering its own
//! element) without panicking.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use smallvec::SmallVec;
use tactum_core::platform::TimerDriver;

use crate::config::{GestureConfig, MOVEMENT_SLOP_PX};
use crate::session::TouchSession;
use crate::throttle::{MoveThrottle, SampleBatch, ThrottleDecision};
use crate::types::{
    ElementGeometry, GestureCallbacks, GestureEvent, GestureKind, GestureState, StartDisposition,
    TouchPoint,
};

/// Opaque handle for one element registration.
///
/// Returned by [`GestureRecognizer::register`] and held by the caller;
/// the recognizer never stamps anything onto host nodes. [`Self::raw`]
/// exists so host adapters can memoize the handle on their side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from a memoized raw value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndClass {
    Tap,
    Hold,
    Swipe,
}

struct ElementState {
    geometry: ElementGeometry,
    callbacks: GestureCallbacks,
    touches: HashMap<crate::types::TouchId, TouchSession>,
    gesture: GestureState,
    throttle: MoveThrottle,
    last_tap_time_ms: Option<f64>,
}

/// Gesture state machine arena.
///
/// Single-threaded by design; all entry points are called from the
/// host's event dispatch and complete synchronously apart from trailing
/// throttle timers, which go through the injected [`TimerDriver`].
pub struct GestureRecognizer {
    config: GestureConfig,
    timers: Rc<dyn TimerDriver>,
    elements: RefCell<HashMap<u64, ElementState>>,
    next_element_id: Cell<u64>,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig, timers: Rc<dyn TimerDriver>) -> Rc<Self> {
        Rc::new(Self {
            config,
            timers,
            elements: RefCell::new(HashMap::new()),
            next_element_id: Cell::new(1),
        })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Register an element for gesture recognition.
    ///
    /// Undersized targets are allowed but flagged: small touch targets
    /// are an accessibility problem, not a correctness one.
    pub fn register(&self, geometry: ElementGeometry, callbacks: GestureCallbacks) -> ElementId {
        let floor = self.config.min_touch_target_px;
        if geometry.size.width < floor || geometry.size.height < floor {
            log::warn!(
                "touch target {}x{} is below the {floor}px accessibility floor",
                geometry.size.width,
                geometry.size.height,
            );
        }

        let id = self.next_element_id.get();
        self.next_element_id.set(id + 1);
        self.elements.borrow_mut().insert(
            id,
            ElementState {
                geometry,
                callbacks,
                touches: HashMap::new(),
                gesture: GestureState::idle(),
                throttle: MoveThrottle::new(self.config.throttle_ms),
                last_tap_time_ms: None,
            },
        );
        ElementId(id)
    }

    /// Refresh an element's position/extent, keeping element-relative
    /// coordinates honest when the host element moves. Unknown handles
    /// are ignored.
    pub fn update_geometry(&self, id: ElementId, geometry: ElementGeometry) {
        if let Some(state) = self.elements.borrow_mut().get_mut(&id.0) {
            state.geometry = geometry;
        }
    }

    /// Tear down a registration. Idempotent.
    ///
    /// Any pending trailing-move timer is cancelled, so no callback can
    /// fire on the dead registration afterwards.
    pub fn unregister(&self, id: ElementId) {
        let removed = self.elements.borrow_mut().remove(&id.0);
        if let Some(mut state) = removed {
            if let Some(token) = state.throttle.clear() {
                self.timers.cancel(token);
            }
        }
    }

    pub fn is_registered(&self, id: ElementId) -> bool {
        self.elements.borrow().contains_key(&id.0)
    }

    /// Number of contacts currently tracked for the element.
    pub fn active_touch_count(&self, id: ElementId) -> usize {
        self.elements
            .borrow()
            .get(&id.0)
            .map_or(0, |state| state.touches.len())
    }

    /// Copy of the element's aggregate gesture state.
    pub fn gesture_state(&self, id: ElementId) -> Option<GestureState> {
        self.elements.borrow().get(&id.0).map(|state| state.gesture.clone())
    }

    /// Feed touch-start samples for an element.
    ///
    /// Returns whether the host should suppress its default handling:
    /// requested when a gesture was already in progress or the element is
    /// now tracking more than one contact, to keep scroll/zoom from
    /// fighting the gesture.
    pub fn touch_start(&self, id: ElementId, samples: &[TouchPoint]) -> StartDisposition {
        let mut started: SampleBatch = SmallVec::new();
        let mut gesture_started = None;
        let touch_start_cb;
        let state_after;
        let suppress;
        {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&id.0) else {
                return StartDisposition::default();
            };
            let was_active = state.gesture.is_active;

            for sample in samples {
                if state.touches.contains_key(&sample.id) {
                    log::trace!("duplicate touch-start for contact {} ignored", sample.id);
                    continue;
                }
                if state.touches.len() >= self.config.max_concurrent_touches {
                    log::debug!(
                        "tracking contact {} past the soft cap of {}",
                        sample.id,
                        self.config.max_concurrent_touches,
                    );
                }
                state
                    .touches
                    .insert(sample.id, TouchSession::begin(sample, state.geometry.origin));
                started.push(*sample);
            }
            if started.is_empty() {
                return StartDisposition::default();
            }

            if !was_active {
                let first = &started[0];
                state.gesture = GestureState {
                    is_active: true,
                    kind: None,
                    start_time_ms: first.time_ms,
                    start_position: first.position,
                    current_position: first.position,
                    velocity: crate::types::Velocity::ZERO,
                    distance: 0.0,
                    direction: None,
                };
                gesture_started = state
                    .callbacks
                    .on_gesture_start
                    .clone()
                    .map(|cb| (cb, state.gesture.clone()));
            }

            suppress = was_active || state.touches.len() > 1;
            touch_start_cb = state.callbacks.on_touch_start.clone();
            state_after = state.gesture.clone();
        }

        if let Some((cb, gesture)) = gesture_started {
            cb(&gesture);
        }
        if let Some(cb) = touch_start_cb {
            for sample in &started {
                cb(sample, &state_after);
            }
        }
        StartDisposition {
            suppress_default: suppress,
        }
    }

    /// Feed touch-move samples for an element, throttled.
    ///
    /// At most one processed delivery per throttle window; the newest
    /// batch inside a window is delivered on the trailing edge via the
    /// timer driver.
    pub fn touch_move(self: &Rc<Self>, id: ElementId, samples: &[TouchPoint]) {
        let Some(newest) = samples.last() else { return };
        let decision = {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&id.0) else { return };
            if state.touches.is_empty() {
                return;
            }
            state
                .throttle
                .offer(SampleBatch::from_slice(samples), newest.time_ms)
        };

        match decision {
            ThrottleDecision::Deliver => self.process_move(id, samples),
            ThrottleDecision::Schedule { delay_ms } => {
                let weak = Rc::downgrade(self);
                let token = self.timers.schedule(
                    delay_ms,
                    Box::new(move || {
                        if let Some(recognizer) = weak.upgrade() {
                            recognizer.flush_pending_moves(id);
                        }
                    }),
                );
                let mut elements = self.elements.borrow_mut();
                match elements.get_mut(&id.0) {
                    Some(state) => state.throttle.set_timer(token),
                    // Unregistered between borrows; drop the timer again.
                    None => self.timers.cancel(token),
                }
            }
            ThrottleDecision::Absorbed => {}
        }
    }

    /// Feed touch-end samples. Final classification happens here.
    pub fn touch_end(&self, id: ElementId, samples: &[TouchPoint]) {
        for sample in samples {
            self.end_one(id, sample);
        }
    }

    /// Abort all contacts for the element without classifying anything.
    /// Only the gesture-end callback fires.
    pub fn touch_cancel(&self, id: ElementId) {
        let timer;
        let mut gesture_end = None;
        {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&id.0) else { return };
            state.touches.clear();
            timer = state.throttle.clear();
            if state.gesture.is_active {
                let mut final_state = state.gesture.clone();
                final_state.is_active = false;
                gesture_end = state
                    .callbacks
                    .on_gesture_end
                    .clone()
                    .map(|cb| (cb, final_state));
                state.gesture = GestureState::idle();
            }
        }
        if let Some(token) = timer {
            self.timers.cancel(token);
        }
        if let Some((cb, final_state)) = gesture_end {
            cb(&final_state);
        }
    }

    fn flush_pending_moves(&self, id: ElementId) {
        let pending = {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&id.0) else { return };
            state.throttle.take_pending()
        };
        if let Some(batch) = pending {
            self.process_move(id, &batch);
        }
    }

    fn process_move(&self, id: ElementId, samples: &[TouchPoint]) {
        let mut moved: SampleBatch = SmallVec::new();
        let move_cb;
        let state_after;
        {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&id.0) else { return };
            for sample in samples {
                match state.touches.get_mut(&sample.id) {
                    Some(session) => {
                        session.advance(sample, state.geometry.origin);
                        moved.push(*sample);
                    }
                    None => log::trace!("move for untracked contact {} ignored", sample.id),
                }
            }
            if moved.is_empty() {
                return;
            }
            Self::update_aggregate(state, &self.config);
            move_cb = state.callbacks.on_touch_move.clone();
            state_after = state.gesture.clone();
        }
        if let Some(cb) = move_cb {
            for sample in &moved {
                cb(sample, &state_after);
            }
        }
    }

    fn end_one(&self, id: ElementId, sample: &TouchPoint) {
        let touch_end_cb;
        let class_fire;
        let gesture_end;
        let state_after;
        let mut timer = None;
        {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&id.0) else { return };
            let Some(mut session) = state.touches.remove(&sample.id) else {
                log::trace!("touch-end for untracked contact {} ignored", sample.id);
                return;
            };
            session.advance(sample, state.geometry.origin);

            let duration = session.duration_ms();
            let velocity = session.velocity();

            // Final classification: tap unless proven otherwise, a long
            // stationary press is a hold, and fast long travel is a swipe
            // (which wins when both conditions are met).
            let mut class = EndClass::Tap;
            if duration > self.config.hold_threshold_ms && session.distance < MOVEMENT_SLOP_PX {
                class = EndClass::Hold;
            }
            if self.config.enable_swipe_gestures
                && session.distance > self.config.swipe_threshold_px
                && velocity.magnitude() > self.config.swipe_velocity_threshold
            {
                class = EndClass::Swipe;
            }

            let mut fire = true;
            if class == EndClass::Tap {
                if let Some(last) = state.last_tap_time_ms {
                    if sample.time_ms - last < self.config.tap_debounce_ms {
                        log::trace!("tap within debounce window suppressed");
                        fire = false;
                    }
                }
                if fire {
                    state.last_tap_time_ms = Some(sample.time_ms);
                }
            }

            let event = GestureEvent {
                position: session.current_position,
                element_position: session.element_position,
                duration_ms: duration,
                distance: session.distance,
                velocity,
                direction: session.direction,
            };

            state.gesture.current_position = session.current_position;
            state.gesture.velocity = velocity;
            state.gesture.distance = session.distance;
            state.gesture.direction = session.direction;

            let callback = match class {
                EndClass::Tap => state.callbacks.on_tap.clone(),
                EndClass::Hold => state.callbacks.on_hold.clone(),
                EndClass::Swipe => state.callbacks.on_swipe.clone(),
            };
            class_fire = if fire { callback.map(|cb| (cb, event)) } else { None };

            if state.touches.is_empty() {
                let mut final_state = state.gesture.clone();
                final_state.is_active = false;
                final_state.kind = match class {
                    EndClass::Tap => None,
                    EndClass::Hold => Some(GestureKind::Hold),
                    EndClass::Swipe => Some(GestureKind::Swipe),
                };
                gesture_end = state
                    .callbacks
                    .on_gesture_end
                    .clone()
                    .map(|cb| (cb, final_state));
                state.gesture = GestureState::idle();
                timer = state.throttle.clear();
            } else {
                gesture_end = None;
            }

            touch_end_cb = state.callbacks.on_touch_end.clone();
            state_after = state.gesture.clone();
        }

        if let Some(token) = timer {
            self.timers.cancel(token);
        }
        if let Some(cb) = touch_end_cb {
            cb(sample, &state_after);
        }
        if let Some((cb, event)) = class_fire {
            cb(&event);
        }
        if let Some((cb, final_state)) = gesture_end {
            cb(&final_state);
        }
    }

    /// Refresh the aggregate gesture from the primary (earliest-started)
    /// live session and reclassify the provisional kind.
    fn update_aggregate(state: &mut ElementState, config: &GestureConfig) {
        let Some(primary) = state
            .touches
            .values()
            .min_by(|a, b| a.start_time_ms.total_cmp(&b.start_time_ms))
        else {
            return;
        };

        state.gesture.current_position = primary.current_position;
        state.gesture.velocity = primary.velocity();
        state.gesture.distance = primary.distance;
        state.gesture.direction = primary.direction;

        let elapsed = primary.current_time_ms - state.gesture.start_time_ms;
        state.gesture.kind = if primary.distance > config.swipe_threshold_px {
            Some(GestureKind::Swipe)
        } else if elapsed > config.hold_threshold_ms && primary.distance < MOVEMENT_SLOP_PX {
            Some(GestureKind::Hold)
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, Size};
    use tactum_core::platform::{TimerDriver, TimerToken};

    /// Driver that records scheduling without ever firing; the real
    /// throttle/timer interplay is covered by the integration suite.
    #[derive(Default)]
    struct InertTimers {
        scheduled: Cell<u32>,
        cancelled: Cell<u32>,
    }

    impl TimerDriver for InertTimers {
        fn schedule(&self, _delay_ms: f64, _callback: Box<dyn FnOnce()>) -> TimerToken {
            self.scheduled.set(self.scheduled.get() + 1);
            TimerToken::new(u64::from(self.scheduled.get()))
        }

        fn cancel(&self, _token: TimerToken) {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }

    fn geometry() -> ElementGeometry {
        ElementGeometry {
            origin: Point::new(0.0, 0.0),
            size: Size::new(100.0, 100.0),
        }
    }

    fn sample(id: u64, x: f32, y: f32, time_ms: f64) -> TouchPoint {
        TouchPoint {
            id,
            position: Point::new(x, y),
            page_position: Point::new(x, y),
            time_ms,
        }
    }

    #[test]
    fn events_for_unknown_element_are_ignored() {
        let recognizer = GestureRecognizer::new(GestureConfig::unthrottled(), Rc::new(InertTimers::default()));
        let ghost = ElementId::from_raw(99);
        let disposition = recognizer.touch_start(ghost, &[sample(1, 0.0, 0.0, 0.0)]);
        assert!(!disposition.suppress_default);
        recognizer.touch_move(ghost, &[sample(1, 5.0, 0.0, 10.0)]);
        recognizer.touch_end(ghost, &[sample(1, 5.0, 0.0, 20.0)]);
        recognizer.touch_cancel(ghost);
    }

    #[test]
    fn second_contact_requests_default_suppression() {
        let recognizer = GestureRecognizer::new(GestureConfig::unthrottled(), Rc::new(InertTimers::default()));
        let element = recognizer.register(geometry(), GestureCallbacks::new());

        let first = recognizer.touch_start(element, &[sample(1, 10.0, 10.0, 0.0)]);
        assert!(!first.suppress_default);

        let second = recognizer.touch_start(element, &[sample(2, 20.0, 20.0, 5.0)]);
        assert!(second.suppress_default);
        assert_eq!(recognizer.active_touch_count(element), 2);
    }

    #[test]
    fn unregister_cancels_pending_trailing_timer() {
        let timers = Rc::new(InertTimers::default());
        let recognizer = GestureRecognizer::new(GestureConfig::default(), timers.clone());
        let element = recognizer.register(geometry(), GestureCallbacks::new());

        recognizer.touch_start(element, &[sample(1, 0.0, 0.0, 0.0)]);
        // Two moves inside one 16ms window: second becomes pending.
        recognizer.touch_move(element, &[sample(1, 5.0, 0.0, 4.0)]);
        recognizer.touch_move(element, &[sample(1, 10.0, 0.0, 8.0)]);
        assert_eq!(timers.scheduled.get(), 1);

        recognizer.unregister(element);
        assert_eq!(timers.cancelled.get(), 1);
        assert!(!recognizer.is_registered(element));
    }

    #[test]
    fn callback_may_unregister_its_own_element() {
        let timers = Rc::new(InertTimers::default());
        let recognizer = GestureRecognizer::new(GestureConfig::unthrottled(), timers);
        let slot: Rc<RefCell<Option<(Rc<GestureRecognizer>, ElementId)>>> =
            Rc::new(RefCell::new(None));

        let callbacks = {
            let slot = slot.clone();
            GestureCallbacks::new().on_tap(move |_| {
                if let Some((recognizer, element)) = slot.borrow_mut().take() {
                    recognizer.unregister(element);
                }
            })
        };
        let element = recognizer.register(geometry(), callbacks);
        *slot.borrow_mut() = Some((recognizer.clone(), element));

        recognizer.touch_start(element, &[sample(1, 10.0, 10.0, 0.0)]);
        recognizer.touch_end(element, &[sample(1, 10.0, 10.0, 50.0)]);
        assert!(!recognizer.is_registered(element));
    }
}
