//! Manually driven timer driver.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tactum_core::platform::{TimerDriver, TimerToken};

struct Scheduled {
    token: TimerToken,
    due_ms: f64,
    callback: Box<dyn FnOnce()>,
}

/// A [`TimerDriver`] with an explicit clock.
///
/// Nothing fires until the test advances the clock; due callbacks then
/// run in due-time order. Callbacks may schedule further timers, which
/// fire within the same advance if they come due.
#[derive(Default)]
pub struct ManualTimers {
    now_ms: Cell<f64>,
    next_token: Cell<u64>,
    queue: RefCell<Vec<Scheduled>>,
}

impl ManualTimers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Advance the clock to `time_ms`, firing everything due on the way.
    pub fn advance_to(&self, time_ms: f64) {
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due_index = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.due_ms <= time_ms)
                    .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms))
                    .map(|(index, _)| index);
                due_index.map(|index| queue.swap_remove(index))
            };
            match next {
                Some(entry) => {
                    self.now_ms.set(entry.due_ms.max(self.now_ms.get()));
                    (entry.callback)();
                }
                None => break,
            }
        }
        self.now_ms.set(time_ms.max(self.now_ms.get()));
    }

    pub fn advance_by(&self, delta_ms: f64) {
        self.advance_to(self.now_ms.get() + delta_ms);
    }
}

impl TimerDriver for ManualTimers {
    fn schedule(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerToken {
        let raw = self.next_token.get() + 1;
        self.next_token.set(raw);
        let token = TimerToken::new(raw);
        self.queue.borrow_mut().push(Scheduled {
            token,
            due_ms: self.now_ms.get() + delay_ms.max(0.0),
            callback,
        });
        token
    }

    fn cancel(&self, token: TimerToken) {
        self.queue.borrow_mut().retain(|entry| entry.token != token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let timers = ManualTimers::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, delay) in [("late", 30.0), ("early", 10.0), ("mid", 20.0)] {
            let order = order.clone();
            timers.schedule(delay, Box::new(move || order.borrow_mut().push(label)));
        }
        timers.advance_to(100.0);

        assert_eq!(*order.borrow(), vec!["early", "mid", "late"]);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn cancel_prevents_firing() {
        let timers = ManualTimers::new();
        let fired = Rc::new(Cell::new(false));
        let token = {
            let fired = fired.clone();
            timers.schedule(10.0, Box::new(move || fired.set(true)))
        };
        timers.cancel(token);
        timers.advance_to(100.0);
        assert!(!fired.get());
    }

    #[test]
    fn callback_scheduled_during_advance_can_fire_in_same_advance() {
        let timers = ManualTimers::new();
        let fired = Rc::new(Cell::new(false));
        {
            let timers_inner = timers.clone();
            let fired = fired.clone();
            timers.schedule(
                10.0,
                Box::new(move || {
                    let fired = fired.clone();
                    timers_inner.schedule(5.0, Box::new(move || fired.set(true)));
                }),
            );
        }
        timers.advance_to(100.0);
        assert!(fired.get());
    }
}
