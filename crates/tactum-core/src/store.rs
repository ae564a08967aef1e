//! Cached capability snapshot with invalidate-on-event semantics.
//!
//! [`CapabilityStore`] owns the single shared snapshot for a page
//! session: consumers read the cache, viewport events clear and recompute
//! it, and subscribed listeners are notified synchronously after every
//! recompute. The store is explicitly constructed and passed by reference
//! so tests can build a fresh one per case; there is no module-level
//! singleton.
//!
//! Everything here runs on the single UI thread. Writes only happen
//! synchronously inside event handlers, so a plain `RefCell` upholds the
//! single-writer invariant.

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::capabilities::{CapabilitySnapshot, PerformanceLevel};
use crate::detector::capture_snapshot;
use crate::probe::SignalProbe;

/// Host events that invalidate the cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Resized,
    OrientationChanged,
}

type Listener = Rc<dyn Fn(&CapabilitySnapshot)>;

/// Shared, cached capability snapshot with listener fan-out.
pub struct CapabilityStore {
    probe: Rc<dyn SignalProbe>,
    cached: RefCell<Option<Rc<CapabilitySnapshot>>>,
    // IndexMap keeps notification in subscription order.
    listeners: RefCell<IndexMap<u64, Listener>>,
    next_listener_id: Cell<u64>,
}

impl CapabilityStore {
    pub fn new(probe: Rc<dyn SignalProbe>) -> Rc<Self> {
        Rc::new(Self {
            probe,
            cached: RefCell::new(None),
            listeners: RefCell::new(IndexMap::new()),
            next_listener_id: Cell::new(1),
        })
    }

    /// The current snapshot, computing it on first access.
    ///
    /// Repeated calls without an intervening invalidation return the same
    /// `Rc`, so consumers can compare snapshots by pointer to skip work.
    pub fn get(&self) -> Rc<CapabilitySnapshot> {
        if let Some(snapshot) = self.cached.borrow().as_ref() {
            return Rc::clone(snapshot);
        }
        let snapshot = Rc::new(capture_snapshot(self.probe.as_ref()));
        *self.cached.borrow_mut() = Some(Rc::clone(&snapshot));
        snapshot
    }

    /// Force a recompute, replace the cache, and notify listeners.
    pub fn refresh(&self) -> Rc<CapabilitySnapshot> {
        let snapshot = Rc::new(capture_snapshot(self.probe.as_ref()));
        *self.cached.borrow_mut() = Some(Rc::clone(&snapshot));
        self.notify(&snapshot);
        snapshot
    }

    /// Invalidate and recompute in response to a host viewport event.
    ///
    /// Fires on every event tick; only the settled snapshot matters to
    /// consumers in practice, and the probes are cheap synchronous reads.
    pub fn handle_viewport_event(&self, event: ViewportEvent) {
        log::debug!("viewport event {event:?}, recomputing capabilities");
        self.refresh();
    }

    /// Subscribe to snapshot changes.
    ///
    /// The listener runs synchronously after each recompute with the new
    /// snapshot. Dropping the returned [`Subscription`] (or calling
    /// [`Subscription::cancel`]) unsubscribes; both are idempotent.
    pub fn subscribe(
        self: &Rc<Self>,
        listener: impl Fn(&CapabilitySnapshot) + 'static,
    ) -> Subscription {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(listener));
        Subscription {
            store: Rc::downgrade(self),
            id: Cell::new(Some(id)),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Convenience read: is touch the primary interaction method?
    pub fn is_primary_touch(&self) -> bool {
        self.get().is_primary_touch()
    }

    /// Convenience read: current performance tier.
    pub fn performance_level(&self) -> PerformanceLevel {
        self.get().performance_level()
    }

    /// Convenience read: can the primary pointer hover?
    pub fn supports_hover(&self) -> bool {
        self.get().supports_hover
    }

    /// Convenience read: does the user prefer reduced motion?
    pub fn prefers_reduced_motion(&self) -> bool {
        self.get().prefers_reduced_motion
    }

    fn unsubscribe(&self, id: u64) {
        self.listeners.borrow_mut().shift_remove(&id);
    }

    fn notify(&self, snapshot: &CapabilitySnapshot) {
        // Snapshot the listener list first: a listener may subscribe or
        // unsubscribe reentrantly while we iterate.
        let listeners: SmallVec<[Listener; 4]> =
            self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            let result = catch_unwind(AssertUnwindSafe(|| listener(snapshot)));
            if result.is_err() {
                log::error!("capability listener panicked; other listeners still run");
            }
        }
    }
}

/// RAII handle for a store subscription.
///
/// Unsubscribes when dropped. Holds only a weak reference to the store,
/// so a subscription outliving the store is harmless.
pub struct Subscription {
    store: Weak<CapabilityStore>,
    id: Cell<Option<u64>>,
}

impl Subscription {
    /// Explicitly unsubscribe. Safe to call after the store is gone.
    pub fn cancel(&self) {
        if let Some(id) = self.id.take() {
            if let Some(store) = self.store.upgrade() {
                store.unsubscribe(id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{MediaFeature, ProbeError};

    /// Probe whose viewport can be changed between refreshes.
    struct MutableProbe {
        viewport: Cell<(u32, u32)>,
    }

    impl MutableProbe {
        fn new(width: u32, height: u32) -> Rc<Self> {
            Rc::new(Self {
                viewport: Cell::new((width, height)),
            })
        }
    }

    impl SignalProbe for MutableProbe {
        fn viewport_size(&self) -> Result<(u32, u32), ProbeError> {
            Ok(self.viewport.get())
        }

        fn screen_size(&self) -> Result<(u32, u32), ProbeError> {
            Ok(self.viewport.get())
        }

        fn avail_screen_size(&self) -> Result<(u32, u32), ProbeError> {
            Ok(self.viewport.get())
        }

        fn pixel_ratio(&self) -> Result<f64, ProbeError> {
            Ok(1.0)
        }

        fn media_matches(&self, _feature: MediaFeature) -> Result<bool, ProbeError> {
            Ok(false)
        }

        fn has_touch_handler(&self) -> Result<bool, ProbeError> {
            Ok(true)
        }

        fn max_touch_points(&self) -> Result<u32, ProbeError> {
            Ok(5)
        }

        fn legacy_document_touch(&self) -> Result<bool, ProbeError> {
            Ok(false)
        }

        fn has_mouse_enter_handler(&self) -> Result<bool, ProbeError> {
            Ok(false)
        }

        fn has_keyboard_handler(&self) -> Result<bool, ProbeError> {
            Ok(false)
        }

        fn device_memory_gb(&self) -> Result<f64, ProbeError> {
            Err(ProbeError::Unsupported)
        }

        fn hardware_concurrency(&self) -> Result<u32, ProbeError> {
            Ok(4)
        }

        fn supports_pointer_events(&self) -> Result<bool, ProbeError> {
            Ok(true)
        }
    }

    #[test]
    fn cache_is_stable_between_events() {
        let store = CapabilityStore::new(MutableProbe::new(375, 667));
        let first = store.get();
        let second = store.get();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn viewport_event_replaces_cache() {
        let probe = MutableProbe::new(375, 667);
        let store = CapabilityStore::new(probe.clone() as Rc<dyn SignalProbe>);
        let before = store.get();
        assert!(before.is_mobile());

        probe.viewport.set((800, 1200));
        store.handle_viewport_event(ViewportEvent::Resized);

        let after = store.get();
        assert!(!Rc::ptr_eq(&before, &after));
        assert!(after.is_tablet());
    }

    #[test]
    fn listeners_receive_new_snapshot_synchronously() {
        let store = CapabilityStore::new(MutableProbe::new(375, 667));
        let seen = Rc::new(Cell::new(0u32));
        let seen_in_listener = seen.clone();
        let _sub = store.subscribe(move |snapshot| {
            assert!(snapshot.has_touch);
            seen_in_listener.set(seen_in_listener.get() + 1);
        });

        store.handle_viewport_event(ViewportEvent::OrientationChanged);
        assert_eq!(seen.get(), 1);
        store.handle_viewport_event(ViewportEvent::Resized);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let store = CapabilityStore::new(MutableProbe::new(375, 667));
        let seen = Rc::new(Cell::new(0u32));
        {
            let seen = seen.clone();
            let sub = store.subscribe(move |_| seen.set(seen.get() + 1));
            store.refresh();
            drop(sub);
        }
        store.refresh();
        assert_eq!(seen.get(), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let store = CapabilityStore::new(MutableProbe::new(375, 667));
        let sub = store.subscribe(|_| {});
        sub.cancel();
        sub.cancel();
        drop(sub);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let store = CapabilityStore::new(MutableProbe::new(375, 667));
        let _bad = store.subscribe(|_| panic!("listener bug"));
        let seen = Rc::new(Cell::new(0u32));
        let _good = {
            let seen = seen.clone();
            store.subscribe(move |_| seen.set(seen.get() + 1))
        };

        store.refresh();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = CapabilityStore::new(MutableProbe::new(375, 667));
        let sub = store.subscribe(|_| {});
        drop(store);
        sub.cancel();
    }
}
