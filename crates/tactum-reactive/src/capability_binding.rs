//! Capability store binding for declarative UI hosts.

use std::rc::Rc;

use tactum_core::{CapabilitySnapshot, CapabilityStore, PerformanceLevel, Subscription};

/// Couples a UI component to the capability store for its lifetime.
///
/// The binding subscribes on construction and invokes the host-supplied
/// `invalidate` callback whenever the store publishes a new snapshot, so
/// the host can schedule a re-render. Dropping the binding unsubscribes.
///
/// Every read goes through the store's latest snapshot; derived values
/// are never cached on the binding, so a consumer can never observe a
/// stale derivation next to a fresh snapshot.
pub struct CapabilityBinding {
    store: Rc<CapabilityStore>,
    _subscription: Subscription,
}

impl CapabilityBinding {
    pub fn bind(store: Rc<CapabilityStore>, invalidate: impl Fn() + 'static) -> Self {
        let subscription = store.subscribe(move |_| invalidate());
        Self {
            store,
            _subscription: subscription,
        }
    }

    pub fn snapshot(&self) -> Rc<CapabilitySnapshot> {
        self.store.get()
    }

    pub fn is_mobile(&self) -> bool {
        self.store.get().is_mobile()
    }

    pub fn is_tablet(&self) -> bool {
        self.store.get().is_tablet()
    }

    pub fn is_desktop(&self) -> bool {
        self.store.get().is_desktop()
    }

    pub fn is_primary_touch(&self) -> bool {
        self.store.get().is_primary_touch()
    }

    pub fn performance_level(&self) -> PerformanceLevel {
        self.store.get().performance_level()
    }

    /// Whether the UI should scale its animations down: the user asked
    /// for reduced motion, or the device is in the low performance tier.
    pub fn should_reduce_animations(&self) -> bool {
        let snapshot = self.store.get();
        snapshot.prefers_reduced_motion
            || snapshot.performance_level() == PerformanceLevel::Low
    }
}
