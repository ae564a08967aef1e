//! Binding-layer behavior: invalidation plumbing, derived queries, and
//! registration replacement semantics.

use std::cell::Cell;
use std::rc::Rc;

use tactum_core::probe::MediaFeature;
use tactum_core::{CapabilityStore, PerformanceLevel, SignalProbe, ViewportEvent};
use tactum_gesture::{ElementGeometry, GestureCallbacks, GestureConfig, GestureRecognizer, Point, Size};
use tactum_reactive::{CapabilityBinding, ElementKey, GestureBinding};
use tactum_testing::{ManualTimers, ScriptedSignals};

fn geometry(origin_x: f32) -> ElementGeometry {
    ElementGeometry {
        origin: Point::new(origin_x, 0.0),
        size: Size::new(120.0, 48.0),
    }
}

#[test]
fn binding_invalidates_on_every_store_update() {
    let store = CapabilityStore::new(ScriptedSignals::phone() as Rc<dyn SignalProbe>);
    let renders = Rc::new(Cell::new(0u32));
    let binding = {
        let renders = renders.clone();
        CapabilityBinding::bind(store.clone(), move || renders.set(renders.get() + 1))
    };

    store.handle_viewport_event(ViewportEvent::Resized);
    store.handle_viewport_event(ViewportEvent::OrientationChanged);
    assert_eq!(renders.get(), 2);

    drop(binding);
    store.handle_viewport_event(ViewportEvent::Resized);
    assert_eq!(renders.get(), 2);
}

#[test]
fn derived_queries_follow_the_latest_snapshot() {
    let signals = ScriptedSignals::phone();
    let store = CapabilityStore::new(signals.clone() as Rc<dyn SignalProbe>);
    let binding = CapabilityBinding::bind(store.clone(), || {});

    assert!(binding.is_mobile());
    assert!(binding.is_primary_touch());
    assert!(!binding.is_desktop());

    // Grow the viewport into desktop range and refresh: the binding
    // reads derive from the new snapshot with no extra plumbing.
    signals.set_viewport(1920, 1080);
    signals.set_media(MediaFeature::FinePointer, true);
    store.handle_viewport_event(ViewportEvent::Resized);

    assert!(binding.is_desktop());
    assert!(!binding.is_mobile());
}

#[test]
fn reduced_motion_and_low_tier_both_reduce_animations() {
    let reduced = ScriptedSignals::desktop();
    reduced.set_media(MediaFeature::ReducedMotion, true);
    reduced.set_device_memory(Some(16.0));
    reduced.set_hardware_concurrency(Some(8));
    let store = CapabilityStore::new(reduced as Rc<dyn SignalProbe>);
    let binding = CapabilityBinding::bind(store, || {});
    assert_eq!(binding.performance_level(), PerformanceLevel::High);
    assert!(binding.should_reduce_animations());

    let weak = ScriptedSignals::phone();
    weak.set_device_memory(Some(2.0));
    weak.set_hardware_concurrency(Some(2));
    let store = CapabilityStore::new(weak as Rc<dyn SignalProbe>);
    let binding = CapabilityBinding::bind(store, || {});
    assert_eq!(binding.performance_level(), PerformanceLevel::Low);
    assert!(binding.should_reduce_animations());

    let fast = ScriptedSignals::desktop();
    fast.set_device_memory(Some(16.0));
    fast.set_hardware_concurrency(Some(8));
    let store = CapabilityStore::new(fast as Rc<dyn SignalProbe>);
    let binding = CapabilityBinding::bind(store, || {});
    assert!(!binding.should_reduce_animations());
}

#[test]
fn changed_target_replaces_the_registration() {
    let recognizer = GestureRecognizer::new(GestureConfig::unthrottled(), ManualTimers::new());
    let binding = GestureBinding::new(recognizer.clone());

    let first = binding.attach(ElementKey::new(1), geometry(0.0), GestureCallbacks::new());
    assert!(recognizer.is_registered(first));

    let second = binding.attach(ElementKey::new(2), geometry(50.0), GestureCallbacks::new());
    assert_ne!(first, second);
    assert!(!recognizer.is_registered(first));
    assert!(recognizer.is_registered(second));
}

#[test]
fn same_target_keeps_the_registration() {
    let recognizer = GestureRecognizer::new(GestureConfig::unthrottled(), ManualTimers::new());
    let binding = GestureBinding::new(recognizer.clone());

    let first = binding.attach(ElementKey::new(7), geometry(0.0), GestureCallbacks::new());
    let again = binding.attach(ElementKey::new(7), geometry(30.0), GestureCallbacks::new());
    assert_eq!(first, again);
    assert!(recognizer.is_registered(first));
}

#[test]
fn detach_and_drop_both_unregister() {
    let recognizer = GestureRecognizer::new(GestureConfig::unthrottled(), ManualTimers::new());

    let binding = GestureBinding::new(recognizer.clone());
    let id = binding.attach(ElementKey::new(1), geometry(0.0), GestureCallbacks::new());
    binding.detach();
    assert!(!recognizer.is_registered(id));
    binding.detach(); // idempotent
    assert_eq!(binding.element_id(), None);

    let binding = GestureBinding::new(recognizer.clone());
    let id = binding.attach(ElementKey::new(2), geometry(0.0), GestureCallbacks::new());
    drop(binding);
    assert!(!recognizer.is_registered(id));
}
