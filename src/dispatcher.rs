//! Edge-triggered dispatch over polled input sources.
//!
//! An [`EventDispatcher`] converts level-triggered values (a source polled
//! once per update cycle) into pressed/hold/released callbacks, multiplexed
//! across independent owners sharing the same source. Held state is tracked
//! per `(source, owner)` pair, so one owner toggling disabled mid-hold cannot
//! suppress another owner's release or cause spurious double-presses.
//!
//! The dispatcher is an explicit, instantiable registry: create one per
//! composition root (or per test) and call [`EventDispatcher::tick`] exactly
//! once per update cycle, after the host input layer has refreshed source
//! values. All callbacks run inline on the calling thread before `tick`
//! returns.
//!
//! Per `(source, owner)` the state machine has two states, idle and active:
//! - idle, owner enabled, value active – fires every `Pressed` registration,
//!   then every `Hold` registration, and becomes active
//! - active, value active – fires every `Hold` registration
//! - active, value at rest – fires every `Released` registration and becomes
//!   idle
//! - active, owner disabled – fires every `Released` registration (synthetic
//!   release) and becomes idle, even while input is physically held
//!
//! A panicking enabled predicate is treated as enabled for that tick
//! (fail-open, logged), so one misbehaving owner cannot halt dispatch for the
//! others. Callback panics are not caught; they propagate to the host loop.

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use log::warn;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::source::InputSource;
use crate::value::ActivityTest;

/// The three callback kinds a registration can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired once on the idle-to-active transition, with the sampled value.
    Pressed,
    /// Fired every tick the value is active, with the sampled value.
    Hold,
    /// Fired once on the active-to-idle transition (real or synthetic).
    Released,
}

enum Handler<V> {
    Pressed(Box<dyn FnMut(V)>),
    Hold(Box<dyn FnMut(V)>),
    Released(Box<dyn FnMut()>),
}

impl<V> Handler<V> {
    fn kind(&self) -> EventKind {
        match self {
            Handler::Pressed(_) => EventKind::Pressed,
            Handler::Hold(_) => EventKind::Hold,
            Handler::Released(_) => EventKind::Released,
        }
    }
}

/// One callback binding for a `(source, owner)` pair.
struct Registration<O, V> {
    owner: O,
    handler: Handler<V>,
}

type EnabledPredicate = Rc<dyn Fn() -> bool>;

/// Per-source runtime record: polled handle, registrations, per-owner gating
/// and held flags, and the last sampled value (diagnostic only).
struct DispatchState<S: InputSource, O> {
    source: S,
    last_value: S::Value,
    registrations: SmallVec<[Registration<O, S::Value>; 4]>,
    enabled: FxHashMap<O, EnabledPredicate>,
    held: FxHashMap<O, bool>,
}

impl<S, O> DispatchState<S, O>
where
    S: InputSource,
    O: Clone + Eq + std::hash::Hash,
{
    fn new(source: S) -> Self {
        let last_value = source.read_value();
        Self {
            source,
            last_value,
            registrations: SmallVec::new(),
            enabled: FxHashMap::default(),
            held: FxHashMap::default(),
        }
    }

    /// Evaluate the owner's enabled predicate, failing open on panic.
    fn owner_enabled(&self, owner: &O) -> bool {
        let Some(pred) = self.enabled.get(owner) else {
            return true;
        };
        let pred = Rc::clone(pred);
        match panic::catch_unwind(AssertUnwindSafe(|| pred())) {
            Ok(enabled) => enabled,
            Err(_) => {
                warn!("enabled predicate panicked; treating owner as enabled this tick");
                true
            }
        }
    }

    fn fire_pressed(&mut self, owner: &O, value: S::Value) {
        for reg in self.registrations.iter_mut() {
            if reg.owner == *owner {
                if let Handler::Pressed(cb) = &mut reg.handler {
                    cb(value);
                }
            }
        }
    }

    fn fire_hold(&mut self, owner: &O, value: S::Value) {
        for reg in self.registrations.iter_mut() {
            if reg.owner == *owner {
                if let Handler::Hold(cb) = &mut reg.handler {
                    cb(value);
                }
            }
        }
    }

    fn fire_released(&mut self, owner: &O) {
        for reg in self.registrations.iter_mut() {
            if reg.owner == *owner {
                if let Handler::Released(cb) = &mut reg.handler {
                    cb();
                }
            }
        }
    }

    /// Run one dispatch pass for this source.
    fn advance(&mut self) {
        let value = self.source.read_value();
        let is_held = value.is_active();

        // Snapshot the distinct owners (in registration order) before firing
        // anything, so held-flag updates during the pass cannot skew
        // iteration.
        let mut owners: Vec<O> = Vec::new();
        for reg in &self.registrations {
            if !owners.contains(&reg.owner) {
                owners.push(reg.owner.clone());
            }
        }

        for owner in owners {
            let enabled = self.owner_enabled(&owner);
            let was_held = self.held.get(&owner).copied().unwrap_or(false);

            if !enabled {
                // An owner that stops being active must still see exactly one
                // release, even if input is physically held.
                if was_held {
                    self.fire_released(&owner);
                    self.held.insert(owner, false);
                }
                continue;
            }

            if is_held && !was_held {
                self.fire_pressed(&owner, value);
                self.held.insert(owner.clone(), true);
            }
            if is_held {
                self.fire_hold(&owner, value);
            } else if was_held {
                self.fire_released(&owner);
                self.held.insert(owner, false);
            }
        }

        self.last_value = value;
    }

    fn remove_owner(&mut self, owner: &O) {
        self.registrations.retain(|reg| reg.owner != *owner);
        self.enabled.remove(owner);
        self.held.remove(owner);
    }
}

/// Registry converting polled source values into edge-triggered callbacks.
///
/// `S` is the source handle type; `O` is any cheap identity token used to
/// group registrations for independent removal. The dispatcher never
/// interprets owners beyond equality and hashing.
///
/// Single-threaded by design: `tick` and the register/unregister operations
/// are expected to run on the host's update thread.
pub struct EventDispatcher<S: InputSource, O> {
    states: FxHashMap<S, DispatchState<S, O>>,
}

impl<S, O> Default for EventDispatcher<S, O>
where
    S: InputSource,
    O: Clone + Eq + std::hash::Hash,
{
    fn default() -> Self {
        Self {
            states: FxHashMap::default(),
        }
    }
}

impl<S, O> EventDispatcher<S, O>
where
    S: InputSource,
    O: Clone + Eq + std::hash::Hash,
{
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or extend) the configuration for `(source, owner)`.
    ///
    /// Activates the source if needed and lazily creates its dispatch state.
    /// The returned [`SourceConfig`] chains callback registrations and an
    /// optional enabled predicate; without one the owner counts as always
    /// enabled.
    pub fn with_source(&mut self, source: &S, owner: O) -> SourceConfig<'_, S, O> {
        if !source.is_enabled() {
            source.enable();
        }
        let state = self
            .states
            .entry(source.clone())
            .or_insert_with(|| DispatchState::new(source.clone()));
        SourceConfig { state, owner }
    }

    /// Remove every registration, the enabled predicate, and the held flag
    /// for `(source, owner)`. A no-op when nothing is registered.
    pub fn unregister_all(&mut self, source: &S, owner: &O) {
        if let Some(state) = self.states.get_mut(source) {
            state.remove_owner(owner);
        }
    }

    /// Remove the registrations of one kind for `(source, owner)`, keeping
    /// the rest of the owner's bookkeeping intact.
    pub fn unregister(&mut self, source: &S, owner: &O, kind: EventKind) {
        if let Some(state) = self.states.get_mut(source) {
            state
                .registrations
                .retain(|reg| !(reg.owner == *owner && reg.handler.kind() == kind));
        }
    }

    /// Drop the whole dispatch state for `source`: all owners, all
    /// registrations. Intended for full teardown, not per-owner cleanup.
    pub fn clear(&mut self, source: &S) {
        self.states.remove(source);
    }

    /// Run one dispatch pass over every source with a live dispatch state.
    ///
    /// Call exactly once per update cycle, after the input layer has
    /// refreshed current-cycle values. Owners of a source are processed in
    /// registration order; across sources there is no ordering guarantee.
    pub fn tick(&mut self) {
        for state in self.states.values_mut() {
            state.advance();
        }
    }

    /// Value sampled by the last tick for `source`, if it has a dispatch
    /// state. Diagnostic only; the algorithm does not consume it.
    pub fn last_value(&self, source: &S) -> Option<S::Value> {
        self.states.get(source).map(|state| state.last_value)
    }

    /// Number of sources with a live dispatch state.
    pub fn source_count(&self) -> usize {
        self.states.len()
    }

    /// Number of registrations currently held for `source`.
    pub fn registration_count(&self, source: &S) -> usize {
        self.states
            .get(source)
            .map_or(0, |state| state.registrations.len())
    }

    /// Whether `(source, owner)` was active after the last tick.
    pub fn is_held(&self, source: &S, owner: &O) -> bool {
        self.states
            .get(source)
            .and_then(|state| state.held.get(owner).copied())
            .unwrap_or(false)
    }
}

/// Fluent registration scope for one `(source, owner)` pair.
///
/// Obtained from [`EventDispatcher::with_source`]; every method chains:
///
/// ```ignore
/// dispatcher
///     .with_source(&jump, owner)
///     .when(move || menu_closed.get())
///     .on_pressed(|v| start_jump(v))
///     .on_released(|| end_jump());
/// ```
pub struct SourceConfig<'a, S: InputSource, O> {
    state: &'a mut DispatchState<S, O>,
    owner: O,
}

impl<'a, S, O> SourceConfig<'a, S, O>
where
    S: InputSource,
    O: Clone + Eq + std::hash::Hash,
{
    /// Install (or replace) the enabled predicate for this owner.
    ///
    /// The predicate is evaluated once per tick; while it returns `false`
    /// the owner receives no pressed/hold callbacks and gets a synthetic
    /// release if it was mid-hold. A panicking predicate counts as enabled
    /// for that tick.
    pub fn when(self, enabled: impl Fn() -> bool + 'static) -> Self {
        self.state
            .enabled
            .insert(self.owner.clone(), Rc::new(enabled));
        self
    }

    /// Register a callback for the idle-to-active transition.
    pub fn on_pressed(self, callback: impl FnMut(S::Value) + 'static) -> Self {
        self.state.registrations.push(Registration {
            owner: self.owner.clone(),
            handler: Handler::Pressed(Box::new(callback)),
        });
        self
    }

    /// Register a callback fired every tick the value is active.
    pub fn on_hold(self, callback: impl FnMut(S::Value) + 'static) -> Self {
        self.state.registrations.push(Registration {
            owner: self.owner.clone(),
            handler: Handler::Hold(Box::new(callback)),
        });
        self
    }

    /// Register a callback for the active-to-idle transition.
    pub fn on_released(self, callback: impl FnMut() + 'static) -> Self {
        self.state.registrations.push(Registration {
            owner: self.owner.clone(),
            handler: Handler::Released(Box::new(callback)),
        });
        self
    }

    /// Discard everything registered for this `(source, owner)` pair.
    pub fn dispose(self) {
        let owner = self.owner;
        self.state.remove_owner(&owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ValueCell;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) + Clone) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let log = Rc::clone(&log);
            move |entry| log.borrow_mut().push(entry)
        };
        (log, sink)
    }

    #[test]
    fn test_pressed_fires_before_hold_on_transition() {
        let source = ValueCell::new(0.0f32);
        let mut dispatcher = EventDispatcher::new();
        let (log, sink) = recorder();

        let press_sink = sink.clone();
        let hold_sink = sink.clone();
        dispatcher
            .with_source(&source, 1u32)
            .on_hold(move |_| hold_sink("hold"))
            .on_pressed(move |_| press_sink("pressed"));

        source.set(1.0);
        dispatcher.tick();

        // Pressed first even though the hold callback registered earlier.
        assert_eq!(*log.borrow(), vec!["pressed", "hold"]);
    }

    #[test]
    fn test_with_source_enables_the_source() {
        let source = ValueCell::new(0.0f32);
        let mut dispatcher: EventDispatcher<_, u32> = EventDispatcher::new();
        assert!(!source.is_enabled());
        dispatcher.with_source(&source, 7);
        assert!(source.is_enabled());
    }

    #[test]
    fn test_dispose_silences_the_owner() {
        let source = ValueCell::new(0.0f32);
        let mut dispatcher = EventDispatcher::new();
        let (log, sink) = recorder();

        dispatcher
            .with_source(&source, "ui")
            .on_pressed(move |_| sink("pressed"))
            .dispose();

        source.set(1.0);
        dispatcher.tick();
        assert!(log.borrow().is_empty());
        // The state itself survives until an explicit clear.
        assert_eq!(dispatcher.source_count(), 1);
        assert_eq!(dispatcher.registration_count(&source), 0);
    }

    #[test]
    fn test_unregister_single_kind_keeps_others() {
        let source = ValueCell::new(0.0f32);
        let mut dispatcher = EventDispatcher::new();
        let (log, sink) = recorder();

        let press_sink = sink.clone();
        let release_sink = sink.clone();
        dispatcher
            .with_source(&source, 1u8)
            .on_pressed(move |_| press_sink("pressed"))
            .on_released(move || release_sink("released"));
        dispatcher.unregister(&source, &1u8, EventKind::Pressed);

        source.set(1.0);
        dispatcher.tick();
        source.set(0.0);
        dispatcher.tick();

        assert_eq!(*log.borrow(), vec!["released"]);
    }

    #[test]
    fn test_clear_drops_all_owners() {
        let source = ValueCell::new(0.0f32);
        let mut dispatcher = EventDispatcher::new();
        let (log, sink) = recorder();

        let a_sink = sink.clone();
        let b_sink = sink.clone();
        dispatcher
            .with_source(&source, "a")
            .on_pressed(move |_| a_sink("a"));
        dispatcher
            .with_source(&source, "b")
            .on_pressed(move |_| b_sink("b"));
        dispatcher.clear(&source);

        source.set(1.0);
        dispatcher.tick();
        assert!(log.borrow().is_empty());
        assert_eq!(dispatcher.source_count(), 0);
    }

    #[test]
    fn test_last_value_tracks_the_sampled_value() {
        let source = ValueCell::new(0.0f32);
        let mut dispatcher = EventDispatcher::new();
        dispatcher.with_source(&source, 1u32).on_hold(|_| {});

        assert_eq!(dispatcher.last_value(&source), Some(0.0));
        source.set(0.75);
        dispatcher.tick();
        assert_eq!(dispatcher.last_value(&source), Some(0.75));
    }

    #[test]
    fn test_when_replaces_the_predicate() {
        let source = ValueCell::new(0.0f32);
        let mut dispatcher = EventDispatcher::new();
        let (log, sink) = recorder();

        dispatcher
            .with_source(&source, 1u32)
            .when(|| false)
            .on_pressed(move |_| sink("pressed"));

        source.set(1.0);
        dispatcher.tick();
        assert!(log.borrow().is_empty());

        // A later with_source for the same owner may swap the gate.
        dispatcher.with_source(&source, 1u32).when(|| true);
        dispatcher.tick();
        assert_eq!(*log.borrow(), vec!["pressed"]);
    }
}
