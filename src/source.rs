//! Polled input sources consumed by the dispatcher.
//!
//! An [`InputSource`] is an opaque, externally-owned handle to a value
//! producer. The dispatcher never creates or destroys the producer; it clones
//! the handle as a lookup key and polls it once per tick. Equality and
//! hashing are identity semantics: two handles are the same source exactly
//! when they refer to the same producer.
//!
//! [`ValueCell`] is the concrete handle used by the demo binary and tests.
//! Hosts that refresh input themselves each frame can also use it directly:
//! write the sampled value with [`ValueCell::set`] before running the
//! dispatch pass.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::value::ActivityTest;

/// Handle to a polled value producer.
///
/// The dispatcher calls [`read_value`](InputSource::read_value) once per tick
/// per source with live registrations, after the host input layer has
/// refreshed its values. [`enable`](InputSource::enable) must be idempotent;
/// the dispatcher invokes it when a source is first registered.
pub trait InputSource: Clone + Eq + Hash {
    /// Value kind produced by this source.
    type Value: ActivityTest + Copy;

    /// Whether the underlying producer has been activated.
    fn is_enabled(&self) -> bool;

    /// Activate the underlying producer. Idempotent.
    fn enable(&self);

    /// Current sampled value.
    fn read_value(&self) -> Self::Value;
}

struct CellState<V> {
    value: V,
    enabled: bool,
}

/// Shared-cell input source with handle identity.
///
/// Cloning yields another handle to the same cell; [`ValueCell::set`] through
/// any handle is visible to all of them. Starts disabled until a dispatcher
/// registration (or an explicit [`enable`](InputSource::enable)) activates it.
pub struct ValueCell<V: Copy> {
    inner: Rc<RefCell<CellState<V>>>,
}

impl<V: Copy> ValueCell<V> {
    /// Create a cell holding `initial`, not yet enabled.
    pub fn new(initial: V) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CellState {
                value: initial,
                enabled: false,
            })),
        }
    }

    /// Overwrite the sampled value.
    pub fn set(&self, value: V) {
        self.inner.borrow_mut().value = value;
    }

    /// Current sampled value.
    pub fn get(&self) -> V {
        self.inner.borrow().value
    }

    /// Deactivate the producer again.
    pub fn disable(&self) {
        self.inner.borrow_mut().enabled = false;
    }
}

impl<V: Copy> Clone for ValueCell<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Copy> PartialEq for ValueCell<V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<V: Copy> Eq for ValueCell<V> {}

impl<V: Copy> Hash for ValueCell<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl<V: Copy + fmt::Debug> fmt::Debug for ValueCell<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.inner.borrow();
        f.debug_struct("ValueCell")
            .field("value", &cell.value)
            .field("enabled", &cell.enabled)
            .finish()
    }
}

impl<V> InputSource for ValueCell<V>
where
    V: ActivityTest + Copy + 'static,
{
    type Value = V;

    fn is_enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    fn enable(&self) {
        self.inner.borrow_mut().enabled = true;
    }

    fn read_value(&self) -> V {
        self.inner.borrow().value
    }
}
