//! Activity testing for polled input values.
//!
//! A dispatcher decides whether a sampled value counts as "held" through the
//! [`ActivityTest`] trait. Each value kind provides its own notion of
//! non-zero, so the check is exhaustive at compile time instead of switching
//! on runtime types:
//! - scalars (`f32`/`f64`) – magnitude above [`ACTIVITY_EPSILON`]
//! - vectors ([`glam::Vec2`]/[`glam::Vec3`]) – squared magnitude above the
//!   same epsilon
//! - rotations ([`glam::Quat`]) – not the identity rotation
//! - `bool` – the value itself
//!
//! The epsilon absorbs analog-stick noise near the rest position. Hosts with
//! other comparable value kinds implement the trait as "not equal to the
//! zero/default value".

use glam::{Quat, Vec2, Vec3};

/// Threshold below which a sampled value is considered at rest.
///
/// Scalars compare their absolute value against it; vectors compare their
/// squared magnitude.
pub const ACTIVITY_EPSILON: f32 = 0.01;

/// Decides whether a polled value counts as actively held.
pub trait ActivityTest {
    /// `true` when the value is far enough from rest to count as input.
    fn is_active(&self) -> bool;
}

impl ActivityTest for f32 {
    fn is_active(&self) -> bool {
        self.abs() > ACTIVITY_EPSILON
    }
}

impl ActivityTest for f64 {
    fn is_active(&self) -> bool {
        self.abs() > ACTIVITY_EPSILON as f64
    }
}

impl ActivityTest for bool {
    fn is_active(&self) -> bool {
        *self
    }
}

impl ActivityTest for Vec2 {
    fn is_active(&self) -> bool {
        self.length_squared() > ACTIVITY_EPSILON
    }
}

impl ActivityTest for Vec3 {
    fn is_active(&self) -> bool {
        self.length_squared() > ACTIVITY_EPSILON
    }
}

impl ActivityTest for Quat {
    fn is_active(&self) -> bool {
        *self != Quat::IDENTITY
    }
}
