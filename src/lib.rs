//! inputedge library.
//!
//! Edge-triggered input dispatch for polled sources: converts continuously
//! sampled values into pressed/hold/released callbacks, independently per
//! owner, with per-owner enable gating and synthetic release-on-disable.
//!
//! - [`value`] – activity testing per value kind (scalar, vector, rotation, bool)
//! - [`source`] – the polled source handle trait and a shared-cell source
//! - [`dispatcher`] – the per-(source, owner) edge-detection state machine
//! - [`bindings`] – action-name-to-control-path table with JSON override persistence
//! - [`events`] – ECS messages for action edges and emitter helpers
//! - [`resources`] – world-owned dispatcher wrapper and the channel bridge
//! - [`systems`] – per-frame dispatch and message pumping

pub mod bindings;
pub mod dispatcher;
pub mod events;
pub mod resources;
pub mod source;
pub mod systems;
pub mod value;
