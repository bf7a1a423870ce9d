//! Message types exchanged with the ECS world.
//!
//! Dispatcher callbacks run inline on the update thread; the types here let
//! them publish what happened into the ECS message queues so downstream
//! systems can react without holding a reference to the dispatcher.
//!
//! Submodules:
//! - [`action`] – edge-transition messages for logical actions and the
//!   emitter helpers that produce them from dispatcher callbacks
pub mod action;
