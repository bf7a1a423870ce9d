//! ECS resources made available to systems.
//!
//! Overview
//! - `dispatch` – the dispatcher wrapper owned by the world and the channel
//!   bridge that carries callback output into the ECS message queues
//!
//! The binding table [`ActionBindings`](crate::bindings::ActionBindings) is
//! also a resource; it lives in [`crate::bindings`] next to its persistence
//! logic.
pub mod dispatch;
