//! Systems advancing dispatch each frame.
//!
//! Submodules overview
//! - [`dispatch`] – run the dispatch pass and move callback output from the
//!   bridge channel into the ECS message queue
pub mod dispatch;
