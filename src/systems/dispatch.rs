//! Dispatch systems.
//!
//! - [`run_action_dispatch`] runs one dispatcher pass over the world's
//!   [`ActionDispatch`] resource. Call it once per frame, after the host
//!   input layer has refreshed source values, so callbacks see this frame's
//!   state rather than a stale one.
//! - [`poll_action_messages`] drains the bridge channel into the ECS
//!   [`Messages<ActionMessage>`] mailbox.
//! - [`update_action_messages`] advances the message queue so newly written
//!   messages become readable by subscribers.

use bevy_ecs::prelude::*;

use crate::events::action::ActionMessage;
use crate::resources::dispatch::{ActionBridge, ActionDispatch};
use crate::source::InputSource;

/// Run one dispatch pass for sources of type `S`.
///
/// Exclusive over the world because the dispatcher is a non-send resource and
/// its callbacks run inline. A world without an [`ActionDispatch<S>`] is left
/// untouched.
pub fn run_action_dispatch<S: InputSource + 'static>(world: &mut World) {
    if let Some(mut dispatch) = world.get_non_send_resource_mut::<ActionDispatch<S>>() {
        dispatch.dispatcher.tick();
    }
}

/// Drain pending callback output into the ECS [`Messages<ActionMessage>`]
/// mailbox.
///
/// Non-blocking; run each frame after [`run_action_dispatch`].
pub fn poll_action_messages(bridge: Res<ActionBridge>, mut writer: MessageWriter<ActionMessage>) {
    writer.write_batch(bridge.rx.try_iter());
}

/// Advance the ECS message queue for [`ActionMessage`].
///
/// Required once per frame so messages written this frame become visible to
/// readers. Run after [`poll_action_messages`] in the schedule.
pub fn update_action_messages(mut messages: ResMut<Messages<ActionMessage>>) {
    messages.update();
}
