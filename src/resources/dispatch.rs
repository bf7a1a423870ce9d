//! ECS resources that tie a dispatcher into a bevy_ecs world.
//!
//! [`ActionDispatch`] owns the dispatcher as a non-send resource (callbacks
//! are plain boxed closures and stay on the update thread), keyed by
//! [`Entity`] owners so a despawning consumer maps naturally to
//! `unregister_all`. [`ActionBridge`] is the channel pair dispatcher
//! callbacks use to publish [`ActionMessage`]s; the systems in
//! [`crate::systems::dispatch`] drain it into `Messages<ActionMessage>` each
//! frame.
//!
//! Use [`setup_action_bridge`] and [`setup_action_dispatch`] once during
//! world initialization.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::dispatcher::EventDispatcher;
use crate::events::action::ActionMessage;
use crate::source::InputSource;

/// Non-send resource owning the dispatcher for sources of type `S`.
///
/// Owners are entities: spawn one (empty is fine) per consumer and pass its
/// id to [`EventDispatcher::with_source`].
pub struct ActionDispatch<S: InputSource> {
    /// The wrapped dispatcher.
    pub dispatcher: EventDispatcher<S, Entity>,
}

impl<S: InputSource> ActionDispatch<S> {
    /// Create a wrapper around an empty dispatcher.
    pub fn new() -> Self {
        Self {
            dispatcher: EventDispatcher::new(),
        }
    }
}

impl<S: InputSource> Default for ActionDispatch<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel pair between dispatcher callbacks and the ECS message queue.
///
/// Clone [`ActionBridge::tx`] into emitter closures (see
/// [`crate::events::action::value_emitter`]); the
/// [`poll_action_messages`](crate::systems::dispatch::poll_action_messages)
/// system drains [`ActionBridge::rx`] each frame.
#[derive(Resource)]
pub struct ActionBridge {
    /// Sender side, cloned into dispatcher callbacks.
    pub tx: Sender<ActionMessage>,
    /// Receiver side, drained into `Messages<ActionMessage>`.
    pub rx: Receiver<ActionMessage>,
}

/// Create the bridge channels and register the message mailbox.
pub fn setup_action_bridge(world: &mut World) {
    let (tx, rx) = unbounded::<ActionMessage>();
    world.insert_resource(ActionBridge { tx, rx });
    world.insert_resource(Messages::<ActionMessage>::default());
}

/// Insert an empty [`ActionDispatch`] for sources of type `S`.
pub fn setup_action_dispatch<S: InputSource + 'static>(world: &mut World) {
    world.insert_non_send_resource(ActionDispatch::<S>::new());
}
