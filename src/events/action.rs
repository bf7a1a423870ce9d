//! Action edge messages and emitter helpers.
//!
//! [`ActionMessage`] is the ECS-side record of one dispatcher callback
//! firing: which logical action, which edge, and the sampled scalar value
//! (zero for releases). [`value_emitter`] and [`release_emitter`] build the
//! closures that dispatcher registrations need to publish these messages over
//! the [`ActionBridge`](crate::resources::dispatch::ActionBridge) channel.

use bevy_ecs::message::Message;
use crossbeam_channel::Sender;

use crate::dispatcher::EventKind;

/// One edge transition observed by the dispatcher for a logical action.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct ActionMessage {
    /// Logical action name, as chosen at registration time.
    pub action: String,
    /// Which edge fired.
    pub kind: EventKind,
    /// Sampled value at the time of the edge; `0.0` for releases.
    pub value: f32,
}

impl ActionMessage {
    /// Build a message for one edge of `action`.
    pub fn new(action: impl Into<String>, kind: EventKind, value: f32) -> Self {
        Self {
            action: action.into(),
            kind,
            value,
        }
    }
}

/// Build a pressed/hold callback that publishes an [`ActionMessage`].
///
/// Send errors are ignored; they only occur once the receiving side of the
/// bridge has been torn down.
pub fn value_emitter(
    tx: Sender<ActionMessage>,
    action: impl Into<String>,
    kind: EventKind,
) -> impl FnMut(f32) {
    let action = action.into();
    move |value| {
        let _ = tx.send(ActionMessage::new(action.clone(), kind, value));
    }
}

/// Build a released callback that publishes an [`ActionMessage`].
pub fn release_emitter(tx: Sender<ActionMessage>, action: impl Into<String>) -> impl FnMut() {
    let action = action.into();
    move || {
        let _ = tx.send(ActionMessage::new(action.clone(), EventKind::Released, 0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_emitters_publish_on_the_channel() {
        let (tx, rx) = unbounded();

        let mut pressed = value_emitter(tx.clone(), "jump", EventKind::Pressed);
        let mut released = release_emitter(tx, "jump");
        pressed(1.0);
        released();

        let messages: Vec<ActionMessage> = rx.try_iter().collect();
        assert_eq!(
            messages,
            vec![
                ActionMessage::new("jump", EventKind::Pressed, 1.0),
                ActionMessage::new("jump", EventKind::Released, 0.0),
            ]
        );
    }
}
