use crossbeam_channel::{unbounded, Receiver, Sender};

use super::TrainerMessage;

/// Channel pair carrying input events to the app. Senders get cloned into
/// UI widgets and the MIDI callback; the app drains the receiver each frame.
pub struct MessageBus {
    sender: Sender<TrainerMessage>,
    receiver: Receiver<TrainerMessage>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        MessageBus { sender, receiver }
    }

    /// Get a sender that can be cloned and handed to input sources.
    pub fn sender(&self) -> Sender<TrainerMessage> {
        self.sender.clone()
    }

    pub fn send(&self, msg: TrainerMessage) {
        // Only fails when the receiver is gone, which means we're shutting
        // down anyway.
        self.sender.send(msg).ok();
    }

    pub fn try_receive(&self) -> Result<TrainerMessage, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::{Letter, Note};

    #[test]
    fn messages_arrive_in_order() {
        let bus = MessageBus::new();
        let sender = bus.sender();
        sender
            .send(TrainerMessage::KeyPressed(Note::natural(Letter::C, 4)))
            .unwrap();
        sender.send(TrainerMessage::MidiNoteOn(60)).unwrap();

        assert_eq!(
            bus.try_receive().unwrap(),
            TrainerMessage::KeyPressed(Note::natural(Letter::C, 4))
        );
        assert_eq!(bus.try_receive().unwrap(), TrainerMessage::MidiNoteOn(60));
        assert!(bus.try_receive().is_err());
    }
}
