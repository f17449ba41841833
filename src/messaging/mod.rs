mod bus;

pub use bus::MessageBus;

use crate::theory::Note;

/// Events flowing from input sources (on-screen keyboard, MIDI callback)
/// into the app, processed once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainerMessage {
    /// A key on the on-screen keyboard was tapped.
    KeyPressed(Note),
    /// A MIDI note-on arrived from a connected instrument.
    MidiNoteOn(u8),
    SetVolume(f32),
}
