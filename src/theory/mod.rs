pub mod clef;
pub mod keyboard;
pub mod note;
pub mod staff;

pub use clef::{ClefConfig, ClefKind};
pub use note::{Letter, Note};
