use serde::{Deserialize, Serialize};

use super::note::{Letter, Note};

/// Which staff convention is active. Each variant dispatches to a fixed
/// config rather than branching per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClefKind {
    #[default]
    Treble,
    Bass,
}

/// Fixed per-clef parameters: display name, playable range, and the note
/// sitting on the top staff line.
#[derive(Debug, Clone, Copy)]
pub struct ClefConfig {
    pub name: &'static str,
    pub kind: ClefKind,
    pub min: Note,
    pub max: Note,
    pub top_line: Note,
}

const TREBLE: ClefConfig = ClefConfig {
    name: "Treble",
    kind: ClefKind::Treble,
    min: Note::natural(Letter::C, 4),
    max: Note::natural(Letter::A, 5),
    top_line: Note::natural(Letter::F, 5),
};

const BASS: ClefConfig = ClefConfig {
    name: "Bass",
    kind: ClefKind::Bass,
    min: Note::natural(Letter::E, 2),
    max: Note::natural(Letter::E, 4),
    top_line: Note::natural(Letter::A, 3),
};

impl ClefKind {
    pub const ALL: [ClefKind; 2] = [ClefKind::Treble, ClefKind::Bass];

    pub fn config(self) -> &'static ClefConfig {
        match self {
            ClefKind::Treble => &TREBLE,
            ClefKind::Bass => &BASS,
        }
    }

    pub fn name(self) -> &'static str {
        self.config().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clef_ranges_are_fixed() {
        let treble = ClefKind::Treble.config();
        assert_eq!(treble.min.to_string(), "C4");
        assert_eq!(treble.max.to_string(), "A5");
        assert_eq!(treble.top_line.to_string(), "F5");

        let bass = ClefKind::Bass.config();
        assert_eq!(bass.min.to_string(), "E2");
        assert_eq!(bass.max.to_string(), "E4");
        assert_eq!(bass.top_line.to_string(), "A3");
    }

    #[test]
    fn clef_kind_serde_round_trip() {
        for kind in ClefKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: ClefKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
