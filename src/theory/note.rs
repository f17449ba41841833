use std::fmt;

/// Sentinel pitch value for unparseable note text. Far below any playable
/// note so range checks exclude it without special-casing.
pub const INVALID_PITCH: f32 = -1000.0;

/// The seven diatonic letter names, C-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position within the octave, 0..=6.
    pub fn diatonic_index(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Chromatic semitone offset of the natural within the octave.
    pub fn semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Letters whose sharp is a black key (E and B have none).
    pub fn has_sharp_key(self) -> bool {
        !matches!(self, Letter::E | Letter::B)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }

    fn from_char(c: char) -> Option<Letter> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

/// A note name: letter, optional sharp, octave. Canonical text form is
/// e.g. "F#4".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub letter: Letter,
    pub sharp: bool,
    pub octave: u8,
}

impl Note {
    pub const fn natural(letter: Letter, octave: u8) -> Note {
        Note {
            letter,
            sharp: false,
            octave,
        }
    }

    pub const fn sharp(letter: Letter, octave: u8) -> Note {
        Note {
            letter,
            sharp: true,
            octave,
        }
    }

    /// Parse canonical note text. Returns None on anything malformed; bad
    /// strings degrade to sentinels rather than faulting since all note
    /// text is generated internally from fixed tables.
    pub fn parse(text: &str) -> Option<Note> {
        let mut chars = text.chars();
        let letter = Letter::from_char(chars.next()?)?;
        let rest = chars.as_str();
        let (sharp, digits) = match rest.strip_prefix('#') {
            Some(d) => (true, d),
            None => (false, rest),
        };
        if digits.is_empty() {
            return None;
        }
        let octave = digits.parse::<u8>().ok()?;
        Some(Note {
            letter,
            sharp,
            octave,
        })
    }

    /// Ordering value: strictly increasing with octave and letter, sharps
    /// sorted between their natural and the next letter. This space is for
    /// range membership and sorting only -- diatonic spacing is not
    /// chromatic, so never derive frequency from it.
    pub fn pitch_value(self) -> f32 {
        self.octave as f32 * 12.0
            + self.letter.diatonic_index() as f32
            + if self.sharp { 0.5 } else { 0.0 }
    }

    /// Absolute diatonic step, 7 per octave. Sharps land on the same staff
    /// line or space as their natural.
    pub fn diatonic_step(self) -> i32 {
        self.octave as i32 * 7 + self.letter.diatonic_index() as i32
    }

    /// MIDI key number (C4 = 60).
    pub fn midi_number(self) -> u8 {
        (self.octave + 1) * 12 + self.letter.semitone() + self.sharp as u8
    }

    /// Map a MIDI key back to a note name, spelling black keys as sharps.
    /// Keys below C0 (MIDI 12) are out of the notation range.
    pub fn from_midi(key: u8) -> Option<Note> {
        if key < 12 {
            return None;
        }
        let octave = key / 12 - 1;
        let (letter, sharp) = match key % 12 {
            0 => (Letter::C, false),
            1 => (Letter::C, true),
            2 => (Letter::D, false),
            3 => (Letter::D, true),
            4 => (Letter::E, false),
            5 => (Letter::F, false),
            6 => (Letter::F, true),
            7 => (Letter::G, false),
            8 => (Letter::G, true),
            9 => (Letter::A, false),
            10 => (Letter::A, true),
            _ => (Letter::B, false),
        };
        Some(Note {
            letter,
            sharp,
            octave,
        })
    }

    /// Equal-tempered frequency, A4 = 440 Hz.
    pub fn frequency(self) -> f32 {
        440.0 * 2.0f32.powf((self.midi_number() as f32 - 69.0) / 12.0)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.letter.as_str(),
            if self.sharp { "#" } else { "" },
            self.octave
        )
    }
}

/// Pitch value of note text, or the invalid sentinel when it does not parse.
pub fn pitch_value_of(text: &str) -> f32 {
    Note::parse(text).map(Note::pitch_value).unwrap_or(INVALID_PITCH)
}

/// All natural notes whose pitch value lies in [min, max], ascending.
/// Empty only when the range itself is degenerate.
pub fn enumerate_range(min: Note, max: Note) -> Vec<Note> {
    let lo = min.pitch_value();
    let hi = max.pitch_value();
    let mut notes = Vec::new();
    for octave in min.octave..=max.octave.saturating_add(1) {
        for letter in Letter::ALL {
            let note = Note::natural(letter, octave);
            let value = note.pitch_value();
            if value >= lo && value <= hi {
                notes.push(note);
            }
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for text in ["C4", "F#4", "A5", "E2", "G#3", "B0"] {
            let note = Note::parse(text).unwrap();
            assert_eq!(note.to_string(), text);
            assert_eq!(Note::parse(&note.to_string()), Some(note));
        }
    }

    #[test]
    fn parse_rejects_malformed() {
        for text in ["", "H4", "C", "C#", "c4", "C-1", "C4x", "#4", "4"] {
            assert_eq!(Note::parse(text), None, "accepted {:?}", text);
        }
    }

    #[test]
    fn pitch_value_of_bad_text_is_out_of_every_range() {
        assert_eq!(pitch_value_of("not a note"), INVALID_PITCH);
        assert!(pitch_value_of("nope") < pitch_value_of("C0"));
    }

    #[test]
    fn sharps_sort_between_naturals() {
        let c4 = pitch_value_of("C4");
        let cs4 = pitch_value_of("C#4");
        let d4 = pitch_value_of("D4");
        assert!(c4 < cs4 && cs4 < d4);
        assert!(pitch_value_of("B4") < pitch_value_of("C5"));
    }

    #[test]
    fn enumerate_treble_range() {
        let notes = enumerate_range(
            Note::parse("C4").unwrap(),
            Note::parse("A5").unwrap(),
        );
        let names: Vec<String> = notes.iter().map(Note::to_string).collect();
        assert_eq!(
            names,
            [
                "C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5", "D5", "E5",
                "F5", "G5", "A5"
            ]
        );
    }

    #[test]
    fn enumerate_is_strictly_ascending() {
        let notes = enumerate_range(
            Note::parse("E2").unwrap(),
            Note::parse("E4").unwrap(),
        );
        for pair in notes.windows(2) {
            assert!(pair[0].pitch_value() < pair[1].pitch_value());
        }
    }

    #[test]
    fn enumerate_degenerate_range_is_empty() {
        let notes = enumerate_range(
            Note::parse("A5").unwrap(),
            Note::parse("C4").unwrap(),
        );
        assert!(notes.is_empty());
    }

    #[test]
    fn midi_round_trip_over_piano_range() {
        for key in 21..=108u8 {
            let note = Note::from_midi(key).unwrap();
            assert_eq!(note.midi_number(), key);
        }
        assert_eq!(Note::parse("C4").unwrap().midi_number(), 60);
        assert_eq!(Note::from_midi(11), None);
    }

    #[test]
    fn frequency_reference_points() {
        let a4 = Note::parse("A4").unwrap().frequency();
        assert!((a4 - 440.0).abs() < 0.001);
        let c4 = Note::parse("C4").unwrap().frequency();
        assert!((c4 - 261.63).abs() < 0.01);
    }
}
