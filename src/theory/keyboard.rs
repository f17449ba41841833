use super::note::{enumerate_range, Note};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteKey {
    pub note: Note,
    pub slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackKey {
    pub note: Note,
    /// Horizontal slot straddling two white keys (white slot + 0.5).
    pub slot: f32,
}

/// On-screen keyboard covering a note range. Display width scales with the
/// white key count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyboardLayout {
    pub white: Vec<WhiteKey>,
    pub black: Vec<BlackKey>,
}

/// Enumerate the keys covering [min, max]. A black key is only emitted when
/// its sharp pitch itself falls inside the range, even if the natural under
/// it is in range.
pub fn keyboard_layout(min: Note, max: Note) -> KeyboardLayout {
    let lo = min.pitch_value();
    let hi = max.pitch_value();
    let mut layout = KeyboardLayout::default();
    for (slot, natural) in enumerate_range(min, max).into_iter().enumerate() {
        layout.white.push(WhiteKey {
            note: natural,
            slot,
        });
        if natural.letter.has_sharp_key() {
            let sharp = Note::sharp(natural.letter, natural.octave);
            let value = sharp.pitch_value();
            if value >= lo && value <= hi {
                layout.black.push(BlackKey {
                    note: sharp,
                    slot: slot as f32 + 0.5,
                });
            }
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(min: &str, max: &str) -> KeyboardLayout {
        keyboard_layout(Note::parse(min).unwrap(), Note::parse(max).unwrap())
    }

    #[test]
    fn bass_range_has_fifteen_white_keys() {
        let kb = layout("E2", "E4");
        assert_eq!(kb.white.len(), 15);
        assert_eq!(kb.white[0].note.to_string(), "E2");
        assert_eq!(kb.white[14].note.to_string(), "E4");
        for (i, key) in kb.white.iter().enumerate() {
            assert_eq!(key.slot, i);
        }
    }

    #[test]
    fn black_keys_stay_inside_the_range() {
        let kb = layout("E2", "E4");
        let max = Note::parse("E4").unwrap().pitch_value();
        for key in &kb.black {
            assert!(key.note.sharp);
            assert!(key.note.pitch_value() <= max);
        }
        // D#4 sorts just under E4 so it is still in range; F#4 is not.
        assert!(kb.black.iter().any(|k| k.note.to_string() == "D#4"));
        assert!(!kb.black.iter().any(|k| k.note.to_string() == "F#4"));
    }

    #[test]
    fn black_slots_straddle_their_whites() {
        let kb = layout("C4", "A5");
        for black in &kb.black {
            let white = kb
                .white
                .iter()
                .find(|w| {
                    w.note.letter == black.note.letter
                        && w.note.octave == black.note.octave
                })
                .unwrap();
            assert_eq!(black.slot, white.slot as f32 + 0.5);
        }
    }

    #[test]
    fn no_black_key_for_e_or_b() {
        let kb = layout("C4", "A5");
        for key in &kb.black {
            assert!(key.note.letter.has_sharp_key());
        }
    }

    #[test]
    fn sharp_outside_range_is_dropped_even_with_natural_inside() {
        // A5 is the top white key; A#5 exceeds the range.
        let kb = layout("C4", "A5");
        assert!(kb.white.iter().any(|k| k.note.to_string() == "A5"));
        assert!(!kb.black.iter().any(|k| k.note.to_string() == "A#5"));
    }
}
