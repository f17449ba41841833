use super::clef::ClefKind;
use super::note::Note;

/// Steps (half line-spacings) measured downward from the top staff line.
/// The five lines sit at 0, 2, 4, 6, 8.
pub const TOP_LINE_STEP: i32 = 0;
pub const BOTTOM_LINE_STEP: i32 = 8;
pub const MIDDLE_LINE_STEP: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemDirection {
    /// Stem drawn downward from the left of the notehead.
    Down,
    /// Stem drawn upward from the right of the notehead.
    Up,
}

/// Where a note sits on the staff: vertical step offset, the ledger lines
/// needed to reach it, and which way the stem points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffPosition {
    pub steps: i32,
    pub ledger_steps: Vec<i32>,
    pub stem: StemDirection,
}

/// Map a note to its staff position under the given clef. Higher pitches
/// get smaller (or negative) step offsets, i.e. sit higher on the page.
pub fn staff_position(note: Note, clef: ClefKind) -> StaffPosition {
    let steps = clef.config().top_line.diatonic_step() - note.diatonic_step();
    StaffPosition {
        steps,
        ledger_steps: ledger_steps(steps),
        stem: stem_direction(steps),
    }
}

/// Ledger lines land on even steps: above the staff at -2, -4, ... down to
/// the note, below at 10, 12, ... up to the note. The staff boundary lines
/// themselves are never ledger lines.
fn ledger_steps(steps: i32) -> Vec<i32> {
    let mut lines = Vec::new();
    if steps <= TOP_LINE_STEP - 2 {
        let mut line = TOP_LINE_STEP - 2;
        while line >= steps {
            lines.push(line);
            line -= 2;
        }
    } else if steps >= BOTTOM_LINE_STEP + 2 {
        let mut line = BOTTOM_LINE_STEP + 2;
        while line <= steps {
            lines.push(line);
            line += 2;
        }
    }
    lines
}

/// At or above the middle line the stem hangs down; below it points up.
/// Purely a function of the step offset, not of pitch.
fn stem_direction(steps: i32) -> StemDirection {
    if steps <= MIDDLE_LINE_STEP {
        StemDirection::Down
    } else {
        StemDirection::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(text: &str, clef: ClefKind) -> StaffPosition {
        staff_position(Note::parse(text).unwrap(), clef)
    }

    #[test]
    fn top_line_note_sits_at_zero() {
        let p = pos("F5", ClefKind::Treble);
        assert_eq!(p.steps, 0);
        assert!(p.ledger_steps.is_empty());
    }

    #[test]
    fn middle_c_needs_one_ledger_below_treble() {
        let p = pos("C4", ClefKind::Treble);
        assert_eq!(p.steps, 10);
        assert_eq!(p.ledger_steps, vec![10]);
    }

    #[test]
    fn low_e_needs_one_ledger_below_bass() {
        let p = pos("E2", ClefKind::Bass);
        assert_eq!(p.steps, 10);
        assert_eq!(p.ledger_steps, vec![10]);
    }

    #[test]
    fn notes_above_treble_staff_grow_ledgers() {
        // G5 sits in the space above the top line: no ledger yet.
        assert!(pos("G5", ClefKind::Treble).ledger_steps.is_empty());
        // A5 sits on the first ledger line above.
        assert_eq!(pos("A5", ClefKind::Treble).ledger_steps, vec![-2]);
    }

    #[test]
    fn sharps_share_their_naturals_position() {
        let natural = pos("F4", ClefKind::Treble);
        let sharp = staff_position(Note::parse("F#4").unwrap(), ClefKind::Treble);
        assert_eq!(natural.steps, sharp.steps);
    }

    #[test]
    fn higher_pitch_means_smaller_steps() {
        let notes = crate::theory::note::enumerate_range(
            Note::parse("C4").unwrap(),
            Note::parse("A5").unwrap(),
        );
        for pair in notes.windows(2) {
            let lo = staff_position(pair[0], ClefKind::Treble).steps;
            let hi = staff_position(pair[1], ClefKind::Treble).steps;
            assert!(hi < lo);
        }
    }

    #[test]
    fn stems_flip_at_the_middle_line() {
        // B4 sits on the treble middle line: stem down.
        assert_eq!(pos("B4", ClefKind::Treble).stem, StemDirection::Down);
        assert_eq!(pos("C5", ClefKind::Treble).stem, StemDirection::Down);
        assert_eq!(pos("A4", ClefKind::Treble).stem, StemDirection::Up);
        assert_eq!(pos("C4", ClefKind::Treble).stem, StemDirection::Up);
    }
}
