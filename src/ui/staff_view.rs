use egui::{Align2, Color32, Pos2, Sense, Stroke, Ui, Vec2};

use crate::game::Feedback;
use crate::theory::staff::{staff_position, StemDirection};
use crate::theory::{ClefKind, Note};

const LINE_SPACING: f32 = 14.0;
const STEP: f32 = LINE_SPACING / 2.0;
const NOTEHEAD_RADIUS: f32 = 6.0;
const STEM_LENGTH: f32 = 3.5 * LINE_SPACING;
const LEDGER_HALF_WIDTH: f32 = 11.0;

/// Draws the five-line staff with the target note (and, during wrong
/// feedback, the guessed note beside it). Purely presentational: everything
/// shown is derived from the arguments.
pub struct StaffView {
    clef: ClefKind,
    target: Option<Note>,
    guessed: Option<Note>,
    feedback: Feedback,
}

impl StaffView {
    pub fn new(clef: ClefKind) -> Self {
        StaffView {
            clef,
            target: None,
            guessed: None,
            feedback: Feedback::None,
        }
    }

    pub fn target(mut self, note: Option<Note>) -> Self {
        self.target = note;
        self
    }

    pub fn guessed(mut self, note: Option<Note>) -> Self {
        self.guessed = note;
        self
    }

    pub fn feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn show(self, ui: &mut Ui) {
        let desired = Vec2::new(ui.available_width(), 180.0);
        let (rect, _response) = ui.allocate_exact_size(desired, Sense::hover());
        if !ui.is_rect_visible(rect) {
            return;
        }
        let painter = ui.painter();

        // Feedback tint behind the whole staff.
        let tint = match self.feedback {
            Feedback::Correct => Some(Color32::from_rgba_unmultiplied(0, 160, 60, 28)),
            Feedback::Wrong => Some(Color32::from_rgba_unmultiplied(200, 40, 40, 28)),
            Feedback::None => None,
        };
        if let Some(color) = tint {
            painter.rect_filled(rect, 6.0, color);
        }

        // Middle staff line sits on the vertical center.
        let top_y = rect.center().y - 2.0 * LINE_SPACING;
        let left = rect.left() + 80.0;
        let right = rect.right() - 40.0;
        let line_stroke = Stroke::new(1.2, Color32::from_gray(190));
        for i in 0..5 {
            let y = top_y + i as f32 * LINE_SPACING;
            painter.line_segment([Pos2::new(left, y), Pos2::new(right, y)], line_stroke);
        }

        // Clef label at the left edge of the staff.
        painter.text(
            Pos2::new(rect.left() + 40.0, rect.center().y),
            Align2::CENTER_CENTER,
            self.clef.name(),
            egui::FontId::proportional(16.0),
            Color32::from_gray(190),
        );

        let note_x = (left + right) * 0.5;
        if let Some(target) = self.target {
            let color = match self.feedback {
                Feedback::Correct => Color32::from_rgb(60, 200, 100),
                _ => Color32::from_gray(230),
            };
            draw_note(painter, target, self.clef, note_x, top_y, color);
        }

        // The wrong guess renders in red next to the target for comparison.
        if self.feedback == Feedback::Wrong {
            if let Some(guessed) = self.guessed {
                let guess_x = note_x + 60.0;
                let red = Color32::from_rgb(220, 70, 70);
                draw_note(painter, guessed, self.clef, guess_x, top_y, red);
                painter.text(
                    Pos2::new(guess_x, rect.bottom() - 12.0),
                    Align2::CENTER_CENTER,
                    guessed.to_string(),
                    egui::FontId::proportional(13.0),
                    red,
                );
            }
        }
    }
}

fn draw_note(
    painter: &egui::Painter,
    note: Note,
    clef: ClefKind,
    x: f32,
    top_y: f32,
    color: Color32,
) {
    let position = staff_position(note, clef);
    let y = top_y + position.steps as f32 * STEP;
    let center = Pos2::new(x, y);

    for step in &position.ledger_steps {
        let ledger_y = top_y + *step as f32 * STEP;
        painter.line_segment(
            [
                Pos2::new(x - LEDGER_HALF_WIDTH, ledger_y),
                Pos2::new(x + LEDGER_HALF_WIDTH, ledger_y),
            ],
            Stroke::new(1.2, Color32::from_gray(190)),
        );
    }

    painter.circle_filled(center, NOTEHEAD_RADIUS, color);

    let stem_stroke = Stroke::new(1.6, color);
    match position.stem {
        StemDirection::Down => {
            let sx = x - NOTEHEAD_RADIUS;
            painter.line_segment(
                [Pos2::new(sx, y), Pos2::new(sx, y + STEM_LENGTH)],
                stem_stroke,
            );
        }
        StemDirection::Up => {
            let sx = x + NOTEHEAD_RADIUS;
            painter.line_segment(
                [Pos2::new(sx, y), Pos2::new(sx, y - STEM_LENGTH)],
                stem_stroke,
            );
        }
    }

    // Sharps get their accidental to the left of the head.
    if note.sharp {
        painter.text(
            Pos2::new(x - NOTEHEAD_RADIUS - 10.0, y),
            Align2::CENTER_CENTER,
            "#",
            egui::FontId::proportional(16.0),
            color,
        );
    }
}
