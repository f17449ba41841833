use egui::{Align2, Color32, Pos2, Rect, Sense, Ui, Vec2};

use crate::game::Feedback;
use crate::theory::keyboard::keyboard_layout;
use crate::theory::Note;

const KEY_HEIGHT: f32 = 120.0;
const MAX_WHITE_WIDTH: f32 = 48.0;
const BLACK_WIDTH_RATIO: f32 = 0.6;
const BLACK_HEIGHT_RATIO: f32 = 0.62;

/// On-screen piano spanning the active clef range. Returns the tapped note;
/// the caller decides what a tap means. Highlighting is derived entirely
/// from the feedback arguments.
pub struct KeyboardView {
    min: Note,
    max: Note,
    target: Option<Note>,
    guessed: Option<Note>,
    feedback: Feedback,
}

impl KeyboardView {
    pub fn new(min: Note, max: Note) -> Self {
        KeyboardView {
            min,
            max,
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

    /// Draw the keyboard and report which key (if any) was pressed.
    pub fn show(self, ui: &mut Ui) -> Option<Note> {
        let layout = keyboard_layout(self.min, self.max);
        if layout.white.is_empty() {
            return None;
        }

        let white_count = layout.white.len() as f32;
        let white_width = (ui.available_width() / white_count).min(MAX_WHITE_WIDTH);
        let desired = Vec2::new(white_width * white_count, KEY_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(desired, Sense::click());
        if !ui.is_rect_visible(rect) {
            return None;
        }

        let white_rect = |slot: usize| {
            Rect::from_min_size(
                Pos2::new(rect.left() + slot as f32 * white_width, rect.top()),
                Vec2::new(white_width, KEY_HEIGHT),
            )
        };
        let black_rect = |slot: f32| {
            let width = white_width * BLACK_WIDTH_RATIO;
            let center_x = rect.left() + (slot + 0.5) * white_width;
            Rect::from_min_size(
                Pos2::new(center_x - width / 2.0, rect.top()),
                Vec2::new(width, KEY_HEIGHT * BLACK_HEIGHT_RATIO),
            )
        };

        let painter = ui.painter();
        for key in &layout.white {
            let r = white_rect(key.slot).shrink2(Vec2::new(0.5, 0.0));
            painter.rect_filled(r, 3.0, self.white_fill(key.note));
            painter.text(
                Pos2::new(r.center().x, r.bottom() - 10.0),
                Align2::CENTER_CENTER,
                key.note.to_string(),
                egui::FontId::proportional(11.0),
                Color32::from_gray(90),
            );
        }
        for key in &layout.black {
            let r = black_rect(key.slot);
            painter.rect_filled(r, 2.0, self.black_fill(key.note));
        }

        // Black keys overlay the whites, so hit-test them first.
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                for key in &layout.black {
                    if black_rect(key.slot).contains(pos) {
                        return Some(key.note);
                    }
                }
                for key in &layout.white {
                    if white_rect(key.slot).contains(pos) {
                        return Some(key.note);
                    }
                }
            }
        }
        None
    }

    fn white_fill(&self, note: Note) -> Color32 {
        match self.highlight(note) {
            Some(color) => color,
            None => Color32::from_gray(245),
        }
    }

    fn black_fill(&self, note: Note) -> Color32 {
        match self.highlight(note) {
            Some(color) => color,
            None => Color32::from_gray(25),
        }
    }

    /// Correct feedback lights the target green; wrong feedback lights the
    /// guessed key red. Nothing is highlighted while awaiting a guess.
    fn highlight(&self, note: Note) -> Option<Color32> {
        match self.feedback {
            Feedback::Correct if self.target == Some(note) => {
                Some(Color32::from_rgb(70, 190, 110))
            }
            Feedback::Wrong if self.guessed == Some(note) => {
                Some(Color32::from_rgb(210, 80, 80))
            }
            _ => None,
        }
    }
}
