use std::time::{Duration, Instant};

use rand::Rng;

use crate::theory::note::enumerate_range;
use crate::theory::{ClefKind, Note};

/// How long the green flash stays up after a correct guess.
pub const CORRECT_FEEDBACK: Duration = Duration::from_millis(1000);
/// How long the red flash stays up after a wrong guess.
pub const WRONG_FEEDBACK: Duration = Duration::from_millis(1200);

/// Bounded retries when re-rolling to avoid repeating the previous target.
/// After this many collisions the repeat is accepted rather than looping.
const REROLL_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    None,
    Correct,
    Wrong,
}

/// What a guess did, so the caller can trigger the matching sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Wrong,
    /// Dropped by the guard: session idle or feedback still showing.
    Ignored,
}

/// One practice run: the target note, scoring counters, and the timed
/// feedback transition. All mutation happens on the UI thread; `tick` is
/// the only place feedback gets cleared, so at most one deadline is ever
/// pending.
pub struct GameSession {
    clef: ClefKind,
    pool: Vec<Note>,
    running: bool,
    target: Option<Note>,
    guessed: Option<Note>,
    score: u32,
    total: u32,
    streak: u32,
    feedback: Feedback,
    feedback_until: Option<Instant>,
}

impl GameSession {
    pub fn new(clef: ClefKind) -> Self {
        let config = clef.config();
        GameSession {
            clef,
            pool: enumerate_range(config.min, config.max),
            running: false,
            target: None,
            guessed: None,
            score: 0,
            total: 0,
            streak: 0,
            feedback: Feedback::None,
            feedback_until: None,
        }
    }

    pub fn clef(&self) -> ClefKind {
        self.clef
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn target(&self) -> Option<Note> {
        self.target
    }

    pub fn guessed(&self) -> Option<Note> {
        self.guessed
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Begin a fresh run: counters zeroed, first target drawn from the
    /// active clef's pool.
    pub fn start(&mut self, rng: &mut impl Rng) {
        self.running = true;
        self.score = 0;
        self.total = 0;
        self.streak = 0;
        self.guessed = None;
        self.feedback = Feedback::None;
        self.feedback_until = None;
        self.pick_target(rng);
    }

    /// Return to idle. Clears the pending deadline so a timer firing for a
    /// just-finished attempt cannot touch the next run.
    pub fn stop(&mut self) {
        self.running = false;
        self.target = None;
        self.guessed = None;
        self.feedback = Feedback::None;
        self.feedback_until = None;
    }

    /// Switching clef swaps the note pool and forces the session idle.
    pub fn set_clef(&mut self, clef: ClefKind) {
        self.clef = clef;
        let config = clef.config();
        self.pool = enumerate_range(config.min, config.max);
        self.stop();
    }

    /// Score a tapped note against the current target. Input arriving while
    /// idle or during the feedback window is ignored outright, which is
    /// what prevents double-scoring before the timer fires.
    pub fn guess(&mut self, note: Note, now: Instant) -> GuessOutcome {
        if !self.running || self.feedback != Feedback::None {
            return GuessOutcome::Ignored;
        }
        let Some(target) = self.target else {
            return GuessOutcome::Ignored;
        };
        self.total += 1;
        if note == target {
            self.score += 1;
            self.streak += 1;
            self.feedback = Feedback::Correct;
            self.feedback_until = Some(now + CORRECT_FEEDBACK);
            GuessOutcome::Correct
        } else {
            self.streak = 0;
            self.guessed = Some(note);
            self.feedback = Feedback::Wrong;
            self.feedback_until = Some(now + WRONG_FEEDBACK);
            GuessOutcome::Wrong
        }
    }

    /// Advance the feedback timer. Called once per frame; does nothing
    /// until the deadline passes. After correct feedback a new target is
    /// drawn; after wrong feedback the target stays for another try.
    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng) {
        if !self.running || self.feedback == Feedback::None {
            return;
        }
        let Some(deadline) = self.feedback_until else {
            return;
        };
        if now < deadline {
            return;
        }
        let was_correct = self.feedback == Feedback::Correct;
        self.feedback = Feedback::None;
        self.feedback_until = None;
        self.guessed = None;
        if was_correct {
            self.pick_target(rng);
        }
    }

    /// Uniform draw from the pool, re-rolling a bounded number of times to
    /// dodge an immediate repeat. A repeat is accepted after the cap; this
    /// is a best-effort heuristic, not a guarantee.
    fn pick_target(&mut self, rng: &mut impl Rng) {
        if self.pool.is_empty() {
            // Misconfigured range: leave the session waiting rather than
            // sampling from nothing.
            self.target = None;
            return;
        }
        let mut candidate = self.pool[rng.random_range(0..self.pool.len())];
        if self.pool.len() > 1 {
            for _ in 0..REROLL_LIMIT {
                if Some(candidate) != self.target {
                    break;
                }
                candidate = self.pool[rng.random_range(0..self.pool.len())];
            }
        }
        self.target = Some(candidate);
    }
}
