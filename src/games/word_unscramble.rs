use std::time::Duration;

use serde::Serialize;

use super::{GameInput, Phase, Step};
use crate::prng::Prng;
use crate::timer::{Countdown, TIME_UNIT};

// ─────────────────────────────────────────────────────────────────────────
// Word Flex: unscramble as many words as possible before the clock runs out.
// Shorter words are worth more.
// ─────────────────────────────────────────────────────────────────────────

pub const WORDS: &[&str] = &["NEURON", "MEMORY", "LOGIC", "FOCUS", "BRAIN", "PUZZLE"];
pub const ROUND_UNITS: u32 = 30;

/// Points for solving a word of `len` letters.
pub fn word_points(len: usize) -> u32 {
    7usize.saturating_sub(len).max(1) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordUnscrambleView {
    pub phase: Phase,
    pub scrambled: Option<String>,
    pub input: String,
    pub time_left: u32,
    pub points: u32,
}

#[derive(Debug)]
pub struct WordUnscramble {
    rng: Prng,
    phase: Phase,
    target: String,
    scrambled: String,
    input: String,
    points: u32,
    countdown: Countdown,
}

impl WordUnscramble {
    pub fn new(rng: Prng) -> Self {
        Self {
            rng,
            phase: Phase::Idle,
            target: String::new(),
            scrambled: String::new(),
            input: String::new(),
            points: 0,
            countdown: Countdown::new(TIME_UNIT),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn scrambled(&self) -> &str {
        &self.scrambled
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn time_left(&self) -> u32 {
        if self.phase == Phase::Idle {
            ROUND_UNITS
        } else {
            self.countdown.remaining()
        }
    }

    pub fn handle_input(&mut self, input: &GameInput) -> Step {
        match input {
            GameInput::Start => self.start(),
            GameInput::Type { text } => {
                self.set_input(text);
                Step::quiet(self.phase)
            }
            GameInput::Submit => self.submit(),
            _ => Step::quiet(self.phase),
        }
    }

    /// Start or restart. A run in progress is abandoned without a score.
    pub fn start(&mut self) -> Step {
        self.points = 0;
        self.countdown.start(ROUND_UNITS);
        self.phase = Phase::Running;
        self.next_word();
        Step::quiet(self.phase)
    }

    pub fn set_input(&mut self, text: &str) {
        self.input.clear();
        self.input.push_str(text);
    }

    /// Check the input buffer. Mismatches leave everything but the buffer alone.
    pub fn submit(&mut self) -> Step {
        if self.phase != Phase::Running {
            return Step::quiet(self.phase);
        }
        if self.input.to_uppercase() == self.target {
            self.points += word_points(self.target.chars().count());
            self.next_word();
        }
        Step::quiet(self.phase)
    }

    pub fn tick(&mut self, dt: Duration) -> Step {
        if self.phase == Phase::Running && self.countdown.advance(dt) {
            self.phase = Phase::Expired;
            return Step::emit(self.phase, self.points);
        }
        Step::quiet(self.phase)
    }

    pub fn stop(&mut self) {
        self.countdown.cancel();
    }

    fn next_word(&mut self) {
        let word = self.rng.choose(WORDS).copied().unwrap_or("BRAIN");
        let mut letters: Vec<char> = word.chars().collect();
        self.rng.shuffle(&mut letters);

        self.target = word.to_string();
        self.scrambled = letters.into_iter().collect();
        self.input.clear();
    }

    pub fn view(&self) -> WordUnscrambleView {
        WordUnscrambleView {
            phase: self.phase,
            scrambled: (!self.scrambled.is_empty()).then(|| self.scrambled.clone()),
            input: self.input.clone(),
            time_left: self.time_left(),
            points: self.points,
        }
    }
}
