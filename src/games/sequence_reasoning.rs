use std::time::Duration;

use serde::Serialize;

use super::{GameInput, Phase, Step};

// ─────────────────────────────────────────────────────────────────────────
// Logic Rush: pick the number that continues the sequence. The bank repeats
// forever; each full pass through it is reported as one attempt.
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Puzzle {
    pub sequence: &'static [i32],
    pub options: &'static [i32],
    pub answer: i32,
}

pub const BANK: &[Puzzle] = &[
    Puzzle {
        sequence: &[2, 4, 6, 8],
        options: &[10, 12, 9],
        answer: 10,
    },
    Puzzle {
        sequence: &[1, 1, 2, 3, 5],
        options: &[8, 7, 9],
        answer: 8,
    },
    Puzzle {
        sequence: &[3, 6, 12, 24],
        options: &[36, 48, 30],
        answer: 48,
    },
    Puzzle {
        sequence: &[10, 7, 4, 1],
        options: &[-2, 0, 2],
        answer: -2,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceReasoningView {
    pub phase: Phase,
    pub question: usize,
    pub sequence: Vec<i32>,
    pub options: Vec<i32>,
    pub points: u32,
}

/// Points reset after every pass, so each emitted score covers exactly one pass.
#[derive(Debug, Default)]
pub struct SequenceReasoning {
    index: usize,
    points: u32,
}

impl SequenceReasoning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        Phase::Answering
    }

    pub fn current(&self) -> &'static Puzzle {
        &BANK[self.index % BANK.len()]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn handle_input(&mut self, input: &GameInput) -> Step {
        match input {
            GameInput::Choose { value } => self.choose(*value),
            _ => Step::quiet(Phase::Answering),
        }
    }

    /// Values that are not among the current candidates are not a selection.
    pub fn choose(&mut self, value: i32) -> Step {
        let puzzle = self.current();
        if !puzzle.options.contains(&value) {
            return Step::quiet(Phase::Answering);
        }

        if value == puzzle.answer {
            self.points += 1;
        }
        let completes_pass = (self.index + 1) % BANK.len() == 0;
        self.index = (self.index + 1) % BANK.len();

        if completes_pass {
            let score = std::mem::take(&mut self.points);
            return Step::emit(Phase::Answering, score);
        }
        Step::quiet(Phase::Answering)
    }

    /// Untimed; present so every machine can be pumped the same way.
    pub fn tick(&mut self, _dt: Duration) -> Step {
        Step::quiet(Phase::Answering)
    }

    pub fn view(&self) -> SequenceReasoningView {
        let puzzle = self.current();
        SequenceReasoningView {
            phase: Phase::Answering,
            question: self.index,
            sequence: puzzle.sequence.to_vec(),
            options: puzzle.options.to_vec(),
            points: self.points,
        }
    }
}
