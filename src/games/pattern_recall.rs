use std::time::Duration;

use serde::Serialize;

use super::{GameInput, Phase, Step};
use crate::prng::Prng;
use crate::timer::TimerSlot;

// ─────────────────────────────────────────────────────────────────────────
// Memory Matrix: a few cells of a 3×3 grid light up, then the player has to
// click the same cells (in any order). Every finished round is scored.
// ─────────────────────────────────────────────────────────────────────────

pub const GRID_SIZE: usize = 3;
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
pub const MAX_PATTERN_LEN: usize = 5;

const PRESENT_BASE_MS: u64 = 1000;
const PRESENT_PER_CELL_MS: u64 = 200;

/// Pattern length grows by one per round, capped at `MAX_PATTERN_LEN`.
pub fn pattern_len(round: u32) -> usize {
    (round as usize).saturating_add(2).min(MAX_PATTERN_LEN)
}

pub fn presenting_duration(len: usize) -> Duration {
    Duration::from_millis(PRESENT_BASE_MS + PRESENT_PER_CELL_MS * len as u64)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternRecallView {
    pub phase: Phase,
    pub round: u32,
    pub grid_size: usize,
    /// Cells to highlight: the pattern while presenting, otherwise the selection.
    pub lit: Vec<usize>,
    pub selected: Vec<usize>,
}

#[derive(Debug)]
pub struct PatternRecall {
    rng: Prng,
    phase: Phase,
    pattern: Vec<usize>,
    selection: Vec<usize>,
    round: u32,
    reveal: TimerSlot,
}

impl PatternRecall {
    pub fn new(rng: Prng) -> Self {
        Self {
            rng,
            phase: Phase::Idle,
            pattern: Vec::with_capacity(MAX_PATTERN_LEN),
            selection: Vec::with_capacity(CELL_COUNT),
            round: 1,
            reveal: TimerSlot::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn pattern(&self) -> &[usize] {
        &self.pattern
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn handle_input(&mut self, input: &GameInput) -> Step {
        match input {
            GameInput::Start => self.start_round(),
            GameInput::Cell { index } => self.select_cell(*index),
            _ => Step::quiet(self.phase),
        }
    }

    /// Draw a fresh pattern for the current round and show it. Allowed from any
    /// phase; a reveal still pending from an earlier start is replaced.
    pub fn start_round(&mut self) -> Step {
        let len = pattern_len(self.round);
        self.pattern.clear();
        while self.pattern.len() < len {
            let cell = self.rng.gen_range_usize(0, CELL_COUNT);
            if !self.pattern.contains(&cell) {
                self.pattern.push(cell);
            }
        }

        self.selection.clear();
        self.phase = Phase::Presenting;
        self.reveal.arm_once(presenting_duration(len));
        Step::quiet(self.phase)
    }

    pub fn select_cell(&mut self, index: usize) -> Step {
        if self.phase != Phase::Collecting
            || index >= CELL_COUNT
            || self.selection.contains(&index)
        {
            return Step::quiet(self.phase);
        }

        self.selection.push(index);
        if self.selection.len() < self.pattern.len() {
            return Step::quiet(self.phase);
        }

        let ok = self.pattern.iter().all(|p| self.selection.contains(p));
        let score = if ok { self.round } else { self.round - 1 };
        if ok {
            self.round += 1;
        }
        self.phase = Phase::Idle;
        Step::emit(self.phase, score)
    }

    pub fn tick(&mut self, dt: Duration) -> Step {
        if self.reveal.advance(dt) > 0 && self.phase == Phase::Presenting {
            self.phase = Phase::Collecting;
        }
        Step::quiet(self.phase)
    }

    pub fn stop(&mut self) {
        self.reveal.cancel();
    }

    pub fn view(&self) -> PatternRecallView {
        let lit = if self.phase == Phase::Presenting {
            self.pattern.clone()
        } else {
            self.selection.clone()
        };
        PatternRecallView {
            phase: self.phase,
            round: self.round,
            grid_size: GRID_SIZE,
            lit,
            selected: self.selection.clone(),
        }
    }
}
