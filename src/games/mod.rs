//! The four mini-games as explicit state machines.
//!
//! Every machine consumes [`GameInput`] events and elapsed time, and reports a
//! [`Step`]: the phase it is in afterwards plus a score when a session finished.
//! None of them know about storage or rendering.

pub mod pattern_recall;
pub mod sequence_reasoning;
pub mod symbol_match;
pub mod word_unscramble;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::GameId;
use crate::prng::Prng;

pub use pattern_recall::{PatternRecall, PatternRecallView};
pub use sequence_reasoning::{SequenceReasoning, SequenceReasoningView};
pub use symbol_match::{SymbolMatch, SymbolMatchView};
pub use word_unscramble::{WordUnscramble, WordUnscrambleView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Presenting,
    Collecting,
    Running,
    Expired,
    Answering,
}

/// Result of feeding one event to a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    pub score: Option<u32>,
}

impl Step {
    pub fn quiet(phase: Phase) -> Self {
        Self { phase, score: None }
    }

    pub fn emit(phase: Phase, score: u32) -> Self {
        Self {
            phase,
            score: Some(score),
        }
    }
}

/// Player input, already decoded from clicks/keys by the presentation layer.
/// Machines ignore inputs that do not apply to them or to their current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameInput {
    /// Start / next round / restart.
    Start,
    Cell { index: usize },
    Type { text: String },
    Submit,
    Choose { value: i32 },
    Answer { is_match: bool },
    /// Out-of-band close request; handled by the session controller.
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum GameView {
    MemoryMatrix(PatternRecallView),
    WordFlex(WordUnscrambleView),
    LogicRush(SequenceReasoningView),
    SpeedMatch(SymbolMatchView),
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug)]
pub enum ActiveGame {
    PatternRecall(PatternRecall),
    WordUnscramble(WordUnscramble),
    SequenceReasoning(SequenceReasoning),
    SymbolMatch(SymbolMatch),
}

impl ActiveGame {
    /// A fresh machine with all transient state at its initial values.
    pub fn new(game: GameId, rng: Prng) -> Self {
        match game {
            GameId::MemoryMatrix => ActiveGame::PatternRecall(PatternRecall::new(rng)),
            GameId::WordFlex => ActiveGame::WordUnscramble(WordUnscramble::new(rng)),
            GameId::LogicRush => ActiveGame::SequenceReasoning(SequenceReasoning::new()),
            GameId::SpeedMatch => ActiveGame::SymbolMatch(SymbolMatch::new(rng)),
        }
    }

    pub fn id(&self) -> GameId {
        match self {
            ActiveGame::PatternRecall(_) => GameId::MemoryMatrix,
            ActiveGame::WordUnscramble(_) => GameId::WordFlex,
            ActiveGame::SequenceReasoning(_) => GameId::LogicRush,
            ActiveGame::SymbolMatch(_) => GameId::SpeedMatch,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            ActiveGame::PatternRecall(g) => g.phase(),
            ActiveGame::WordUnscramble(g) => g.phase(),
            ActiveGame::SequenceReasoning(g) => g.phase(),
            ActiveGame::SymbolMatch(g) => g.phase(),
        }
    }

    pub fn handle_input(&mut self, input: &GameInput) -> Step {
        match self {
            ActiveGame::PatternRecall(g) => g.handle_input(input),
            ActiveGame::WordUnscramble(g) => g.handle_input(input),
            ActiveGame::SequenceReasoning(g) => g.handle_input(input),
            ActiveGame::SymbolMatch(g) => g.handle_input(input),
        }
    }

    pub fn tick(&mut self, dt: Duration) -> Step {
        match self {
            ActiveGame::PatternRecall(g) => g.tick(dt),
            ActiveGame::WordUnscramble(g) => g.tick(dt),
            ActiveGame::SequenceReasoning(g) => g.tick(dt),
            ActiveGame::SymbolMatch(g) => g.tick(dt),
        }
    }

    /// Cancel any outstanding timer. Called before a session is discarded.
    pub fn stop(&mut self) {
        match self {
            ActiveGame::PatternRecall(g) => g.stop(),
            ActiveGame::WordUnscramble(g) => g.stop(),
            ActiveGame::SequenceReasoning(_) => {}
            ActiveGame::SymbolMatch(g) => g.stop(),
        }
    }

    pub fn view(&self) -> GameView {
        match self {
            ActiveGame::PatternRecall(g) => GameView::MemoryMatrix(g.view()),
            ActiveGame::WordUnscramble(g) => GameView::WordFlex(g.view()),
            ActiveGame::SequenceReasoning(g) => GameView::LogicRush(g.view()),
            ActiveGame::SymbolMatch(g) => GameView::SpeedMatch(g.view()),
        }
    }
}
