use std::time::Duration;

use serde::Serialize;

use super::{GameInput, Phase, Step};
use crate::prng::Prng;
use crate::timer::{Countdown, TIME_UNIT};

// ─────────────────────────────────────────────────────────────────────────
// Speed Match: decide as fast as possible whether two symbols are the same.
// ─────────────────────────────────────────────────────────────────────────

pub const SYMBOLS: &[char] = &['★', '◆', '●', '▲', '■'];
pub const ROUND_UNITS: u32 = 20;

/// Chance that the right symbol is forced to equal the left one. An
/// independent draw can still match by coincidence.
const FORCED_MATCH_P: f32 = 0.5;

pub fn is_correct(left: char, right: char, claimed_match: bool) -> bool {
    (left == right) == claimed_match
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolMatchView {
    pub phase: Phase,
    pub left: Option<char>,
    pub right: Option<char>,
    pub time_left: u32,
    pub points: u32,
    pub round: u32,
}

#[derive(Debug)]
pub struct SymbolMatch {
    rng: Prng,
    phase: Phase,
    pair: Option<(char, char)>,
    points: u32,
    round: u32,
    countdown: Countdown,
}

impl SymbolMatch {
    pub fn new(rng: Prng) -> Self {
        Self {
            rng,
            phase: Phase::Idle,
            pair: None,
            points: 0,
            round: 0,
            countdown: Countdown::new(TIME_UNIT),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pair(&self) -> Option<(char, char)> {
        self.pair
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Number of pairs served in the current run.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn handle_input(&mut self, input: &GameInput) -> Step {
        match input {
            GameInput::Start => self.start(),
            GameInput::Answer { is_match } => self.answer(*is_match),
            _ => Step::quiet(self.phase),
        }
    }

    /// Start or restart. A run in progress is abandoned without a score.
    pub fn start(&mut self) -> Step {
        self.points = 0;
        self.round = 0;
        self.countdown.start(ROUND_UNITS);
        self.phase = Phase::Running;
        self.next_pair();
        Step::quiet(self.phase)
    }

    /// Score the claim against the current pair, then always serve a new pair.
    pub fn answer(&mut self, claimed_match: bool) -> Step {
        if self.phase != Phase::Running {
            return Step::quiet(self.phase);
        }
        if let Some((left, right)) = self.pair {
            if is_correct(left, right, claimed_match) {
                self.points += 1;
            }
        }
        self.next_pair();
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

    fn draw_symbol(&mut self) -> char {
        self.rng.choose(SYMBOLS).copied().unwrap_or('★')
    }

    fn next_pair(&mut self) {
        let left = self.draw_symbol();
        let right = if self.rng.gen_bool(FORCED_MATCH_P) {
            left
        } else {
            self.draw_symbol()
        };
        self.pair = Some((left, right));
        self.round += 1;
    }

    pub fn view(&self) -> SymbolMatchView {
        SymbolMatchView {
            phase: self.phase,
            left: self.pair.map(|(l, _)| l),
            right: self.pair.map(|(_, r)| r),
            time_left: if self.phase == Phase::Idle {
                ROUND_UNITS
            } else {
                self.countdown.remaining()
            },
            points: self.points,
            round: self.round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(seed: u64) -> SymbolMatch {
        let mut g = SymbolMatch::new(Prng::new(seed));
        g.start();
        g
    }

    fn truthful(g: &SymbolMatch) -> bool {
        let (l, r) = g.pair().unwrap();
        l == r
    }

    #[test]
    fn correctness_rule_for_every_symbol_pair() {
        for &l in SYMBOLS {
            for &r in SYMBOLS {
                assert!(is_correct(l, r, l == r));
                assert!(!is_correct(l, r, l != r));
            }
        }
    }

    #[test]
    fn truthful_answers_always_score() {
        let mut g = running(17);
        for _ in 0..50 {
            let claim = truthful(&g);
            g.answer(claim);
        }
        assert_eq!(g.points(), 50);
        assert_eq!(g.round(), 51);
    }

    #[test]
    fn false_answers_never_score_but_advance() {
        let mut g = running(23);
        for _ in 0..50 {
            let claim = !truthful(&g);
            g.answer(claim);
        }
        assert_eq!(g.points(), 0);
        assert_eq!(g.round(), 51);
    }

    #[test]
    fn match_pairs_appear_at_least_half_the_time() {
        let mut g = running(99);
        let mut matches = 0;
        for _ in 0..1000 {
            if truthful(&g) {
                matches += 1;
            }
            g.answer(true);
        }
        // 0.5 forced + 0.5 * 1/5 coincidental = 0.6 expected.
        assert!((500..700).contains(&matches), "matches = {matches}");
    }

    #[test]
    fn expiry_after_twenty_units_emits_points() {
        let mut g = running(8);
        let claim = truthful(&g);
        g.answer(claim);

        assert_eq!(g.tick(TIME_UNIT * 19).score, None);
        assert_eq!(g.tick(TIME_UNIT), Step::emit(Phase::Expired, 1));
        assert_eq!(g.answer(true), Step::quiet(Phase::Expired));
        assert_eq!(g.points(), 1);
    }

    #[test]
    fn answers_before_start_are_ignored() {
        let mut g = SymbolMatch::new(Prng::new(1));
        assert_eq!(g.answer(true), Step::quiet(Phase::Idle));
        assert_eq!(g.points(), 0);
        assert_eq!(g.view().left, None);
    }

    #[test]
    fn restart_cancels_previous_countdown() {
        let mut g = running(2);
        g.tick(TIME_UNIT * 15);
        g.start();
        assert_eq!(g.tick(TIME_UNIT * 15).score, None);
        assert_eq!(g.view().time_left, 5);
    }
}
