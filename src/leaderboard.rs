//! Display-ready progress metrics derived from the score store.

use std::time::Duration;

use serde::Serialize;

use crate::catalog::GameId;
use crate::store::ScoreStore;
use crate::timer::{TimerSlot, TIME_UNIT};

pub const POLL_INTERVAL: Duration = TIME_UNIT;
pub const RECENT_SCORES: usize = 3;

/// Per-game bar: ten percent per best-score point.
pub fn game_bar_width(best: u32) -> u32 {
    best.saturating_mul(10).min(100)
}

pub fn overall_bar_width(total: u32) -> u32 {
    total.min(100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameProgress {
    pub game: GameId,
    pub display_name: &'static str,
    pub best: u32,
    pub bar_width: u32,
    pub recent: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaderboardSnapshot {
    /// Only games with at least one recorded attempt, in catalog order.
    pub per_game: Vec<GameProgress>,
    pub overall_total: u32,
    pub overall_bar_width: u32,
}

impl LeaderboardSnapshot {
    pub fn compute(store: &ScoreStore) -> Self {
        let per_game: Vec<GameProgress> = store
            .records()
            .map(|(game, record)| GameProgress {
                game,
                display_name: game.display_name(),
                best: record.best,
                bar_width: game_bar_width(record.best),
                recent: record.recent(RECENT_SCORES),
            })
            .collect();

        let overall_total = per_game
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.best));

        Self {
            per_game,
            overall_total,
            overall_bar_width: overall_bar_width(overall_total),
        }
    }

    /// Nothing played yet.
    pub fn is_empty(&self) -> bool {
        self.per_game.is_empty()
    }
}

/// Polls the store on a fixed cadence and keeps the last snapshot. It only
/// ever reads the store.
#[derive(Debug)]
pub struct Leaderboard {
    poll: TimerSlot,
    snapshot: LeaderboardSnapshot,
}

impl Leaderboard {
    pub fn new(store: &ScoreStore) -> Self {
        let mut poll = TimerSlot::new();
        poll.arm_every(POLL_INTERVAL);
        Self {
            poll,
            snapshot: LeaderboardSnapshot::compute(store),
        }
    }

    /// Recompute right away (e.g. from an attempt-recorded hook).
    pub fn refresh(&mut self, store: &ScoreStore) {
        self.snapshot = LeaderboardSnapshot::compute(store);
    }

    /// Advance the poll timer; recomputes when it fires. Returns whether it did.
    pub fn tick(&mut self, dt: Duration, store: &ScoreStore) -> bool {
        if self.poll.advance(dt) == 0 {
            return false;
        }
        self.refresh(store);
        true
    }

    pub fn snapshot(&self) -> &LeaderboardSnapshot {
        &self.snapshot
    }
}
