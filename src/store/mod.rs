//! Durable best-score and attempt-history bookkeeping.
//!
//! The whole mapping lives under a single key of a [`PersistencePort`] as JSON:
//!
//! ```text
//! { "word-flex": { "best": 12, "history": [ { "score": 12, "ts": 1718000000000 } ] } }
//! ```
//!
//! Reads never fail: absent or unreadable data behaves as an empty mapping.
//! Writes rewrite the full mapping; a failed write is logged and play continues.

mod port;

pub use port::{FilePort, MemoryPort, PersistencePort, StoreError};

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::GameId;

pub const STORAGE_KEY: &str = "neuroplayScores";
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub score: u32,
    /// Epoch milliseconds.
    pub ts: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default)]
    pub best: u32,
    /// Newest first, at most `HISTORY_LIMIT` entries.
    #[serde(default)]
    pub history: Vec<Attempt>,
}

impl ScoreRecord {
    fn push(&mut self, attempt: Attempt) {
        self.history.insert(0, attempt);
        self.history.truncate(HISTORY_LIMIT);
        self.best = self.best.max(attempt.score);
    }

    // Loaded data may break the invariants; repair it.
    fn normalize(&mut self) {
        self.history.truncate(HISTORY_LIMIT);
        if let Some(top) = self.history.iter().map(|a| a.score).max() {
            self.best = self.best.max(top);
        }
    }

    /// The `n` newest scores.
    pub fn recent(&self, n: usize) -> Vec<u32> {
        self.history.iter().take(n).map(|a| a.score).collect()
    }
}

/// Source of attempt timestamps.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl<F: Fn() -> u64> Clock for F {
    fn now_ms(&self) -> u64 {
        self()
    }
}

pub struct ScoreStore {
    port: Box<dyn PersistencePort>,
    clock: Box<dyn Clock>,
    records: BTreeMap<GameId, ScoreRecord>,
}

impl std::fmt::Debug for ScoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreStore")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl ScoreStore {
    pub fn load(port: impl PersistencePort + 'static) -> Self {
        Self::load_with_clock(port, SystemClock)
    }

    pub fn load_with_clock(
        port: impl PersistencePort + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let records = read_records(&port);
        debug!("score store loaded ({} games with records)", records.len());
        Self {
            port: Box::new(port),
            clock: Box::new(clock),
            records,
        }
    }

    /// Prepend an attempt, trim history, raise `best`, then rewrite storage.
    pub fn record_attempt(&mut self, game: GameId, score: u32) -> &ScoreRecord {
        let attempt = Attempt {
            score,
            ts: self.clock.now_ms(),
        };
        self.records.entry(game).or_default().push(attempt);

        if let Err(e) = self.persist() {
            warn!(game = %game, score, "score update not persisted: {}", e);
        }

        &self.records[&game]
    }

    pub fn get(&self, game: GameId) -> ScoreRecord {
        self.records.get(&game).cloned().unwrap_or_default()
    }

    pub fn best(&self, game: GameId) -> u32 {
        self.records.get(&game).map_or(0, |r| r.best)
    }

    /// Games that have at least one recorded attempt, in catalog order.
    pub fn records(&self) -> impl Iterator<Item = (GameId, &ScoreRecord)> + '_ {
        self.records.iter().map(|(&g, r)| (g, r))
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let text = encode(&self.records)?;
        self.port.write(STORAGE_KEY, &text)
    }
}

fn read_records(port: &dyn PersistencePort) -> BTreeMap<GameId, ScoreRecord> {
    match port.read(STORAGE_KEY) {
        Ok(Some(text)) => decode(&text),
        Ok(None) => BTreeMap::new(),
        Err(e) => {
            warn!("score storage unreadable, starting empty: {}", e);
            BTreeMap::new()
        }
    }
}

/// Parse the persisted mapping. Corrupt input yields an empty mapping and
/// unknown game keys are dropped.
pub fn decode(text: &str) -> BTreeMap<GameId, ScoreRecord> {
    let raw: BTreeMap<String, ScoreRecord> = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("discarding unreadable score data: {}", e);
            return BTreeMap::new();
        }
    };

    let mut records = BTreeMap::new();
    for (key, mut record) in raw {
        match GameId::from_key(&key) {
            Some(game) => {
                record.normalize();
                records.insert(game, record);
            }
            None => warn!("dropping scores for unknown game {:?}", key),
        }
    }
    records
}

pub fn encode(records: &BTreeMap<GameId, ScoreRecord>) -> Result<String, serde_json::Error> {
    let raw: BTreeMap<&str, &ScoreRecord> =
        records.iter().map(|(g, r)| (g.as_str(), r)).collect();
    serde_json::to_string(&raw)
}
