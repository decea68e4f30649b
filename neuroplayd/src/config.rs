//! Environment-driven host settings. Game rules are compiled in and not configurable.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

const DEFAULT_TICK_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// `NEUROPLAY_DATA_DIR`; falls back to the OS data directory.
    pub data_dir: Option<PathBuf>,
    /// `NEUROPLAY_TICK_MS`: how often timers are pumped.
    pub tick_ms: u64,
    /// `NEUROPLAY_SEED`: fixed RNG seed for reproducible sessions.
    pub seed: u64,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = get("NEUROPLAY_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let tick_ms = match get("NEUROPLAY_TICK_MS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(ms) => ms.clamp(10, 1000),
                Err(_) => {
                    warn!("Ignoring NEUROPLAY_TICK_MS={:?}", v);
                    DEFAULT_TICK_MS
                }
            },
            None => DEFAULT_TICK_MS,
        };

        let seed = get("NEUROPLAY_SEED")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or_else(clock_seed);

        Self {
            data_dir,
            tick_ms,
            seed,
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
