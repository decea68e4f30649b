//! NeuroPlay core: four cognitive mini-games, the session controller that runs
//! one of them at a time, and durable best-score bookkeeping.

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/timer.rs"]
pub mod timer;

pub mod catalog;
pub mod games;
pub mod leaderboard;
pub mod session;
pub mod store;

pub use catalog::{list_games, GameId, GameInfo};
pub use games::{ActiveGame, GameInput, GameView, Phase, Step};
pub use leaderboard::{Leaderboard, LeaderboardSnapshot};
pub use session::{ActiveView, AttemptRecorded, SessionController};
pub use store::{Attempt, FilePort, MemoryPort, PersistencePort, ScoreRecord, ScoreStore};
