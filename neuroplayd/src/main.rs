//! NeuroPlay host process
//!
//! Owns the session controller and leaderboard for one player and exposes them
//! to a presentation layer as newline-delimited JSON on stdin/stdout:
//! one `Request` per line in, one `Response` per line out, plus unsolicited
//! `AttemptRecorded` lines whenever a score is written.
//!
//! Everything runs on a single thread. Timers advance from a fixed-rate tick.
//! Logs go to stderr.
//!
//! Storage locations:
//! - Linux: ~/.local/share/neuroplay/
//! - Windows: %APPDATA%\neuroplay\
//! - MacOS: ~/Library/Application Support/neuroplay/

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use neuroplay::leaderboard::{Leaderboard, LeaderboardSnapshot};
use neuroplay::prng::Prng;
use neuroplay::session::{ActiveView, AttemptRecorded, SessionController};
use neuroplay::store::{FilePort, ScoreStore};
use neuroplay::{GameId, GameInfo, GameInput};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod paths;

use config::DaemonConfig;
use error::DaemonError;
use paths::AppPaths;

// ═══════════════════════════════════════════════════════════════════════════
// Protocol Messages
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum Request {
    ListGames,
    /// Open a game, discarding any session in progress.
    StartGame {
        game: GameId,
    },
    CloseGame,
    Input {
        input: GameInput,
    },
    GetView,
    GetLeaderboard,
    Shutdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum Response {
    Games { games: Vec<GameInfo> },
    View { view: Option<ActiveView> },
    Leaderboard { snapshot: LeaderboardSnapshot },
    AttemptRecorded { game: GameId, score: u32, best: u32 },
    Success { message: String },
    Error { message: String },
}

impl From<AttemptRecorded> for Response {
    fn from(e: AttemptRecorded) -> Self {
        Response::AttemptRecorded {
            game: e.game,
            score: e.score,
            best: e.best,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Host State
// ═══════════════════════════════════════════════════════════════════════════

struct HostState {
    controller: SessionController,
    leaderboard: Leaderboard,
    recorded: Rc<RefCell<Vec<AttemptRecorded>>>,
    running: bool,
}

impl HostState {
    fn new(store: ScoreStore, rng: Prng) -> Self {
        let leaderboard = Leaderboard::new(&store);
        let mut controller = SessionController::new(store, rng);

        let recorded = Rc::new(RefCell::new(Vec::new()));
        {
            let recorded = Rc::clone(&recorded);
            controller.on_attempt_recorded(move |e| recorded.borrow_mut().push(*e));
        }

        Self {
            controller,
            leaderboard,
            recorded,
            running: true,
        }
    }

    fn tick(&mut self, dt: Duration) {
        self.controller.tick(dt);
        self.leaderboard.tick(dt, self.controller.store());
    }

    fn handle_line(&mut self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => Response::Error {
                message: format!("Invalid request: {}", e),
            },
        }
    }

    fn handle(&mut self, request: Request) -> Response {
        debug!(?request, "request");
        match request {
            Request::ListGames => Response::Games {
                games: self.controller.list_games(),
            },
            Request::StartGame { game } => {
                self.controller.select(game);
                self.view()
            }
            Request::CloseGame => {
                let closed = self.controller.cancel();
                Response::Success {
                    message: if closed {
                        "Session closed".to_string()
                    } else {
                        "No active session".to_string()
                    },
                }
            }
            Request::Input { input } => {
                if self.controller.active_game().is_none() {
                    return Response::Error {
                        message: "No active session".to_string(),
                    };
                }
                self.controller.handle_input(&input);
                self.view()
            }
            Request::GetView => self.view(),
            Request::GetLeaderboard => Response::Leaderboard {
                snapshot: self.leaderboard.snapshot().clone(),
            },
            Request::Shutdown => {
                self.running = false;
                info!("Shutdown requested");
                Response::Success {
                    message: "Shutting down".to_string(),
                }
            }
        }
    }

    fn view(&self) -> Response {
        Response::View {
            view: self.controller.active_view(),
        }
    }

    /// Attempts recorded since the last call. Also refreshes the leaderboard so
    /// the next snapshot request sees them without waiting for the poll.
    fn drain_recorded(&mut self) -> Vec<Response> {
        let events: Vec<AttemptRecorded> = self.recorded.borrow_mut().drain(..).collect();
        if !events.is_empty() {
            self.leaderboard.refresh(self.controller.store());
        }
        events.into_iter().map(Response::from).collect()
    }

    fn shutdown(&mut self) {
        // Scores are written as they happen; an unfinished session is dropped.
        self.controller.cancel();
    }
}

async fn send(out: &mut Stdout, response: &Response) -> Result<(), DaemonError> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    out.write_all(line.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), DaemonError> {
    // Initialize logging (stdout carries the protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DaemonConfig::from_env();
    let paths = AppPaths::new(config.data_dir.clone())?;
    info!("Persistence initialized ({})", paths.scores_file().display());

    let store = ScoreStore::load(FilePort::new(paths.data_dir()));
    let mut state = HostState::new(store, Prng::new(config.seed));

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut ticker = time::interval(Duration::from_millis(config.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    info!("neuroplayd ready (tick {} ms)", config.tick_ms);

    while state.running {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                state.tick(now.duration_since(last_tick));
                last_tick = now;
            }
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => {
                    let response = state.handle_line(&line);
                    send(&mut stdout, &response).await?;
                }
                None => {
                    info!("stdin closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received");
                break;
            }
        }

        for response in state.drain_recorded() {
            send(&mut stdout, &response).await?;
        }
    }

    state.shutdown();
    info!("neuroplayd stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroplay::store::MemoryPort;
    use neuroplay::timer::TIME_UNIT;
    use serde_json::Value;

    fn host() -> HostState {
        HostState::new(ScoreStore::load(MemoryPort::new()), Prng::new(3))
    }

    fn send_line(h: &mut HostState, line: &str) -> Value {
        serde_json::to_value(h.handle_line(line)).unwrap()
    }

    #[test]
    fn lists_the_catalog() {
        let mut h = host();
        let v = send_line(&mut h, r#"{"type":"ListGames"}"#);
        assert_eq!(v["type"], "Games");
        assert_eq!(v["games"].as_array().unwrap().len(), 4);
        assert_eq!(v["games"][0]["id"], "memory-matrix");
    }

    #[test]
    fn unknown_game_is_a_protocol_error() {
        let mut h = host();
        let v = send_line(&mut h, r#"{"type":"StartGame","game":"chess"}"#);
        assert_eq!(v["type"], "Error");
        assert!(h.controller.active_game().is_none());
    }

    #[test]
    fn input_without_session_is_rejected() {
        let mut h = host();
        let v = send_line(&mut h, r#"{"type":"Input","input":{"type":"Start"}}"#);
        assert_eq!(v["type"], "Error");
    }

    #[test]
    fn timed_game_reports_attempt_and_updates_leaderboard() {
        let mut h = host();
        let v = send_line(&mut h, r#"{"type":"StartGame","game":"speed-match"}"#);
        assert_eq!(v["view"]["view"]["game"], "speed-match");
        send_line(&mut h, r#"{"type":"Input","input":{"type":"Start"}}"#);

        h.tick(TIME_UNIT * 20);
        let events = h.drain_recorded();
        assert_eq!(events.len(), 1);
        let e = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(e["type"], "AttemptRecorded");
        assert_eq!(e["game"], "speed-match");

        let board = send_line(&mut h, r#"{"type":"GetLeaderboard"}"#);
        assert_eq!(board["snapshot"]["per_game"][0]["game"], "speed-match");
        assert!(h.drain_recorded().is_empty());
    }

    #[test]
    fn close_then_shutdown() {
        let mut h = host();
        send_line(&mut h, r#"{"type":"StartGame","game":"word-flex"}"#);
        let v = send_line(&mut h, r#"{"type":"CloseGame"}"#);
        assert_eq!(v["message"], "Session closed");
        let v = send_line(&mut h, r#"{"type":"GetView"}"#);
        assert_eq!(v["view"], Value::Null);

        send_line(&mut h, r#"{"type":"Shutdown"}"#);
        assert!(!h.running);
    }
}
