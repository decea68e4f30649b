//! Session controller: owns the score store and at most one running game.
//!
//! The controller is the only path from a finished game to the store. Scores
//! are written on emission; sessions that are discarded (new selection, close,
//! escape) never write anything.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{self, GameId, GameInfo};
use crate::games::{ActiveGame, GameInput, GameView, Step};
use crate::prng::Prng;
use crate::store::ScoreStore;

/// Fired after every attempt written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttemptRecorded {
    pub game: GameId,
    pub score: u32,
    pub best: u32,
}

/// Renderable snapshot of the active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveView {
    pub game: GameId,
    pub title: &'static str,
    pub best: u32,
    pub view: GameView,
}

type Listener = Box<dyn FnMut(&AttemptRecorded)>;

#[derive(Debug)]
struct Session {
    game: GameId,
    machine: ActiveGame,
}

pub struct SessionController {
    store: ScoreStore,
    rng: Prng,
    active: Option<Session>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("store", &self.store)
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SessionController {
    pub fn new(store: ScoreStore, rng: Prng) -> Self {
        Self {
            store,
            rng,
            active: None,
            listeners: Vec::new(),
        }
    }

    pub fn list_games(&self) -> Vec<GameInfo> {
        catalog::list_games()
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }

    pub fn active_game(&self) -> Option<GameId> {
        self.active.as_ref().map(|s| s.game)
    }

    /// Register a hook run after each recorded attempt.
    pub fn on_attempt_recorded(&mut self, listener: impl FnMut(&AttemptRecorded) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Open `game` in a fresh session. Whatever was running is discarded unscored.
    pub fn select(&mut self, game: GameId) {
        self.discard("replaced");
        let machine = ActiveGame::new(game, self.rng.fork());
        info!(game = %game, "session started");
        self.active = Some(Session { game, machine });
    }

    /// Close the active session without scoring it. Returns whether one was open.
    pub fn cancel(&mut self) -> bool {
        self.discard("cancelled")
    }

    fn discard(&mut self, reason: &str) -> bool {
        match self.active.take() {
            Some(mut session) => {
                session.machine.stop();
                info!(game = %session.game, reason, "session discarded");
                true
            }
            None => false,
        }
    }

    /// Forward one input to the active game. `Escape` closes the session.
    pub fn handle_input(&mut self, input: &GameInput) -> Option<AttemptRecorded> {
        if *input == GameInput::Escape {
            self.cancel();
            return None;
        }
        let step = self.active.as_mut()?.machine.handle_input(input);
        self.settle(step)
    }

    /// Advance the active game's timers by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Option<AttemptRecorded> {
        let step = self.active.as_mut()?.machine.tick(dt);
        self.settle(step)
    }

    fn settle(&mut self, step: Step) -> Option<AttemptRecorded> {
        let score = step.score?;
        self.on_score(score)
    }

    fn on_score(&mut self, score: u32) -> Option<AttemptRecorded> {
        let game = self.active.as_ref()?.game;
        let best = self.store.record_attempt(game, score).best;
        debug!(game = %game, score, best, "attempt recorded");

        let event = AttemptRecorded { game, score, best };
        for listener in &mut self.listeners {
            listener(&event);
        }
        Some(event)
    }

    pub fn active_view(&self) -> Option<ActiveView> {
        let session = self.active.as_ref()?;
        Some(ActiveView {
            game: session.game,
            title: session.game.display_name(),
            best: self.store.best(session.game),
            view: session.machine.view(),
        })
    }
}
