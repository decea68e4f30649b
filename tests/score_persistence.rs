//! End-to-end: games played through the controller, persisted, reloaded.

use neuroplay::games::sequence_reasoning::BANK;
use neuroplay::leaderboard::LeaderboardSnapshot;
use neuroplay::prng::Prng;
use neuroplay::store::{FilePort, MemoryPort, STORAGE_KEY};
use neuroplay::timer::TIME_UNIT;
use neuroplay::{GameId, GameInput, GameView, Phase, ScoreStore, SessionController};

fn answer_current(c: &mut SessionController, correct: bool) -> Option<u32> {
    let question = match c.active_view().expect("active session").view {
        GameView::LogicRush(v) => v.question,
        other => panic!("expected logic rush, got {other:?}"),
    };
    let puzzle = &BANK[question];
    let value = if correct {
        puzzle.answer
    } else {
        *puzzle
            .options
            .iter()
            .find(|&&o| o != puzzle.answer)
            .expect("a wrong option")
    };
    c.handle_input(&GameInput::Choose { value })
        .map(|e| e.score)
}

#[test]
fn scores_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = ScoreStore::load(FilePort::new(dir.path()));
        let mut c = SessionController::new(store, Prng::new(5));
        c.select(GameId::LogicRush);
        let mut emitted = Vec::new();
        for _ in 0..BANK.len() {
            emitted.extend(answer_current(&mut c, true));
        }
        for i in 0..BANK.len() {
            emitted.extend(answer_current(&mut c, i % 2 == 0));
        }
        assert_eq!(emitted, vec![4, 2]);
    }

    assert!(dir.path().join(format!("{STORAGE_KEY}.json")).exists());

    let store = ScoreStore::load(FilePort::new(dir.path()));
    let rec = store.get(GameId::LogicRush);
    assert_eq!(rec.best, 4);
    assert_eq!(rec.recent(5), vec![2, 4]);
}

#[test]
fn missing_directory_loads_empty_and_is_created_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("not").join("yet");

    let mut store = ScoreStore::load(FilePort::new(&nested));
    assert_eq!(store.records().count(), 0);
    store.record_attempt(GameId::WordFlex, 3);

    let reloaded = ScoreStore::load(FilePort::new(&nested));
    assert_eq!(reloaded.best(GameId::WordFlex), 3);
}

#[test]
fn corrupt_file_is_replaced_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{STORAGE_KEY}.json"));
    std::fs::write(&path, "{\"memory-matrix\": ").unwrap();

    let mut store = ScoreStore::load(FilePort::new(dir.path()));
    assert_eq!(store.records().count(), 0);
    store.record_attempt(GameId::MemoryMatrix, 2);

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["memory-matrix"]["best"], 2);
}

#[test]
fn memory_matrix_rounds_each_record_an_attempt() {
    let port = MemoryPort::new();
    let mut c = SessionController::new(ScoreStore::load(port.clone()), Prng::new(31));
    c.select(GameId::MemoryMatrix);

    let mut scores = Vec::new();
    for _ in 0..3 {
        c.handle_input(&GameInput::Start);
        let pattern = match c.active_view().unwrap().view {
            GameView::MemoryMatrix(v) => {
                assert_eq!(v.phase, Phase::Presenting);
                v.lit
            }
            other => panic!("unexpected view {other:?}"),
        };
        // The reveal for a 5-cell pattern is the longest: 2 s.
        c.tick(TIME_UNIT * 2);
        for cell in pattern {
            if let Some(e) = c.handle_input(&GameInput::Cell { index: cell }) {
                scores.push(e.score);
            }
        }
    }

    assert_eq!(scores, vec![1, 2, 3]);
    let rec = c.store().get(GameId::MemoryMatrix);
    assert_eq!(rec.best, 3);
    assert_eq!(rec.history.len(), 3);
}

#[test]
fn switching_games_mid_run_leaves_store_untouched() {
    let port = MemoryPort::new();
    let mut c = SessionController::new(ScoreStore::load(port.clone()), Prng::new(8));

    c.select(GameId::WordFlex);
    c.handle_input(&GameInput::Start);
    c.tick(TIME_UNIT * 29);
    c.select(GameId::SpeedMatch);
    c.tick(TIME_UNIT * 5);
    c.cancel();
    c.tick(TIME_UNIT * 60);

    assert_eq!(port.get(STORAGE_KEY), None);
    assert!(LeaderboardSnapshot::compute(c.store()).is_empty());
}

#[test]
fn leaderboard_reflects_every_game_played() {
    let mut c = SessionController::new(ScoreStore::load(MemoryPort::new()), Prng::new(64));

    c.select(GameId::LogicRush);
    for _ in 0..BANK.len() {
        answer_current(&mut c, true);
    }

    c.select(GameId::SpeedMatch);
    c.handle_input(&GameInput::Start);
    for _ in 0..7 {
        let claim = match c.active_view().unwrap().view {
            GameView::SpeedMatch(v) => v.left == v.right,
            other => panic!("unexpected view {other:?}"),
        };
        c.handle_input(&GameInput::Answer { is_match: claim });
    }
    let event = c.tick(TIME_UNIT * 20).expect("expiry emits");
    assert_eq!(event.score, 7);

    let snap = LeaderboardSnapshot::compute(c.store());
    assert_eq!(snap.per_game.len(), 2);
    assert_eq!(snap.per_game[0].game, GameId::LogicRush);
    assert_eq!(snap.per_game[0].bar_width, 40);
    assert_eq!(snap.per_game[1].bar_width, 70);
    assert_eq!(snap.overall_total, 11);
    assert_eq!(snap.overall_bar_width, 11);
}
