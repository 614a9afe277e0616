mod common;

use std::rc::Rc;
use std::time::Duration;

use common::{recording_channel, UsingLogger};
use mindgames::game::{MemoryStorage, StatsManager, SudokuPhase};
use mindgames::model::{SudokuDifficulty, SudokuEngineEvent, SudokuStats};
use mindgames::{ManualScheduler, Settings, SudokuEngine};
use test_context::test_context;

fn engine_with(
    storage: &MemoryStorage,
) -> (SudokuEngine, Rc<ManualScheduler>, common::Recorded<SudokuEngineEvent>) {
    let clock = Rc::new(ManualScheduler::new());
    let (emitter, events) = recording_channel();
    let engine = SudokuEngine::new(
        StatsManager::load(Box::new(storage.clone())),
        clock.clone(),
        emitter,
        &Settings::default(),
    );
    (engine, clock, events)
}

#[test_context(UsingLogger)]
#[test]
fn solving_an_easy_game_updates_stats(_: &mut UsingLogger) {
    let storage = MemoryStorage::new();
    let (mut engine, clock, events) = engine_with(&storage);

    let session = engine.ensure_started();
    assert_eq!(session.difficulty, SudokuDifficulty::Easy);
    assert_eq!(session.template.filled_count(), 45);
    assert_eq!(session.working, session.template);

    clock.advance(Duration::from_secs(312));
    let blanks: Vec<_> = session.template.empty_positions().collect();
    for pos in blanks {
        let digit = session.solution.get(pos.row, pos.col);
        engine.set_cell_value(pos.row, pos.col, digit);
    }

    assert_eq!(engine.phase(), SudokuPhase::Completed);
    let finished = engine.session().unwrap();
    assert!(!finished.has_errors);
    assert_eq!(finished.elapsed_seconds(), Some(312));

    let stats = engine.stats();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.games_completed, 1);
    assert_eq!(stats.best_time, Some(312));
    assert_eq!(stats.average_time, 312);
    assert_eq!(stats.current_streak, 1);

    let saved: SudokuStats = serde_json::from_str(&storage.contents().unwrap()).unwrap();
    assert_eq!(&saved, stats);

    let events = events.borrow();
    assert!(events
        .iter()
        .any(|event| matches!(event, SudokuEngineEvent::Completed(c) if c.elapsed_seconds == 312)));
    assert!(matches!(events.last(), Some(SudokuEngineEvent::StatsUpdated(_))));
}

#[test_context(UsingLogger)]
#[test]
fn stats_survive_a_new_engine(_: &mut UsingLogger) {
    let storage = MemoryStorage::new();
    {
        let (mut engine, _clock, _events) = engine_with(&storage);
        let session = engine.new_game_seeded(SudokuDifficulty::Medium, Some(8));
        let blanks: Vec<_> = session.template.empty_positions().collect();
        for pos in blanks {
            engine.set_cell_value(pos.row, pos.col, session.solution.get(pos.row, pos.col));
        }
        assert_eq!(engine.stats().games_completed, 1);
    }

    let (engine, _clock, _events) = engine_with(&storage);
    assert_eq!(engine.stats().games_completed, 1);
    assert_eq!(engine.stats().best_time, Some(0));
}

#[test_context(UsingLogger)]
#[test]
fn conflicting_entry_flags_errors(_: &mut UsingLogger) {
    let storage = MemoryStorage::new();
    let (mut engine, _clock, _events) = engine_with(&storage);
    let session = engine.new_game_seeded(SudokuDifficulty::Expert, Some(21));

    // a blank sharing its row with some clue; writing that clue's digit conflicts
    let (blank, clue) = session
        .template
        .empty_positions()
        .find_map(|pos| {
            (0..9)
                .find_map(|col| session.template.get(pos.row, col))
                .map(|digit| (pos, digit))
        })
        .unwrap();

    let after = engine
        .set_cell_value(blank.row, blank.col, Some(clue))
        .unwrap();
    assert!(after.has_errors);

    engine.select_cell(blank.row, blank.col);
    let cleared = engine.clear_cell().unwrap();
    assert!(!cleared.has_errors);
    assert_eq!(cleared.working.get(blank.row, blank.col), None);
}

#[test_context(UsingLogger)]
#[test]
fn same_seed_same_puzzle(_: &mut UsingLogger) {
    let storage = MemoryStorage::new();
    let (mut engine, _clock, _events) = engine_with(&storage);
    let first = engine.new_game_seeded(SudokuDifficulty::Hard, Some(99));
    let second = engine.new_game_seeded(SudokuDifficulty::Hard, Some(99));
    assert_eq!(first.template, second.template);
    assert_eq!(first.solution, second.solution);
    assert_ne!(first.playthrough_id, second.playthrough_id);
}
