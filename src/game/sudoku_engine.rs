use log::{debug, info, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::SystemTime;

use super::settings::Settings;
use super::stats_manager::StatsManager;
use super::sudoku_generator::SudokuPuzzle;
use super::sudoku_session::{SudokuPhase, SudokuSession};
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    Rejected, SudokuCommand, SudokuCompletion, SudokuDifficulty, SudokuEngineEvent, SudokuStats,
};
use crate::scheduler::Clock;

/// Owns the current Sudoku session and its statistics. Invalid intents are
/// logged and ignored; every accepted one is published as a
/// [`SudokuEngineEvent::SessionUpdated`].
pub struct SudokuEngine {
    session: Option<SudokuSession>,
    stats: StatsManager<SudokuStats>,
    clock: Rc<dyn Clock>,
    event_emitter: EventEmitter<SudokuEngineEvent>,
    command_subscription: Option<Unsubscriber<SudokuCommand>>,
    default_difficulty: SudokuDifficulty,
    max_hints: u32,
    seed: Option<u64>,
    debug_mode: bool,
}

impl SudokuEngine {
    pub fn new(
        stats: StatsManager<SudokuStats>,
        clock: Rc<dyn Clock>,
        event_emitter: EventEmitter<SudokuEngineEvent>,
        settings: &Settings,
    ) -> Self {
        Self {
            session: None,
            stats,
            clock,
            event_emitter,
            command_subscription: None,
            default_difficulty: settings.sudoku_difficulty,
            max_hints: settings.max_hints,
            seed: Settings::seed_from_env(),
            debug_mode: Settings::is_debug_mode(),
        }
    }

    /// Route commands from `observer` into `engine`. The subscription holds
    /// only a weak reference and is dropped with the engine.
    pub fn wire_commands(engine: &Rc<RefCell<Self>>, observer: EventObserver<SudokuCommand>) {
        let handler: Weak<RefCell<Self>> = Rc::downgrade(engine);
        let subscription = observer.subscribe(move |command| {
            let Some(engine) = handler.upgrade() else {
                return;
            };
            match engine.try_borrow_mut() {
                Ok(mut engine) => engine.handle_command(command.clone()),
                Err(e) => log::error!(target: "sudoku", "Dropped {:?}: {}", command, e),
            };
        });
        engine.borrow_mut().command_subscription = Some(subscription);
    }

    pub fn session(&self) -> Option<&SudokuSession> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> &SudokuStats {
        self.stats.stats()
    }

    pub fn phase(&self) -> SudokuPhase {
        self.session
            .as_ref()
            .map_or(SudokuPhase::Idle, SudokuSession::phase)
    }

    pub fn difficulty(&self) -> SudokuDifficulty {
        self.session
            .as_ref()
            .map_or(self.default_difficulty, |session| session.difficulty)
    }

    /// Start a game at the default difficulty if none is loaded yet.
    pub fn ensure_started(&mut self) -> SudokuSession {
        if let Some(session) = &self.session {
            return session.clone();
        }
        self.new_game(Some(self.default_difficulty))
    }

    /// `None` keeps the current difficulty.
    pub fn new_game(&mut self, difficulty: Option<SudokuDifficulty>) -> SudokuSession {
        let difficulty = difficulty.unwrap_or_else(|| self.difficulty());
        self.new_game_seeded(difficulty, self.seed)
    }

    pub fn new_game_seeded(
        &mut self,
        difficulty: SudokuDifficulty,
        seed: Option<u64>,
    ) -> SudokuSession {
        let session = SudokuSession::new_game(difficulty, seed, self.clock.now())
            .with_max_hints(self.max_hints);
        self.start_session(session)
    }

    /// Play a known puzzle, e.g. one restored by the host.
    pub fn load_puzzle(&mut self, puzzle: SudokuPuzzle) -> SudokuSession {
        let session =
            SudokuSession::from_puzzle(puzzle, self.clock.now()).with_max_hints(self.max_hints);
        self.start_session(session)
    }

    pub fn reset_game(&mut self) -> Option<SudokuSession> {
        let Some(current) = &self.session else {
            debug!(target: "sudoku", "Ignoring reset: no game loaded");
            return None;
        };
        let session = current.reset(self.clock.now());
        Some(self.start_session(session))
    }

    pub fn select_cell(&mut self, row: usize, col: usize) -> Option<SudokuSession> {
        self.apply("select_cell", |session, _| session.select_cell(row, col));
        self.session.clone()
    }

    pub fn set_cell_value(
        &mut self,
        row: usize,
        col: usize,
        value: Option<u8>,
    ) -> Option<SudokuSession> {
        self.apply("set_cell_value", |session, now| {
            session.set_cell_value(row, col, value, now)
        });
        self.session.clone()
    }

    pub fn clear_cell(&mut self) -> Option<SudokuSession> {
        self.apply("clear_cell", |session, now| session.clear_cell(now));
        self.session.clone()
    }

    /// True when a hint was applied.
    pub fn get_hint(&mut self) -> bool {
        self.apply("get_hint", |session, now| session.get_hint(now))
    }

    pub fn handle_command(&mut self, command: SudokuCommand) {
        trace!(target: "sudoku", "Handling command: {:?}", command);
        match command {
            SudokuCommand::NewGame(difficulty) => {
                self.new_game(difficulty);
            }
            SudokuCommand::SelectCell(row, col) => {
                self.select_cell(row, col);
            }
            SudokuCommand::SetCellValue(row, col, value) => {
                self.set_cell_value(row, col, value);
            }
            SudokuCommand::ClearCell => {
                self.clear_cell();
            }
            SudokuCommand::ShowHint => {
                self.get_hint();
            }
            SudokuCommand::Reset => {
                self.reset_game();
            }
        }
    }

    fn start_session(&mut self, session: SudokuSession) -> SudokuSession {
        info!(
            target: "sudoku",
            "New game; difficulty: {}; seed: {}",
            session.difficulty,
            session.seed
        );
        if self.debug_mode {
            debug!(target: "sudoku", "Solution:\n{}", session.solution);
        }
        self.event_emitter
            .emit(SudokuEngineEvent::HintUsageChanged(session.hints_used));
        self.event_emitter
            .emit(SudokuEngineEvent::SessionUpdated(session.clone()));
        self.session = Some(session.clone());
        session
    }

    /// Run one reducer against the current session. Returns whether the
    /// intent was accepted.
    fn apply<F>(&mut self, intent: &str, transition: F) -> bool
    where
        F: FnOnce(&SudokuSession, SystemTime) -> Result<SudokuSession, Rejected>,
    {
        let Some(current) = &self.session else {
            debug!(target: "sudoku", "Ignoring {}: no game loaded", intent);
            return false;
        };
        let was_completed = current.is_completed;
        let hints_used = current.hints_used;

        let next = match transition(current, self.clock.now()) {
            Ok(next) => next,
            Err(rejected) => {
                debug!(target: "sudoku", "Ignoring {}: {}", intent, rejected);
                return false;
            }
        };
        trace!(target: "sudoku", "Accepted {}", intent);

        self.session = Some(next.clone());
        if next.hints_used != hints_used {
            self.event_emitter
                .emit(SudokuEngineEvent::HintUsageChanged(next.hints_used));
        }
        self.event_emitter
            .emit(SudokuEngineEvent::SessionUpdated(next.clone()));
        if next.is_completed && !was_completed {
            self.record_completion(&next);
        }
        true
    }

    fn record_completion(&mut self, session: &SudokuSession) {
        let elapsed_seconds = session.elapsed_seconds().unwrap_or_default();
        let stats = self
            .stats
            .record(|stats| stats.record_completion(elapsed_seconds))
            .clone();
        info!(
            target: "sudoku",
            "Puzzle solved in {}s with {} hints; seed: {}",
            elapsed_seconds,
            session.hints_used,
            session.seed
        );

        self.event_emitter
            .emit(SudokuEngineEvent::Completed(SudokuCompletion {
                difficulty: session.difficulty,
                elapsed_seconds,
                hints_used: session.hints_used,
                playthrough_id: session.playthrough_id,
            }));
        self.event_emitter
            .emit(SudokuEngineEvent::StatsUpdated(stats));
    }
}

impl Drop for SudokuEngine {
    fn drop(&mut self) {
        if let Some(subscription) = self.command_subscription.take() {
            subscription.unsubscribe();
        }
    }
}
