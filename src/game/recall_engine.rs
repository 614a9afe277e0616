use log::{debug, error, info, trace, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use uuid::Uuid;

use super::recall_session::{RecallPhase, RecallSession};
use super::settings::Settings;
use super::stats_manager::StatsManager;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    CardId, RecallCommand, RecallCompletion, RecallDifficulty, RecallEngineEvent, RecallStats,
    Theme,
};
use crate::scheduler::{Clock, Scheduler, TimerHandle};

pub const PREVIEW_TICK: Duration = Duration::from_secs(1);
pub const RESOLUTION_DELAY: Duration = Duration::from_secs(1);

type TimerSlot = Rc<Cell<Option<TimerHandle>>>;
type TimerAction = fn(&mut RecallEngine, Uuid);

/// Owns the current Picture-Recall session, its statistics and its two
/// timers: the preview countdown and the delayed pair resolution.
///
/// Timer callbacks hold a weak reference to the engine and the id of the
/// playthrough that armed them. A callback for a replaced playthrough is a
/// no-op even if cancelling it was missed.
///
/// The timer slots are shared with the callbacks so a callback that finds the
/// engine busy can re-arm itself without borrowing it.
pub struct RecallEngine {
    self_ref: Weak<RefCell<RecallEngine>>,
    session: Option<RecallSession>,
    stats: StatsManager<RecallStats>,
    scheduler: Rc<dyn Scheduler>,
    clock: Rc<dyn Clock>,
    event_emitter: EventEmitter<RecallEngineEvent>,
    command_subscription: Option<Unsubscriber<RecallCommand>>,
    preview_timer: TimerSlot,
    resolution_timer: TimerSlot,
    default_difficulty: RecallDifficulty,
    default_theme: Theme,
    seed: Option<u64>,
}

impl RecallEngine {
    pub fn new(
        stats: StatsManager<RecallStats>,
        scheduler: Rc<dyn Scheduler>,
        clock: Rc<dyn Clock>,
        event_emitter: EventEmitter<RecallEngineEvent>,
        settings: &Settings,
    ) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|self_ref| {
            RefCell::new(Self {
                self_ref: self_ref.clone(),
                session: None,
                stats,
                scheduler,
                clock,
                event_emitter,
                command_subscription: None,
                preview_timer: TimerSlot::default(),
                resolution_timer: TimerSlot::default(),
                default_difficulty: settings.recall_difficulty,
                default_theme: settings.recall_theme,
                seed: Settings::seed_from_env(),
            })
        })
    }

    pub fn wire_commands(engine: &Rc<RefCell<Self>>, observer: EventObserver<RecallCommand>) {
        let handler = Rc::downgrade(engine);
        let subscription = observer.subscribe(move |command| {
            Self::with_engine(&handler, |engine| engine.handle_command(command.clone()));
        });
        engine.borrow_mut().command_subscription = Some(subscription);
    }

    pub fn session(&self) -> Option<&RecallSession> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> &RecallStats {
        self.stats.stats()
    }

    pub fn phase(&self) -> Option<RecallPhase> {
        self.session.as_ref().map(RecallSession::phase)
    }

    pub fn has_pending_timers(&self) -> bool {
        self.preview_timer.get().is_some() || self.resolution_timer.get().is_some()
    }

    pub fn ensure_started(&mut self) -> RecallSession {
        if let Some(session) = &self.session {
            return session.clone();
        }
        self.new_game(self.default_difficulty, self.default_theme)
    }

    pub fn new_game(&mut self, difficulty: RecallDifficulty, theme: Theme) -> RecallSession {
        self.new_game_seeded(difficulty, theme, self.seed)
    }

    /// Deal a fresh deck and start the preview countdown. Timers of the
    /// previous playthrough are cancelled first.
    pub fn new_game_seeded(
        &mut self,
        difficulty: RecallDifficulty,
        theme: Theme,
        seed: Option<u64>,
    ) -> RecallSession {
        self.cancel_timers();
        let session = RecallSession::new_game(difficulty, theme, seed);
        info!(
            target: "recall",
            "New game; {}; theme: {}; seed: {}",
            difficulty,
            theme,
            session.seed
        );
        self.publish(session.clone());
        self.schedule_preview_tick(session.playthrough_id);
        session
    }

    /// Turn a card face-up. The second card of a pair schedules the
    /// resolution; nothing more can be flipped until it runs.
    pub fn flip_card(&mut self, id: CardId) -> Option<RecallSession> {
        let Some(current) = &self.session else {
            debug!(target: "recall", "Ignoring flip of {}: no game loaded", id);
            return None;
        };
        match current.flip_card(id) {
            Ok(next) => {
                let ready = next.selected_cards.len() == 2;
                let playthrough_id = next.playthrough_id;
                trace!(target: "recall", "Flipped card {}", id);
                self.publish(next);
                if ready {
                    self.schedule_resolution(playthrough_id);
                }
            }
            Err(rejected) => {
                debug!(target: "recall", "Ignoring flip of {}: {}", id, rejected);
            }
        }
        self.session.clone()
    }

    /// Tear the game down: cancel every pending timer and drop the session,
    /// so the next [`RecallEngine::ensure_started`] deals a fresh game.
    pub fn cleanup(&mut self) {
        self.cancel_timers();
        if self.session.take().is_some() {
            trace!(target: "recall", "Session discarded");
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.preview_timer.take() {
            self.scheduler.cancel(handle);
            trace!(target: "recall", "Cancelled preview timer");
        }
        if let Some(handle) = self.resolution_timer.take() {
            self.scheduler.cancel(handle);
            trace!(target: "recall", "Cancelled resolution timer");
        }
    }

    pub fn handle_command(&mut self, command: RecallCommand) {
        trace!(target: "recall", "Handling command: {:?}", command);
        match command {
            RecallCommand::NewGame(difficulty, theme) => {
                self.new_game(difficulty, theme);
            }
            RecallCommand::FlipCard(id) => {
                self.flip_card(id);
            }
            RecallCommand::Cleanup => self.cleanup(),
        }
    }

    fn publish(&mut self, session: RecallSession) {
        self.session = Some(session.clone());
        self.event_emitter
            .emit(RecallEngineEvent::SessionUpdated(session));
    }

    fn is_current(&self, playthrough_id: Uuid) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.playthrough_id == playthrough_id)
    }

    fn with_engine<F>(engine: &Weak<RefCell<RecallEngine>>, f: F)
    where
        F: FnOnce(&mut RecallEngine),
    {
        let Some(engine) = engine.upgrade() else {
            trace!(target: "recall", "Engine dropped; ignoring callback");
            return;
        };
        match engine.try_borrow_mut() {
            Ok(mut engine) => f(&mut *engine),
            Err(e) => error!(target: "recall", "Engine busy; callback dropped: {}", e),
        };
    }

    fn schedule_preview_tick(&mut self, playthrough_id: Uuid) {
        arm_timer(
            &self.scheduler,
            &self.preview_timer,
            PREVIEW_TICK,
            self.self_ref.clone(),
            RecallEngine::on_preview_tick,
            playthrough_id,
        );
    }

    fn schedule_resolution(&mut self, playthrough_id: Uuid) {
        arm_timer(
            &self.scheduler,
            &self.resolution_timer,
            RESOLUTION_DELAY,
            self.self_ref.clone(),
            RecallEngine::on_resolution,
            playthrough_id,
        );
    }

    fn on_preview_tick(&mut self, playthrough_id: Uuid) {
        if !self.is_current(playthrough_id) {
            trace!(target: "recall", "Stale preview tick for {}", playthrough_id);
            return;
        }
        self.preview_timer.set(None);

        let Some(current) = &self.session else {
            return;
        };
        let next = match current.tick_preview(self.clock.now()) {
            Ok(next) => next,
            Err(rejected) => {
                debug!(target: "recall", "Ignoring preview tick: {}", rejected);
                return;
            }
        };

        let preview_over = !next.show_preview;
        self.publish(next);
        if preview_over {
            info!(target: "recall", "Preview over; play started");
            self.event_emitter.emit(RecallEngineEvent::PreviewEnded);
        } else {
            self.schedule_preview_tick(playthrough_id);
        }
    }

    fn on_resolution(&mut self, playthrough_id: Uuid) {
        if !self.is_current(playthrough_id) {
            trace!(target: "recall", "Stale resolution for {}", playthrough_id);
            return;
        }
        self.resolution_timer.set(None);

        let Some(current) = &self.session else {
            return;
        };
        let pair_key = current
            .selected_cards
            .first()
            .and_then(|id| current.card(*id))
            .map(|card| card.pair_key.clone())
            .unwrap_or_default();
        let matched_before = current.matched_pairs;
        let next = match current.resolve_selection(self.clock.now()) {
            Ok(next) => next,
            Err(rejected) => {
                debug!(target: "recall", "Ignoring resolution: {}", rejected);
                return;
            }
        };

        let matched = next.matched_pairs > matched_before;
        let completed = next.is_game_complete;
        trace!(target: "recall", "Resolved {}: matched={}", pair_key, matched);
        self.publish(next.clone());
        self.event_emitter
            .emit(RecallEngineEvent::PairResolved { matched, pair_key });
        if completed {
            self.record_completion(&next);
        }
    }

    fn record_completion(&mut self, session: &RecallSession) {
        let elapsed_seconds = session.elapsed_seconds().unwrap_or_default();
        let stats = self
            .stats
            .record(|stats| {
                stats.record_completion(session.difficulty, session.moves, elapsed_seconds)
            })
            .clone();
        info!(
            target: "recall",
            "All pairs found in {} moves, {}s; seed: {}",
            session.moves,
            elapsed_seconds,
            session.seed
        );

        self.event_emitter
            .emit(RecallEngineEvent::Completed(RecallCompletion {
                difficulty: session.difficulty,
                theme: session.theme,
                moves: session.moves,
                elapsed_seconds,
                playthrough_id: session.playthrough_id,
            }));
        self.event_emitter
            .emit(RecallEngineEvent::StatsUpdated(stats));
    }
}

/// Schedule `action` after `after` and store the handle in `slot`. If the
/// engine is borrowed when the timer fires, the timer is re-armed into the
/// same slot instead of being lost.
fn arm_timer(
    scheduler: &Rc<dyn Scheduler>,
    slot: &TimerSlot,
    after: Duration,
    engine: Weak<RefCell<RecallEngine>>,
    action: TimerAction,
    playthrough_id: Uuid,
) {
    let retry_scheduler = Rc::clone(scheduler);
    let retry_slot = Rc::clone(slot);
    let handle = scheduler.schedule(
        after,
        Box::new(move || {
            let Some(strong) = engine.upgrade() else {
                trace!(target: "recall", "Engine dropped; ignoring timer");
                return;
            };
            let busy = match strong.try_borrow_mut() {
                Ok(mut guard) => {
                    action(&mut *guard, playthrough_id);
                    false
                }
                Err(_) => true,
            };
            if busy {
                warn!(target: "recall", "Engine busy when timer fired; re-arming");
                arm_timer(
                    &retry_scheduler,
                    &retry_slot,
                    after,
                    engine,
                    action,
                    playthrough_id,
                );
            }
        }),
    );
    slot.set(Some(handle));
}

impl Drop for RecallEngine {
    fn drop(&mut self) {
        self.cancel_timers();
        if let Some(subscription) = self.command_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_context::test_context;

    use crate::events::Channel;
    use crate::game::MemoryStorage;
    use crate::scheduler::ManualScheduler;
    use crate::tests::UsingLogger;

    struct Harness {
        engine: Rc<RefCell<RecallEngine>>,
        scheduler: Rc<ManualScheduler>,
        events: Rc<RefCell<Vec<RecallEngineEvent>>>,
    }

    fn harness() -> Harness {
        let scheduler = Rc::new(ManualScheduler::new());
        let (emitter, observer) = Channel::<RecallEngineEvent>::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        observer.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let engine = RecallEngine::new(
            StatsManager::in_memory(),
            scheduler.clone(),
            scheduler.clone(),
            emitter,
            &Settings::default(),
        );
        Harness {
            engine,
            scheduler,
            events,
        }
    }

    impl Harness {
        fn start(&self, difficulty: RecallDifficulty) -> RecallSession {
            self.engine
                .borrow_mut()
                .new_game_seeded(difficulty, Theme::Flags, Some(17))
        }

        fn finish_preview(&self) {
            let seconds = self.session().preview_seconds_remaining;
            self.scheduler.advance(PREVIEW_TICK * seconds);
        }

        fn session(&self) -> RecallSession {
            self.engine.borrow().session().cloned().unwrap()
        }

        fn flip(&self, id: CardId) -> Option<RecallSession> {
            self.engine.borrow_mut().flip_card(id)
        }

        fn pair(&self, key: &str) -> (CardId, CardId) {
            let ids: Vec<CardId> = self
                .session()
                .cards
                .iter()
                .filter(|card| card.pair_key == key)
                .map(|card| card.id)
                .collect();
            (ids[0], ids[1])
        }

        fn count(&self, predicate: impl Fn(&RecallEngineEvent) -> bool) -> usize {
            self.events.borrow().iter().filter(|e| predicate(e)).count()
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_preview_counts_down_on_timer(_: &mut UsingLogger) {
        let h = harness();
        h.start(RecallDifficulty::ThreePairs);

        h.scheduler.advance(Duration::from_secs(4));
        assert_eq!(h.session().preview_seconds_remaining, 1);
        assert_eq!(h.session().phase(), RecallPhase::Previewing);

        h.scheduler.advance(Duration::from_secs(1));
        assert_eq!(h.session().phase(), RecallPhase::Playing);
        assert_eq!(h.count(|e| matches!(e, RecallEngineEvent::PreviewEnded)), 1);
        assert!(!h.engine.borrow().has_pending_timers());
        assert_eq!(h.scheduler.pending_count(), 0);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_resolution_waits_one_second(_: &mut UsingLogger) {
        let h = harness();
        h.start(RecallDifficulty::ThreePairs);
        h.finish_preview();
        let (a, b) = h.pair("gb");

        h.flip(a);
        let both = h.flip(b).unwrap();
        assert_eq!(both.selected_cards.len(), 2);
        assert_eq!(both.matched_pairs, 0);

        h.scheduler.advance(Duration::from_millis(999));
        assert_eq!(h.session().matched_pairs, 0);

        h.scheduler.advance(Duration::from_millis(1));
        assert_eq!(h.session().matched_pairs, 1);
        assert_eq!(h.session().moves, 1);
        assert_eq!(
            h.count(|e| matches!(e, RecallEngineEvent::PairResolved { matched: true, .. })),
            1
        );
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_third_flip_ignored_while_pending(_: &mut UsingLogger) {
        let h = harness();
        h.start(RecallDifficulty::FourPairs);
        h.finish_preview();
        let ids: Vec<CardId> = h.session().cards.iter().map(|card| card.id).collect();

        h.flip(ids[0]);
        h.flip(ids[1]);
        let after_third = h.flip(ids[2]).unwrap();
        assert_eq!(after_third.selected_cards, vec![ids[0], ids[1]]);
        assert!(after_third.card(ids[2]).unwrap().is_face_down());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_new_game_cancels_old_timers(_: &mut UsingLogger) {
        let h = harness();
        let first = h.start(RecallDifficulty::ThreePairs);
        h.scheduler.advance(Duration::from_secs(2));

        let second = h.start(RecallDifficulty::FivePairs);
        assert_ne!(first.playthrough_id, second.playthrough_id);
        assert_eq!(h.scheduler.pending_count(), 1);

        // the first game's countdown would have ended here
        h.scheduler.advance(Duration::from_secs(3));
        let session = h.session();
        assert_eq!(session.playthrough_id, second.playthrough_id);
        assert_eq!(session.preview_seconds_remaining, 7);
        assert_eq!(session.phase(), RecallPhase::Previewing);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_cleanup_stops_preview(_: &mut UsingLogger) {
        let h = harness();
        h.start(RecallDifficulty::ThreePairs);
        h.scheduler.advance(Duration::from_secs(1));

        h.engine.borrow_mut().cleanup();
        assert_eq!(h.scheduler.pending_count(), 0);
        assert!(h.engine.borrow().session().is_none());

        h.scheduler.advance(Duration::from_secs(10));
        assert!(h.engine.borrow().session().is_none());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_busy_engine_rearms_preview(_: &mut UsingLogger) {
        let h = harness();
        h.start(RecallDifficulty::ThreePairs);

        {
            let held = h.engine.borrow();
            h.scheduler.advance(Duration::from_secs(1));
            assert_eq!(held.session().unwrap().preview_seconds_remaining, 5);
            assert!(held.has_pending_timers());
            assert_eq!(h.scheduler.pending_count(), 1);
        }

        h.scheduler.advance(Duration::from_secs(1));
        assert_eq!(h.session().preview_seconds_remaining, 4);

        h.scheduler.advance(Duration::from_secs(4));
        assert_eq!(h.session().phase(), RecallPhase::Playing);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_busy_engine_rearms_resolution(_: &mut UsingLogger) {
        let h = harness();
        h.start(RecallDifficulty::ThreePairs);
        h.finish_preview();
        let key = h.session().cards[0].pair_key.clone();
        let (a, b) = h.pair(&key);
        h.flip(a);
        h.flip(b);

        {
            let _held = h.engine.borrow();
            h.scheduler.advance(Duration::from_secs(1));
        }
        assert_eq!(h.session().matched_pairs, 0);
        assert!(h.engine.borrow().has_pending_timers());

        h.scheduler.advance(Duration::from_secs(1));
        assert_eq!(h.session().matched_pairs, 1);
        assert!(!h.engine.borrow().has_pending_timers());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_completion_records_stats(_: &mut UsingLogger) {
        let storage = MemoryStorage::new();
        let scheduler = Rc::new(ManualScheduler::new());
        let (emitter, _observer) = Channel::<RecallEngineEvent>::new();
        let engine = RecallEngine::new(
            StatsManager::load(Box::new(storage.clone())),
            scheduler.clone(),
            scheduler.clone(),
            emitter,
            &Settings::default(),
        );
        let session = engine
            .borrow_mut()
            .new_game_seeded(RecallDifficulty::ThreePairs, Theme::Things, Some(5));
        scheduler.advance(Duration::from_secs(5));

        for key in Theme::Things.image_keys().iter().take(3) {
            let ids: Vec<CardId> = session
                .cards
                .iter()
                .filter(|card| card.pair_key == *key)
                .map(|card| card.id)
                .collect();
            engine.borrow_mut().flip_card(ids[0]);
            engine.borrow_mut().flip_card(ids[1]);
            scheduler.advance(Duration::from_secs(1));
        }

        let engine = engine.borrow();
        assert_eq!(engine.phase(), Some(RecallPhase::Completed));
        let stats = engine.stats();
        assert_eq!(stats.games_completed, 1);
        assert_eq!(stats.best_moves_for(RecallDifficulty::ThreePairs), Some(3));
        assert_eq!(stats.best_time_for(RecallDifficulty::ThreePairs), Some(3));
        assert!(storage.contents().unwrap().contains("\"bestMoves\""));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_dropped_engine_ignores_timers(_: &mut UsingLogger) {
        let h = harness();
        h.start(RecallDifficulty::ThreePairs);
        let Harness {
            engine, scheduler, ..
        } = h;
        drop(engine);

        assert_eq!(scheduler.pending_count(), 0);
        scheduler.advance(Duration::from_secs(10));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_commands_through_channel(_: &mut UsingLogger) {
        let h = harness();
        let (commands, command_observer) = Channel::<RecallCommand>::new();
        RecallEngine::wire_commands(&h.engine, command_observer);

        commands.emit(RecallCommand::NewGame(RecallDifficulty::FourPairs, Theme::Things));
        assert_eq!(h.session().cards.len(), 8);
        assert_eq!(h.session().theme, Theme::Things);

        commands.emit(RecallCommand::Cleanup);
        assert_eq!(h.scheduler.pending_count(), 0);
    }
}
