//! Game cores for two browser mini-games, Sudoku and Picture-Recall, with no
//! UI attached. A host drives the engines with intents, gives them a clock
//! and a timer scheduler, and listens for their events.

pub mod events;
pub mod game;
pub mod model;
pub mod scheduler;

pub use game::{RecallEngine, Settings, StatsManager, SudokuEngine};
pub use scheduler::{Clock, ManualScheduler, Scheduler, SystemClock, TimerHandle};

#[cfg(test)]
mod tests {
    use std::sync::Once;
    use test_context::TestContext;

    static INIT_LOGGER: Once = Once::new();

    pub struct UsingLogger;

    impl TestContext for UsingLogger {
        fn setup() -> UsingLogger {
            INIT_LOGGER.call_once(|| {
                let _ = env_logger::builder().is_test(true).try_init();
            });
            UsingLogger
        }

        fn teardown(self) {}
    }
}
