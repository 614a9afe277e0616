//! Timer and clock capabilities injected into the game engines.
//!
//! Engines never sleep or spawn anything themselves: they ask a [`Scheduler`]
//! to run a callback later and keep the returned [`TimerHandle`] so the
//! callback can be cancelled. A host UI backs these with its own main-loop
//! timers; [`ManualScheduler`] drives them from virtual time.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use log::trace;

pub type TimerCallback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

pub trait Clock {
    fn now(&self) -> SystemTime;
}

pub trait Scheduler {
    /// Run `callback` once, `after` from now.
    fn schedule(&self, after: Duration, callback: TimerCallback) -> TimerHandle;

    /// Returns false when the timer already fired or was cancelled.
    fn cancel(&self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Single-threaded virtual-time scheduler. Time only moves when
/// [`ManualScheduler::advance`] is called.
pub struct ManualScheduler {
    now: Cell<SystemTime>,
    next_id: Cell<u64>,
    // keyed by (due time, id) so equal due times fire in scheduling order
    pending: RefCell<BTreeMap<(SystemTime, u64), TimerCallback>>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::starting_at(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000))
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now: SystemTime) -> Self {
        Self {
            now: Cell::new(now),
            next_id: Cell::new(0),
            pending: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Move time forward, firing every callback that falls due on the way.
    /// While a callback runs, the clock reads its due time; callbacks may
    /// schedule or cancel further timers.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let due = self
                .pending
                .borrow()
                .keys()
                .next()
                .copied()
                .filter(|(due, _)| *due <= target);
            let Some(key) = due else {
                break;
            };
            let callback = self.pending.borrow_mut().remove(&key);
            if let Some(callback) = callback {
                trace!(target: "scheduler", "Firing timer {}", key.1);
                self.now.set(key.0);
                callback();
            }
        }
        self.now.set(target);
    }
}

impl Clock for ManualScheduler {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, after: Duration, callback: TimerCallback) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.pending
            .borrow_mut()
            .insert((self.now.get() + after, id), callback);
        trace!(target: "scheduler", "Scheduled timer {} in {:?}", id, after);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut pending = self.pending.borrow_mut();
        let key = pending.keys().find(|(_, id)| *id == handle.0).copied();
        match key {
            Some(key) => {
                trace!(target: "scheduler", "Cancelled timer {}", handle.0);
                pending.remove(&key).is_some()
            }
            None => false,
        }
    }
}
