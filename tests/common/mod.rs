use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use mindgames::events::{Channel, EventEmitter};
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
}

pub type Recorded<T> = Rc<RefCell<Vec<T>>>;

/// A channel whose events are collected for later assertions.
pub fn recording_channel<T: std::fmt::Debug + Clone + 'static>() -> (EventEmitter<T>, Recorded<T>) {
    let (emitter, observer) = Channel::<T>::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    observer.subscribe(move |event: &T| sink.borrow_mut().push(event.clone()));
    (emitter, events)
}
