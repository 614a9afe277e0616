use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

struct Listeners<T> {
    callbacks: RefCell<BTreeMap<SubscriptionId, Callback<T>>>,
    next_id: Cell<SubscriptionId>,
}

/// Sending half of a [`Channel`]; held by an engine.
pub struct EventEmitter<T: std::fmt::Debug> {
    listeners: Rc<Listeners<T>>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

/// Receiving half of a [`Channel`]; handed to the host UI.
pub struct EventObserver<T: std::fmt::Debug> {
    listeners: Rc<Listeners<T>>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

/// Removes one subscription. Dropping it without calling
/// [`Unsubscriber::unsubscribe`] leaves the listener attached.
pub struct Unsubscriber<T> {
    listeners: Weak<Listeners<T>>,
    id: SubscriptionId,
}

impl<T> Unsubscriber<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn unsubscribe(self) -> bool {
        match self.listeners.upgrade() {
            Some(listeners) => listeners.callbacks.borrow_mut().remove(&self.id).is_some(),
            None => false,
        }
    }
}

pub struct Channel<T: std::fmt::Debug> {
    _event: PhantomData<T>,
}

impl<T: std::fmt::Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let listeners = Rc::new(Listeners {
            callbacks: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(0),
        });
        (
            EventEmitter {
                listeners: Rc::clone(&listeners),
            },
            EventObserver { listeners },
        )
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    /// Listeners run in subscription order. The listener set is snapshotted
    /// first, so a listener may subscribe or unsubscribe while handling.
    pub fn emit(&self, data: T) {
        let callbacks: Vec<Callback<T>> =
            self.listeners.callbacks.borrow().values().cloned().collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", callbacks.len(), data);
        for callback in callbacks {
            callback(&data);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.callbacks.borrow().len()
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        self.listeners
            .callbacks
            .borrow_mut()
            .insert(id, Rc::new(callback));
        Unsubscriber {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }
}
