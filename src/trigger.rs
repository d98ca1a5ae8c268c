//! Edge-triggered change notification, with fan-in over multiple sources.
//!
//! A plain monotonic counter behind a `Mutex` + `Condvar`: subscribers only
//! care *that* something changed, not *what*.

use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};
use signal_hook::iterator::Signals;

struct Inner {
    counter: Mutex<u64>,
    condvar: Condvar,
}

/// A change counter that can be notified and subscribed to.
#[derive(Clone)]
pub struct Trigger(Arc<Inner>);

impl Trigger {
    pub fn new() -> Self {
        Self(Arc::new(Inner {
            counter: Mutex::new(0),
            condvar: Condvar::new(),
        }))
    }

    /// Increment the counter and wake every waiter. Multiple notifies between
    /// two `wait()` calls coalesce into a single wake-up for each subscriber.
    pub fn notify(&self) {
        let mut counter = self.0.counter.lock();
        *counter = counter.wrapping_add(1);
        self.0.condvar.notify_all();
    }

    /// Snapshot the current counter; a subscriber created before a `notify()`
    /// is guaranteed to observe it on its next `wait()`.
    pub fn subscribe(&self) -> Subscription {
        let snapshot = *self.0.counter.lock();
        Subscription {
            inner: self.0.clone(),
            snapshot,
        }
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time view of a [`Trigger`]'s counter.
pub struct Subscription {
    inner: Arc<Inner>,
    snapshot: u64,
}

impl Subscription {
    /// Block until the counter differs from the last observed snapshot, then
    /// adopt the new value.
    pub fn wait(&mut self) {
        let mut counter = self.inner.counter.lock();
        while *counter == self.snapshot {
            self.inner.condvar.wait(&mut counter);
        }
        self.snapshot = *counter;
    }
}

/// Build a `Subscription` that wakes when any of `subscriptions` would have
/// woken. One background thread per input, each looping `wait(); notify()`
/// into a shared internal trigger.
pub fn any_subscription(subscriptions: Vec<Subscription>) -> Subscription {
    let trigger = Trigger::new();
    for mut input in subscriptions {
        let trigger = trigger.clone();
        thread::spawn(move || loop {
            input.wait();
            trigger.notify();
        });
    }
    trigger.subscribe()
}

/// Build a `Subscription` that fires on delivery of any of `signals`. One
/// background thread iterates the signal stream and notifies a trigger.
pub fn signal_subscription(signals: &[std::ffi::c_int]) -> std::io::Result<Subscription> {
    let mut source = Signals::new(signals.iter().copied())?;
    let trigger = Trigger::new();
    let result = trigger.subscribe();
    let notifier = trigger;
    thread::spawn(move || {
        for _ in source.forever() {
            notifier.notify();
        }
    });
    Ok(result)
}
