//! Single-threaded event emitter with cancellable subscriptions.
//!
//! Subscribers may cancel themselves (or any other subscriber) and may add
//! new subscribers while an event is being emitted.  A subscriber cancelled
//! mid-emit is not invoked for the rest of that emit; one added mid-emit
//! first sees the next event.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<E> = Box<dyn FnMut(&E)>;

struct Slot<E> {
    id: u64,
    /// `None` while the callback is executing.
    callback: Option<Callback<E>>,
}

struct Slots<E> {
    slots: Vec<Slot<E>>,
    next_id: u64,
}

/// Type-erased removal so a [`Subscription`] does not carry the event type.
trait Unsubscribe {
    fn unsubscribe(&self, id: u64);
}

impl<E> Unsubscribe for RefCell<Slots<E>> {
    fn unsubscribe(&self, id: u64) {
        self.borrow_mut().slots.retain(|s| s.id != id);
    }
}

/// A cloneable handle to a shared subscriber list.
pub struct Emitter<E> {
    inner: Rc<RefCell<Slots<E>>>,
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Emitter<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slots {
                slots: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a callback.  It runs after every subscriber registered
    /// before it.
    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.slots.push(Slot {
                id,
                callback: Some(Box::new(callback)),
            });
            id
        };
        let weak: Weak<RefCell<Slots<E>>> = Rc::downgrade(&self.inner);
        let weak: Weak<dyn Unsubscribe> = weak;
        Subscription {
            id,
            owner: Some(weak),
        }
    }

    /// Deliver `event` to every live subscriber in subscription order.
    pub fn emit(&self, event: &E) {
        let ids: Vec<u64> = self.inner.borrow().slots.iter().map(|s| s.id).collect();
        for id in ids {
            // The borrow is released before the callback runs so that the
            // callback may subscribe or cancel freely.
            let taken = self
                .inner
                .borrow_mut()
                .slots
                .iter_mut()
                .find(|s| s.id == id)
                .and_then(|s| s.callback.take());
            let Some(mut callback) = taken else {
                continue;
            };
            callback(event);
            if let Some(slot) = self.inner.borrow_mut().slots.iter_mut().find(|s| s.id == id) {
                slot.callback = Some(callback);
            }
        }
    }

    /// Number of live subscribers.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`Emitter::subscribe`].
///
/// Dropping the handle does *not* unsubscribe; owners call [`cancel`] from
/// their teardown so removal is always explicit.
///
/// [`cancel`]: Subscription::cancel
pub struct Subscription {
    id: u64,
    owner: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    /// Remove the callback.  Safe to call any number of times, and after the
    /// emitter itself has been dropped.
    pub fn cancel(&mut self) {
        if let Some(owner) = self.owner.take().and_then(|w| w.upgrade()) {
            owner.unsubscribe(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.owner.as_ref().is_some_and(|w| w.strong_count() > 0)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
