//! Listener registries and RAII subscriptions.
//!
//! Every registration hands back a [`Subscription`]; dropping it removes the
//! listener.  Views keep their subscriptions next to the state the listeners
//! mutate, so tearing the view down can never leave a live listener behind.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// What a listener wants done with the event after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Continue,
    /// Cancel the event's default action (e.g. native scrolling).
    PreventDefault,
}

impl Disposition {
    fn merge(self, other: Disposition) -> Disposition {
        if self == Disposition::PreventDefault || other == Disposition::PreventDefault {
            Disposition::PreventDefault
        } else {
            Disposition::Continue
        }
    }
}

/// Guard that runs its teardown exactly once, when dropped.
#[must_use = "dropping a Subscription immediately removes the listener"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.teardown.is_some())
            .finish()
    }
}

type Handler<E> = Rc<dyn Fn(&E) -> Disposition>;

struct Registry<E> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(u64, Handler<E>)>>,
}

/// A set of listeners for events of type `E`.  Cloning shares the set.
pub struct Listeners<E> {
    registry: Rc<Registry<E>>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(1),
                handlers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.registry.handlers.borrow().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every listener in registration order.  The handler
    /// list is snapshotted first, so listeners may subscribe or unsubscribe
    /// while the event is being delivered.
    pub fn dispatch(&self, event: &E) -> Disposition {
        let handlers: Vec<Handler<E>> = self
            .registry
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        handlers
            .iter()
            .fold(Disposition::Continue, |acc, h| acc.merge(h(event)))
    }
}

impl<E: 'static> Listeners<E> {
    pub fn listen(&self, handler: impl Fn(&E) -> Disposition + 'static) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));

        let registry: Weak<Registry<E>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.handlers.borrow_mut().retain(|(hid, _)| *hid != id);
            }
        })
    }
}
