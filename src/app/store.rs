//! The smooth-scroll engine singleton and the store that exposes it.
//!
//! At most one engine is live at a time.  Consumers never hold the engine
//! directly; they `subscribe` to the store and read `get_snapshot()`, which
//! always reflects the latest `create`/`destroy` because both publish before
//! they return.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::core::engine::{EngineConfig, ScrollState, ScrollTo, SmoothScroll};

use super::listeners::{Disposition, Listeners, Subscription};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("smooth-scroll engine #{live} is still live; destroy it before creating another")]
    AlreadyLive { live: u64 },
}

/// Shared reference to the live engine.  Equality is identity.
#[derive(Clone)]
pub struct EngineHandle {
    id: u64,
    engine: Rc<RefCell<SmoothScroll>>,
}

impl EngineHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> ScrollState {
        self.engine.borrow().state()
    }

    pub fn offset(&self) -> f64 {
        self.engine.borrow().offset()
    }

    pub fn limit(&self) -> f64 {
        self.engine.borrow().limit()
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.engine.borrow().target()
    }

    pub fn scroll_to(&self, offset: f64, opts: ScrollTo) {
        self.engine.borrow_mut().scroll_to(offset, opts);
    }

    pub fn on_wheel(&self, delta_px: f64) {
        self.engine.borrow_mut().on_wheel(delta_px);
    }

    pub fn set_limit(&self, limit: f64) {
        self.engine.borrow_mut().set_limit(limit);
    }

    /// Integrate one frame.  Only the engine's own frame loop calls this.
    pub(crate) fn tick(&self, dt: f64) -> ScrollState {
        self.engine.borrow_mut().tick(dt)
    }
}

impl PartialEq for EngineHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.engine, &other.engine)
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

/// Subscribe/snapshot store for the engine singleton.
pub struct EngineStore {
    current: RefCell<Option<EngineHandle>>,
    listeners: Listeners<()>,
    next_engine: Cell<u64>,
}

impl Default for EngineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineStore {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(None),
            listeners: Listeners::new(),
            next_engine: Cell::new(1),
        }
    }

    /// Register `callback` to run whenever the snapshot may have changed
    /// (create, destroy, and every published frame).
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let sub = self.listeners.listen(move |_| {
            callback();
            Disposition::Continue
        });
        tracing::trace!(subscribers = self.subscriber_count(), "store subscriber added");
        sub
    }

    pub fn get_snapshot(&self) -> Option<EngineHandle> {
        self.current.borrow().clone()
    }

    /// Snapshot for contexts without a frame loop: there is never an engine.
    pub fn get_server_snapshot() -> Option<EngineHandle> {
        None
    }

    #[cfg(test)]
    pub fn is_live(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Create the engine.  Rejected while another one is live.
    pub fn create(&self, config: EngineConfig, limit: f64) -> Result<EngineHandle, EngineError> {
        if let Some(live) = self.current.borrow().as_ref() {
            return Err(EngineError::AlreadyLive { live: live.id });
        }
        let id = self.next_engine.get();
        self.next_engine.set(id + 1);
        let handle = EngineHandle {
            id,
            engine: Rc::new(RefCell::new(SmoothScroll::new(config, limit))),
        };
        *self.current.borrow_mut() = Some(handle.clone());
        tracing::debug!(engine = id, limit, "smooth-scroll engine created");
        self.notify();
        Ok(handle)
    }

    /// Retire the live engine, publishing `None` before returning.
    pub fn destroy(&self) -> Option<EngineHandle> {
        let retired = self.current.borrow_mut().take();
        if let Some(handle) = &retired {
            tracing::debug!(engine = handle.id, "smooth-scroll engine destroyed");
            self.notify();
        }
        retired
    }

    /// Tell subscribers the snapshot (or its state) changed.
    pub fn notify(&self) {
        self.listeners.dispatch(&());
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_current_inside_create_and_destroy() {
        let store = Rc::new(EngineStore::new());
        let seen: Rc<RefCell<Vec<Option<u64>>>> = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&store);
        let log = Rc::clone(&seen);
        let _sub = store.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                log.borrow_mut().push(store.get_snapshot().map(|h| h.id()));
            }
        });

        let handle = store.create(EngineConfig::default(), 500.0).expect("first create");
        assert_eq!(store.get_snapshot(), Some(handle.clone()));
        assert_eq!(*seen.borrow(), vec![Some(handle.id())]);

        store.destroy();
        assert_eq!(store.get_snapshot(), None);
        assert_eq!(*seen.borrow(), vec![Some(handle.id()), None]);
    }

    #[test]
    fn create_while_live_is_rejected() {
        let store = EngineStore::new();
        let first = store.create(EngineConfig::default(), 100.0).expect("first create");
        let err = store.create(EngineConfig::default(), 100.0).unwrap_err();
        assert_eq!(err, EngineError::AlreadyLive { live: first.id() });
        assert_eq!(store.get_snapshot(), Some(first));
    }

    #[test]
    fn recreate_after_destroy_yields_fresh_engine() {
        let store = EngineStore::new();
        let first = store.create(EngineConfig::default(), 100.0).expect("create");
        first.scroll_to(80.0, ScrollTo::IMMEDIATE);
        assert!(store.destroy().is_some());
        assert!(store.destroy().is_none());

        let second = store.create(EngineConfig::default(), 100.0).expect("recreate");
        assert_ne!(first, second);
        assert_eq!(second.offset(), 0.0);
    }

    #[test]
    fn server_snapshot_is_always_empty() {
        let store = EngineStore::new();
        let _live = store.create(EngineConfig::default(), 10.0);
        assert!(EngineStore::get_server_snapshot().is_none());
    }

    #[test]
    fn unsubscribed_callbacks_stop_firing() {
        let store = EngineStore::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = store.subscribe(move || h.set(h.get() + 1));
        store.notify();
        drop(sub);
        store.notify();
        assert_eq!(hits.get(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }
}
