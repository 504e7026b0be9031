//! Navigation port.
//!
//! Gates ask for "the next page" through [`Navigator`]; the request is
//! fire-and-forget.  The router only records it; the handler applies the
//! route change once the current event has finished dispatching, so a gate
//! is never torn down from inside its own listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Local};

/// Identifies a section within the current page.
pub type SectionId = usize;

/// Outbound navigation capability handed to gates.
pub trait Navigator {
    fn advance(&self, from: SectionId);
}

/// One entry of the route history.
#[derive(Debug, Clone)]
pub struct RouteVisit {
    pub route: usize,
    pub at: DateTime<Local>,
    /// Section whose gate requested the change, if any.
    pub via: Option<SectionId>,
}

/// Route index keeper and [`Navigator`] implementation.
#[derive(Debug)]
pub struct Router {
    route_count: usize,
    current: Cell<usize>,
    pending: Cell<Option<(usize, Option<SectionId>)>>,
    history: RefCell<Vec<RouteVisit>>,
}

impl Router {
    pub fn new(route_count: usize) -> Self {
        Self {
            route_count: route_count.max(1),
            current: Cell::new(0),
            pending: Cell::new(None),
            history: RefCell::new(Vec::new()),
        }
    }

    pub fn current(&self) -> usize {
        self.current.get()
    }

    /// Request a specific route (reload, jump).  The first request wins until
    /// it is taken.
    pub fn request(&self, route: usize) {
        self.queue(route % self.route_count, None);
    }

    /// Take the pending route change, if any.
    pub fn take_pending(&self) -> Option<(usize, Option<SectionId>)> {
        self.pending.take()
    }

    /// Record that `route` is now mounted.
    pub fn commit(&self, route: usize, via: Option<SectionId>) {
        self.current.set(route);
        self.history.borrow_mut().push(RouteVisit {
            route,
            at: Local::now(),
            via,
        });
    }

    pub fn history(&self) -> Vec<RouteVisit> {
        self.history.borrow().clone()
    }

    fn queue(&self, route: usize, via: Option<SectionId>) {
        if self.pending.get().is_some() {
            tracing::debug!(route, "navigation already pending; request dropped");
            return;
        }
        self.pending.set(Some((route, via)));
    }
}

impl Navigator for Router {
    fn advance(&self, from: SectionId) {
        let next = (self.current() + 1) % self.route_count;
        tracing::info!(from_section = from, next, "advance to next page");
        self.queue(next, Some(from));
    }
}

/// Shared readout of the active gate's progress (0–100), handed to the gate
/// as a capability so the navigation bar can react without looking the gate
/// up.
#[derive(Debug, Clone, Default)]
pub struct NavIndicator(Rc<Cell<f64>>);

impl NavIndicator {
    pub fn set(&self, progress: f64) {
        self.0.set(progress.clamp(0.0, 100.0));
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }
}
