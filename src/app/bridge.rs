//! Trigger proxy bridge.
//!
//! The trigger system asks "where is the page?" through [`ScrollerProxy`].
//! The bridge answers with the smooth-scroll engine's virtual offset when an
//! engine is live and with the raw document scroll otherwise; writes go to
//! whichever of the two is authoritative.  Nothing is cached, so a read can
//! never be a frame behind the store.

use std::cell::Cell;
use std::rc::Rc;

use crate::core::engine::ScrollTo;
use crate::core::trigger::{Rect, ScrollerProxy};

use super::store::EngineStore;

/// Viewport size in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// The raw (native, unsmoothed) document scroll model.
#[derive(Debug, Default)]
pub struct Document {
    scroll_top: Cell<f64>,
    scroll_height: Cell<f64>,
    viewport: Cell<Viewport>,
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            scroll_top: Cell::new(0.0),
            scroll_height: Cell::new(0.0),
            viewport: Cell::new(viewport),
        }
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top.get()
    }

    /// Native scrolling clamps to the scrollable range.
    pub fn set_scroll_top(&self, value: f64) {
        if value.is_finite() {
            self.scroll_top.set(value.clamp(0.0, self.max_scroll()));
        }
    }

    pub fn scroll_height(&self) -> f64 {
        self.scroll_height.get()
    }

    pub fn set_scroll_height(&self, height: f64) {
        self.scroll_height
            .set(if height.is_finite() { height.max(0.0) } else { 0.0 });
        self.set_scroll_top(self.scroll_top());
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
        self.set_scroll_top(self.scroll_top());
    }

    /// Largest native scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height() - self.viewport().height).max(0.0)
    }
}

/// Scroller proxy backed by the engine store, falling back to the document.
pub struct TriggerBridge {
    store: Rc<EngineStore>,
    document: Rc<Document>,
}

impl TriggerBridge {
    pub fn new(store: Rc<EngineStore>, document: Rc<Document>) -> Self {
        Self { store, document }
    }
}

impl ScrollerProxy for TriggerBridge {
    fn scroll_top(&self) -> f64 {
        match self.store.get_snapshot() {
            Some(engine) => engine.offset(),
            None => self.document.scroll_top(),
        }
    }

    fn set_scroll_top(&self, value: f64) {
        match self.store.get_snapshot() {
            Some(engine) => engine.scroll_to(value, ScrollTo::IMMEDIATE),
            None => self.document.set_scroll_top(value),
        }
    }

    fn bounding_rect(&self) -> Rect {
        let viewport = self.document.viewport();
        Rect {
            top: 0.0,
            left: 0.0,
            width: viewport.width,
            height: viewport.height,
        }
    }
}
