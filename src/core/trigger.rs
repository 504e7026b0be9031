//! Scroll-linked triggers.
//!
//! A trigger watches a span of scroll positions `[start, end]` and reports
//! progress through it plus edge events as the scroll position crosses its
//! boundaries.  The triggers never read a scroll position themselves; they
//! ask a [`ScrollerProxy`] on every update, so whichever source is
//! authoritative at that moment (smooth-scroll engine or raw document) is
//! the one they see.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::choreo::pin_progress;

/// Viewport rectangle reported by the scroller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Stand-in for "the page's scroll position" handed to the trigger system.
pub trait ScrollerProxy {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&self, value: f64);
    fn bounding_rect(&self) -> Rect;
}

/// Where in the viewport an element's top must be for the trigger to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Element top meets viewport top ("top top").
    #[default]
    Top,
    /// Element top meets viewport bottom ("top bottom").
    Bottom,
}

/// Registration parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSpec {
    /// Element top in page pixels.
    pub element_top: f64,
    /// Scroll distance the trigger spans once started.
    pub extent: f64,
    pub anchor: Anchor,
}

/// Boundary crossings reported by [`TriggerSystem::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Crossed `start` moving forward.
    Enter,
    /// Crossed `end` moving forward.
    Leave,
    /// Crossed `end` moving backward.
    EnterBack,
    /// Crossed `start` moving backward.
    LeaveBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Before,
    Active,
    After,
}

#[derive(Debug, Clone)]
struct Trigger {
    spec: TriggerSpec,
    start: f64,
    end: f64,
    zone: Zone,
    progress: f64,
    events: Vec<TriggerEvent>,
}

impl Trigger {
    fn resolve(&mut self, rect: Rect) {
        let offset = match self.spec.anchor {
            Anchor::Top => rect.top,
            Anchor::Bottom => rect.top + rect.height,
        };
        self.start = (self.spec.element_top - offset).max(0.0);
        self.end = self.start + self.spec.extent.max(0.0);
    }

    fn zone_at(&self, scroll: f64) -> Zone {
        if scroll < self.start {
            Zone::Before
        } else if scroll > self.end || (self.end == self.start && scroll >= self.end) {
            Zone::After
        } else {
            Zone::Active
        }
    }

    fn apply(&mut self, scroll: f64) {
        let zone = self.zone_at(scroll);
        let events: &[TriggerEvent] = match (self.zone, zone) {
            (Zone::Before, Zone::Active) => &[TriggerEvent::Enter],
            (Zone::Before, Zone::After) => &[TriggerEvent::Enter, TriggerEvent::Leave],
            (Zone::Active, Zone::After) => &[TriggerEvent::Leave],
            (Zone::After, Zone::Active) => &[TriggerEvent::EnterBack],
            (Zone::After, Zone::Before) => &[TriggerEvent::EnterBack, TriggerEvent::LeaveBack],
            (Zone::Active, Zone::Before) => &[TriggerEvent::LeaveBack],
            _ => &[],
        };
        self.events.extend_from_slice(events);
        self.zone = zone;
        self.progress = pin_progress(scroll, self.start, self.end - self.start);
    }
}

/// Snapshot of one trigger after the latest update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerStatus {
    pub start: f64,
    pub end: f64,
    pub progress: f64,
    pub active: bool,
}

/// Registry of scroll-linked triggers bound to one scroller proxy.
#[derive(Default)]
pub struct TriggerSystem {
    scroller: Option<Rc<dyn ScrollerProxy>>,
    triggers: BTreeMap<TriggerId, Trigger>,
    next_id: u64,
    refreshes: u64,
    last_scroll: f64,
}

impl TriggerSystem {
    /// A scroller is attached; visuals are driven through triggers.
    pub fn is_attached(&self) -> bool {
        self.scroller.is_some()
    }

    /// Bind the proxy every update reads through.  Rebinding recomputes every
    /// boundary.
    pub fn set_scroller(&mut self, scroller: Rc<dyn ScrollerProxy>) {
        self.scroller = Some(scroller);
        self.refresh();
    }

    /// How many full boundary recomputations have happened.
    #[cfg(test)]
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    /// Scroll position seen by the latest update.
    #[cfg(test)]
    pub fn last_scroll(&self) -> f64 {
        self.last_scroll
    }

    /// Recompute every trigger's start/end from the scroller's bounding rect
    /// (after resize or re-binding).
    pub fn refresh(&mut self) {
        self.refreshes += 1;
        let rect = self.rect();
        for trigger in self.triggers.values_mut() {
            trigger.resolve(rect);
        }
        tracing::debug!(
            triggers = self.len(),
            refreshes = self.refreshes,
            "trigger boundaries refreshed"
        );
    }

    pub fn register(&mut self, spec: TriggerSpec) -> TriggerId {
        let id = TriggerId(self.next_id);
        self.next_id += 1;
        let mut trigger = Trigger {
            spec,
            start: 0.0,
            end: 0.0,
            zone: Zone::Before,
            progress: 0.0,
            events: Vec::new(),
        };
        trigger.resolve(self.rect());
        self.triggers.insert(id, trigger);
        id
    }

    /// Remove a trigger.  Returns `false` if it was already gone.
    pub fn kill(&mut self, id: TriggerId) -> bool {
        self.triggers.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Read the scroller once and re-evaluate every trigger.  Without a
    /// scroller nothing happens.
    pub fn update(&mut self) {
        let Some(scroller) = &self.scroller else {
            return;
        };
        let scroll = scroller.scroll_top();
        if scroll != self.last_scroll {
            tracing::trace!(from = self.last_scroll, to = scroll, "scroller moved");
        }
        self.last_scroll = scroll;
        for trigger in self.triggers.values_mut() {
            trigger.apply(scroll);
        }
    }

    pub fn status(&self, id: TriggerId) -> Option<TriggerStatus> {
        self.triggers.get(&id).map(|t| TriggerStatus {
            start: t.start,
            end: t.end,
            progress: t.progress,
            active: t.zone == Zone::Active,
        })
    }

    /// Take the events recorded for `id` since the last drain.
    pub fn drain_events(&mut self, id: TriggerId) -> Vec<TriggerEvent> {
        self.triggers
            .get_mut(&id)
            .map(|t| std::mem::take(&mut t.events))
            .unwrap_or_default()
    }

    /// Ask the scroller to move (e.g. "jump to section").
    pub fn scroll_to(&self, value: f64) {
        if let Some(scroller) = &self.scroller {
            scroller.set_scroll_top(value);
        }
    }

    fn rect(&self) -> Rect {
        self.scroller
            .as_ref()
            .map(|s| s.bounding_rect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct FixedScroller {
        top: Cell<f64>,
        height: f64,
    }

    impl ScrollerProxy for FixedScroller {
        fn scroll_top(&self) -> f64 {
            self.top.get()
        }
        fn set_scroll_top(&self, value: f64) {
            self.top.set(value);
        }
        fn bounding_rect(&self) -> Rect {
            Rect {
                top: 0.0,
                left: 0.0,
                width: 1200.0,
                height: self.height,
            }
        }
    }

    fn system() -> (TriggerSystem, Rc<FixedScroller>) {
        let scroller = Rc::new(FixedScroller {
            top: Cell::new(0.0),
            height: 800.0,
        });
        let mut sys = TriggerSystem::default();
        sys.set_scroller(scroller.clone());
        (sys, scroller)
    }

    #[test]
    fn forward_and_backward_crossings_emit_events() {
        let (mut sys, scroller) = system();
        let id = sys.register(TriggerSpec {
            element_top: 1000.0,
            extent: 500.0,
            anchor: Anchor::Top,
        });

        for (top, expected) in [
            (500.0, vec![]),
            (1200.0, vec![TriggerEvent::Enter]),
            (1600.0, vec![TriggerEvent::Leave]),
            (1400.0, vec![TriggerEvent::EnterBack]),
            (900.0, vec![TriggerEvent::LeaveBack]),
        ] {
            scroller.set_scroll_top(top);
            sys.update();
            assert_eq!(sys.drain_events(id), expected, "at scroll {top}");
        }
    }

    #[test]
    fn progress_tracks_scroller_every_update() {
        let (mut sys, scroller) = system();
        let id = sys.register(TriggerSpec {
            element_top: 1000.0,
            extent: 400.0,
            anchor: Anchor::Top,
        });
        scroller.set_scroll_top(1100.0);
        sys.update();
        assert_eq!(sys.status(id).map(|s| s.progress), Some(0.25));

        scroller.set_scroll_top(1300.0);
        sys.update();
        let status = sys.status(id).expect("registered");
        assert_eq!(status.progress, 0.75);
        assert!(status.active);
    }

    #[test]
    fn bottom_anchor_starts_a_viewport_earlier() {
        let (mut sys, _scroller) = system();
        let id = sys.register(TriggerSpec {
            element_top: 1000.0,
            extent: 0.0,
            anchor: Anchor::Bottom,
        });
        assert_eq!(sys.status(id).map(|s| s.start), Some(200.0));
    }

    #[test]
    fn jump_skipping_span_emits_both_edges() {
        let (mut sys, scroller) = system();
        let id = sys.register(TriggerSpec {
            element_top: 100.0,
            extent: 50.0,
            anchor: Anchor::Top,
        });
        sys.scroll_to(5000.0);
        sys.update();
        assert_eq!(scroller.scroll_top(), 5000.0);
        assert_eq!(
            sys.drain_events(id),
            vec![TriggerEvent::Enter, TriggerEvent::Leave]
        );
    }

    #[test]
    fn unattached_system_does_nothing() {
        let mut sys = TriggerSystem::default();
        let id = sys.register(TriggerSpec {
            element_top: 0.0,
            extent: 10.0,
            anchor: Anchor::Top,
        });
        sys.update();
        assert!(!sys.is_attached());
        assert!(sys.drain_events(id).is_empty());
        assert!(sys.kill(id));
        assert!(!sys.kill(id));
    }
}
