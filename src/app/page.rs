//! A mounted page: section layout plus the per-section behaviours.
//!
//! Mounting wires every behaviour to its input source and records the
//! handle needed to undo it (listener subscriptions, frame callbacks,
//! triggers).  [`Page::unmount`] releases all of them; nothing a page
//! registers outlives it.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::core::choreo::{CardTrack, Choreography, Vec2};
use crate::core::frame::{FrameId, FrameScheduler, Phase};
use crate::core::gate::{GateOutcome, ProgressGate};
use crate::core::spring::{Bounds, PointerSpring, SpringConfig, SpringVisual};
use crate::core::trigger::{Anchor, TriggerEvent, TriggerId, TriggerSpec, TriggerSystem};
use crate::core::wheel::WheelEvent;

use super::bridge::Viewport;
use super::listeners::{Disposition, Listeners, Subscription};
use super::router::{NavIndicator, Navigator, SectionId};
use super::scene::{PinVisual, Scene};
use super::site::{PageSpec, SectionKind};

/// Card footprint in page pixels.
pub const CARD_WIDTH: f64 = 140.0;
pub const CARD_HEIGHT: f64 = 100.0;
/// Button footprint in page pixels.
pub const BUTTON_WIDTH: f64 = 160.0;
pub const BUTTON_HEIGHT: f64 = 60.0;

/// Share of a section (or of the viewport, if smaller) that must be visible
/// for it to count as intersecting.
const INTERSECTION_THRESHOLD: f64 = 0.5;

// ───────────────────────────────────────── layout ────────────

/// Resolved position of one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub id: SectionId,
    pub title: &'static str,
    /// Page-pixel top.
    pub top: f64,
    /// Total height including any pin spacer.
    pub height: f64,
    pub kind: SectionKind,
}

impl SectionLayout {
    /// Scroll distance consumed while pinned (zero for unpinned sections).
    pub fn pin_extent(&self) -> f64 {
        match self.kind {
            SectionKind::Cards { extent, .. } => extent.max(0.0),
            _ => 0.0,
        }
    }

    /// Top of the section's content at `scroll`, accounting for pinning.
    pub fn content_top(&self, scroll: f64) -> f64 {
        self.top + (scroll - self.top).clamp(0.0, self.pin_extent())
    }
}

/// Total page height once every section (and pin spacer) is stacked.
pub fn content_height(spec: &PageSpec) -> f64 {
    lay_out(spec).1
}

fn lay_out(spec: &PageSpec) -> (Vec<SectionLayout>, f64) {
    let mut top = 0.0;
    let mut sections = Vec::with_capacity(spec.sections.len());
    for (id, s) in spec.sections.iter().enumerate() {
        let spacer = match s.kind {
            SectionKind::Cards { extent, .. } => extent.max(0.0),
            _ => 0.0,
        };
        let height = s.height.max(0.0) + spacer;
        sections.push(SectionLayout {
            id,
            title: s.title,
            top,
            height,
            kind: s.kind.clone(),
        });
        top += height;
    }
    (sections, top)
}

// ───────────────────────────────────────── observer ──────────

/// Visibility change of one observed section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub section: SectionId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Reports sections entering and leaving the viewport.  Only changes are
/// reported; the first evaluation reports every observed section.
#[derive(Debug, Default)]
pub struct SectionObserver {
    targets: Vec<(SectionId, f64, f64)>,
    last: HashMap<SectionId, bool>,
}

impl SectionObserver {
    pub fn observe(&mut self, section: SectionId, top: f64, height: f64) {
        self.targets.push((section, top, height));
    }

    pub fn evaluate(&mut self, scroll: f64, viewport_height: f64) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for &(section, top, height) in &self.targets {
            let ratio = visible_ratio(top, height, scroll, viewport_height);
            let is_intersecting = ratio >= INTERSECTION_THRESHOLD;
            if self.last.get(&section) != Some(&is_intersecting) {
                self.last.insert(section, is_intersecting);
                entries.push(IntersectionEntry {
                    section,
                    is_intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}

fn visible_ratio(top: f64, height: f64, scroll: f64, viewport_height: f64) -> f64 {
    if !(height > 0.0 && viewport_height > 0.0) {
        return 0.0;
    }
    let overlap = (top + height).min(scroll + viewport_height) - top.max(scroll);
    (overlap.max(0.0) / height.min(viewport_height)).min(1.0)
}

// ───────────────────────────────────────── behaviours ────────

/// A navigable section's gate.
pub struct GateSlot {
    pub section: SectionId,
    gate: Rc<RefCell<ProgressGate>>,
}

impl GateSlot {
    pub fn gate(&self) -> ProgressGate {
        self.gate.borrow().clone()
    }
}

/// A pinned card section.
pub struct PinnedSlot {
    pub section: SectionId,
    pub trigger: TriggerId,
    pub choreography: Choreography,
    /// Forced resets so far (pin entered or left backwards).
    pub resets: u32,
}

/// A pointer-reactive button.
pub struct MagneticButton {
    pub section: SectionId,
    pub bounds: Bounds,
    pub spring: PointerSpring,
    frame: Option<FrameId>,
}

impl MagneticButton {
    #[cfg(test)]
    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }
}

/// Everything a page needs at mount time.
pub struct MountCtx<'a> {
    pub scheduler: &'a mut FrameScheduler<Scene>,
    pub triggers: &'a mut TriggerSystem,
    pub wheel: &'a Listeners<WheelEvent>,
    pub intersections: &'a Listeners<IntersectionEntry>,
    pub navigator: Rc<dyn Navigator>,
    pub indicator: NavIndicator,
    pub viewport: Viewport,
    pub gate_threshold: f64,
    pub spring: SpringConfig,
}

/// A mounted route.
pub struct Page {
    pub route: usize,
    pub title: &'static str,
    pub sections: Vec<SectionLayout>,
    pub gates: Vec<GateSlot>,
    pub pinned: Vec<PinnedSlot>,
    pub buttons: Vec<MagneticButton>,
    revealed: BTreeSet<SectionId>,
    /// One-shot entrance triggers for sections not yet revealed.
    reveals: Vec<(SectionId, TriggerId)>,
    observer: SectionObserver,
    frames: Vec<FrameId>,
    subscriptions: Vec<Subscription>,
}

impl Page {
    pub fn mount(route: usize, spec: &PageSpec, ctx: MountCtx<'_>) -> Self {
        let (sections, _) = lay_out(spec);
        let mut page = Page {
            route,
            title: spec.title,
            sections,
            gates: Vec::new(),
            pinned: Vec::new(),
            buttons: Vec::new(),
            revealed: BTreeSet::new(),
            reveals: Vec::new(),
            observer: SectionObserver::default(),
            frames: Vec::new(),
            subscriptions: Vec::new(),
        };

        for layout in page.sections.clone() {
            page.observer.observe(layout.id, layout.top, layout.height);
            // Entrance plays once the section's top reaches the viewport
            // bottom.
            let reveal = ctx.triggers.register(TriggerSpec {
                element_top: layout.top,
                extent: 0.0,
                anchor: Anchor::Bottom,
            });
            page.reveals.push((layout.id, reveal));
            match &layout.kind {
                SectionKind::Plain => {}
                SectionKind::Gate => page.mount_gate(&layout, &ctx),
                SectionKind::Cards { rotations, .. } => {
                    let trigger = ctx.triggers.register(TriggerSpec {
                        element_top: layout.top,
                        extent: layout.pin_extent(),
                        anchor: Anchor::Top,
                    });
                    page.pinned.push(PinnedSlot {
                        section: layout.id,
                        trigger,
                        choreography: Choreography::new(card_tracks(rotations, ctx.viewport)),
                        resets: 0,
                    });
                }
                SectionKind::Magnetic { buttons } => {
                    for bounds in button_bounds(&layout, *buttons, ctx.viewport) {
                        page.buttons.push(MagneticButton {
                            section: layout.id,
                            bounds,
                            spring: PointerSpring::new(ctx.spring),
                            frame: None,
                        });
                    }
                }
            }
        }

        if !page.sections.is_empty() {
            page.frames
                .push(ctx.scheduler.request(Phase::Render, |scene, _| {
                    reveal_sections(scene);
                    render_pins(scene);
                    ControlFlow::Continue(())
                }));
        }

        tracing::debug!(
            route,
            title = page.title,
            sections = page.sections.len(),
            gates = page.gates.len(),
            pins = page.pinned.len(),
            buttons = page.buttons.len(),
            "page mounted"
        );
        page
    }

    fn mount_gate(&mut self, layout: &SectionLayout, ctx: &MountCtx<'_>) {
        let section = layout.id;
        let gate = Rc::new(RefCell::new(ProgressGate::new(ctx.gate_threshold)));

        let (g, nav, indicator) = (Rc::clone(&gate), Rc::clone(&ctx.navigator), ctx.indicator.clone());
        self.subscriptions.push(ctx.wheel.listen(move |ev| {
            let outcome = g.borrow_mut().on_wheel(ev.delta_y);
            match outcome {
                GateOutcome::Progress(p) => indicator.set(p),
                GateOutcome::Advance => {
                    indicator.set(100.0);
                    tracing::info!(section, "gate threshold crossed");
                    nav.advance(section);
                }
                GateOutcome::Ignored | GateOutcome::Swallowed => {}
            }
            if outcome.prevents_default() {
                Disposition::PreventDefault
            } else {
                Disposition::Continue
            }
        }));

        let (g, indicator) = (Rc::clone(&gate), ctx.indicator.clone());
        self.subscriptions.push(ctx.intersections.listen(move |entry| {
            if entry.section == section {
                let mut gate = g.borrow_mut();
                if entry.is_intersecting {
                    gate.enter_view();
                } else {
                    gate.leave_view();
                }
                indicator.set(gate.progress());
            }
            Disposition::Continue
        }));

        self.gates.push(GateSlot { section, gate });
    }

    /// Release every listener, frame callback and trigger this page holds.
    pub fn unmount(self, scheduler: &mut FrameScheduler<Scene>, triggers: &mut TriggerSystem) {
        let mut cancelled = 0;
        for id in self.frames.iter().copied().chain(self.buttons.iter().filter_map(|b| b.frame)) {
            if scheduler.cancel(id) {
                cancelled += 1;
            }
        }
        for pin in &self.pinned {
            triggers.kill(pin.trigger);
        }
        for &(_, trigger) in &self.reveals {
            triggers.kill(trigger);
        }
        tracing::debug!(
            route = self.route,
            listeners = self.subscriptions.len(),
            frames = cancelled,
            "page unmounted"
        );
        // Dropping `self` drops every subscription.
    }

    /// Sections whose one-shot entrance has played.
    pub fn is_revealed(&self, section: SectionId) -> bool {
        self.revealed.contains(&section)
    }

    pub fn gate_for(&self, section: SectionId) -> Option<ProgressGate> {
        self.gates
            .iter()
            .find(|g| g.section == section)
            .map(GateSlot::gate)
    }

    /// Evaluate section visibility at `scroll`.
    pub fn observe(&mut self, scroll: f64, viewport_height: f64) -> Vec<IntersectionEntry> {
        self.observer.evaluate(scroll, viewport_height)
    }

    /// Pointer moved to page coordinates `(x, y)`.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, scheduler: &mut FrameScheduler<Scene>) {
        for (index, button) in self.buttons.iter_mut().enumerate() {
            let wants_frame = if button.bounds.contains(x, y) {
                button.spring.on_pointer_move(x, y, button.bounds)
            } else if button.spring.state().hovered {
                button.spring.on_pointer_leave()
            } else {
                false
            };
            if wants_frame {
                button.frame = Some(schedule_button(scheduler, index));
            }
        }
    }

    /// Pointer left the page entirely.
    pub fn on_pointer_leave(&mut self, scheduler: &mut FrameScheduler<Scene>) {
        for (index, button) in self.buttons.iter_mut().enumerate() {
            if button.spring.state().hovered && button.spring.on_pointer_leave() {
                button.frame = Some(schedule_button(scheduler, index));
            }
        }
    }

    /// Rebuild card tracks and button bounds for a new viewport.
    pub fn relayout(&mut self, viewport: Viewport) {
        for pin in &mut self.pinned {
            let progress = pin.choreography.progress();
            if let Some(SectionKind::Cards { rotations, .. }) =
                self.sections.get(pin.section).map(|s| &s.kind)
            {
                pin.choreography = Choreography::new(card_tracks(rotations, viewport));
                pin.choreography.set_progress(progress);
            }
        }
        let mut bounds_by_section: HashMap<SectionId, Vec<Bounds>> = HashMap::new();
        for layout in &self.sections {
            if let SectionKind::Magnetic { buttons } = layout.kind {
                bounds_by_section.insert(layout.id, button_bounds(layout, buttons, viewport));
            }
        }
        let mut seen: HashMap<SectionId, usize> = HashMap::new();
        for button in &mut self.buttons {
            let n = seen.entry(button.section).or_insert(0);
            if let Some(bounds) = bounds_by_section.get(&button.section).and_then(|b| b.get(*n)) {
                button.bounds = *bounds;
            }
            *n += 1;
        }
    }
}

// ───────────────────────────────────────── frame callbacks ───

fn schedule_button(scheduler: &mut FrameScheduler<Scene>, index: usize) -> FrameId {
    scheduler.request(Phase::Render, move |scene, _| step_button(scene, index))
}

fn step_button(scene: &mut Scene, index: usize) -> ControlFlow<()> {
    let Some(button) = scene.page.as_mut().and_then(|p| p.buttons.get_mut(index)) else {
        return ControlFlow::Break(());
    };
    let flow = button.spring.step();
    if flow.is_break() {
        button.frame = None;
    }
    let visual = button.spring.visual();
    if scene.surface.buttons.len() <= index {
        scene.surface.buttons.resize(index + 1, SpringVisual::REST);
    }
    scene.surface.buttons[index] = visual;
    flow
}

/// Mark sections whose entrance trigger fired and retire those triggers.
fn reveal_sections(scene: &mut Scene) {
    let Scene { triggers, page, .. } = scene;
    let Some(page) = page.as_mut() else {
        return;
    };
    let revealed = &mut page.revealed;
    page.reveals.retain(|&(section, trigger)| {
        let entered = triggers.drain_events(trigger).contains(&TriggerEvent::Enter);
        if entered {
            tracing::debug!(section, "section revealed");
            revealed.insert(section);
            triggers.kill(trigger);
        }
        !entered
    });
}

/// Apply trigger progress to every pinned choreography and write the poses.
fn render_pins(scene: &mut Scene) {
    let Scene {
        surface,
        triggers,
        page,
        ..
    } = scene;
    let Some(page) = page.as_mut() else {
        return;
    };
    surface.pins.clear();
    for pin in &mut page.pinned {
        for event in triggers.drain_events(pin.trigger) {
            if matches!(event, TriggerEvent::Enter | TriggerEvent::LeaveBack) {
                // Same pose as the progress written below; kept so the
                // reset happens even when the trigger reports no status.
                pin.choreography.reset();
                pin.resets += 1;
            }
        }
        if let Some(status) = triggers.status(pin.trigger) {
            pin.choreography.set_progress(status.progress);
        }
        let progress = pin.choreography.progress();
        surface.pins.push(PinVisual {
            section: pin.section,
            progress,
            cards: pin.choreography.poses().collect(),
            flip: pin.choreography.flip(),
        });
    }
}

// ───────────────────────────────────────── geometry ──────────

/// Card tracks relative to the pinned content's top-left: a tight stack in
/// the centre fanning out to an evenly spaced row.
fn card_tracks(rotations: &[f64], viewport: Viewport) -> Vec<CardTrack> {
    let n = rotations.len();
    let width = viewport.width.max(CARD_WIDTH);
    let centre = (width - CARD_WIDTH) / 2.0;
    let margin = CARD_WIDTH / 4.0;
    let span = (width - 2.0 * margin - CARD_WIDTH).max(0.0);
    let mid = (n as f64 - 1.0) / 2.0;
    rotations
        .iter()
        .enumerate()
        .map(|(i, &rot)| {
            let from_mid = i as f64 - mid;
            let final_x = if n > 1 {
                margin + span * i as f64 / (n as f64 - 1.0)
            } else {
                centre
            };
            CardTrack {
                initial_pos: Vec2::new(centre + from_mid * 6.0, 80.0 + from_mid.abs() * 8.0),
                final_pos: Vec2::new(final_x, 80.0),
                initial_rot: rot,
            }
        })
        .collect()
}

fn button_bounds(layout: &SectionLayout, count: usize, viewport: Viewport) -> Vec<Bounds> {
    if count == 0 {
        return Vec::new();
    }
    let slot = viewport.width.max(BUTTON_WIDTH) / count as f64;
    let y = layout.top + (layout.height - BUTTON_HEIGHT) / 2.0;
    (0..count)
        .map(|i| Bounds {
            x: slot * i as f64 + (slot - BUTTON_WIDTH).max(0.0) / 2.0,
            y,
            width: BUTTON_WIDTH,
            height: BUTTON_HEIGHT,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::app::site::{catalogue, SectionSpec};

    struct CountingNavigator(Cell<u32>);

    impl Navigator for CountingNavigator {
        fn advance(&self, _from: SectionId) {
            self.0.set(self.0.get() + 1);
        }
    }

    const VIEWPORT: Viewport = Viewport {
        width: 1200.0,
        height: 800.0,
    };

    fn gate_page() -> PageSpec {
        PageSpec {
            title: "test",
            sections: vec![
                SectionSpec {
                    title: "intro",
                    height: 800.0,
                    kind: SectionKind::Plain,
                },
                SectionSpec {
                    title: "next",
                    height: 800.0,
                    kind: SectionKind::Gate,
                },
            ],
        }
    }

    fn mount(
        spec: &PageSpec,
        scene: &mut Scene,
        scheduler: &mut FrameScheduler<Scene>,
        nav: Rc<CountingNavigator>,
    ) -> Page {
        let Scene {
            triggers,
            wheel,
            intersections,
            ..
        } = scene;
        Page::mount(
            0,
            spec,
            MountCtx {
                scheduler,
                triggers,
                wheel,
                intersections,
                navigator: nav,
                indicator: NavIndicator::default(),
                viewport: VIEWPORT,
                gate_threshold: 1000.0,
                spring: SpringConfig::default(),
            },
        )
    }

    #[test]
    fn layout_stacks_sections_and_adds_pin_spacer() {
        let spec = &catalogue(1200.0)[0];
        let (sections, height) = lay_out(spec);
        assert_eq!(sections[1].top, 720.0);
        assert_eq!(sections[2].height, 720.0 + 1200.0);
        assert_eq!(sections[3].top, 720.0 + 600.0 + 1920.0);
        assert_eq!(height, 720.0 + 600.0 + 1920.0 + 720.0);
    }

    #[test]
    fn pinned_content_holds_still_during_extent() {
        let layout = SectionLayout {
            id: 0,
            title: "cards",
            top: 1000.0,
            height: 1700.0,
            kind: SectionKind::Cards {
                extent: 1000.0,
                rotations: vec![],
            },
        };
        assert_eq!(layout.content_top(500.0), 1000.0);
        assert_eq!(layout.content_top(1400.0), 1400.0);
        assert_eq!(layout.content_top(5000.0), 2000.0);
    }

    #[test]
    fn observer_reports_only_changes() {
        let mut obs = SectionObserver::default();
        obs.observe(0, 0.0, 800.0);
        obs.observe(1, 800.0, 800.0);

        let first = obs.evaluate(0.0, 800.0);
        assert_eq!(first.len(), 2);
        assert!(first[0].is_intersecting && !first[1].is_intersecting);

        assert!(obs.evaluate(100.0, 800.0).is_empty());
        let flipped = obs.evaluate(500.0, 800.0);
        assert_eq!(flipped.len(), 2);
        assert!(!flipped[0].is_intersecting && flipped[1].is_intersecting);
    }

    #[test]
    fn zero_sized_viewport_never_intersects() {
        assert_eq!(visible_ratio(0.0, 800.0, 0.0, 0.0), 0.0);
        assert_eq!(visible_ratio(0.0, 0.0, 0.0, 800.0), 0.0);
    }

    #[test]
    fn gate_fires_navigation_exactly_once() {
        let mut scene = Scene::new();
        let mut scheduler = FrameScheduler::new();
        let nav = Rc::new(CountingNavigator(Cell::new(0)));
        let mut page = mount(&gate_page(), &mut scene, &mut scheduler, Rc::clone(&nav));

        for entry in page.observe(800.0, 800.0) {
            scene.intersections.dispatch(&entry);
        }
        assert!(page.gate_for(1).is_some_and(|g| g.in_view()));

        let mut prevented = 0;
        for _ in 0..30 {
            if scene.wheel.dispatch(&WheelEvent::pixels(100.0)) == Disposition::PreventDefault {
                prevented += 1;
            }
        }
        assert_eq!(nav.0.get(), 1);
        assert_eq!(prevented, 21);
    }

    #[test]
    fn unmounted_page_leaves_no_listeners_behind() {
        let mut scene = Scene::new();
        let mut scheduler = FrameScheduler::new();
        let nav = Rc::new(CountingNavigator(Cell::new(0)));
        let mut page = mount(&gate_page(), &mut scene, &mut scheduler, Rc::clone(&nav));
        for entry in page.observe(800.0, 800.0) {
            scene.intersections.dispatch(&entry);
        }
        scene.wheel.dispatch(&WheelEvent::pixels(900.0));

        page.unmount(&mut scheduler, &mut scene.triggers);
        assert!(scene.wheel.is_empty());
        assert!(scene.intersections.is_empty());
        assert!(scene.triggers.is_empty());

        scene.wheel.dispatch(&WheelEvent::pixels(5000.0));
        assert_eq!(nav.0.get(), 0);
    }

    /// Scene whose trigger system reads a plain document scroller.
    fn attached_scene(content_height: f64) -> (Scene, Rc<crate::app::bridge::Document>) {
        let mut scene = Scene::new();
        let scroller = Rc::new(crate::app::bridge::Document::new(VIEWPORT));
        scroller.set_scroll_height(content_height);
        let store = Rc::new(crate::app::store::EngineStore::new());
        scene.triggers.set_scroller(Rc::new(crate::app::bridge::TriggerBridge::new(
            store,
            Rc::clone(&scroller),
        )));
        (scene, scroller)
    }

    fn scroll_and_render(
        scene: &mut Scene,
        scheduler: &mut FrameScheduler<Scene>,
        scroller: &crate::app::bridge::Document,
        top: f64,
    ) {
        scroller.set_scroll_top(top);
        scene.triggers.update();
        scheduler.run_frame(scene, 1.0 / 60.0);
    }

    fn cards(extent: f64) -> SectionSpec {
        SectionSpec {
            title: "cards",
            height: 800.0,
            kind: SectionKind::Cards {
                extent,
                rotations: vec![-15.0, -7.5, 7.5, 15.0],
            },
        }
    }

    #[test]
    fn pinned_section_tracks_progress_without_resetting_on_enter_back() {
        let spec = PageSpec {
            title: "pins",
            sections: vec![cards(1000.0)],
        };
        let (mut scene, scroller) = attached_scene(1800.0 + VIEWPORT.height);
        let mut scheduler = FrameScheduler::new();
        let nav = Rc::new(CountingNavigator(Cell::new(0)));
        let page = mount(&spec, &mut scene, &mut scheduler, nav);
        scene.page = Some(page);

        for top in [0.0_f64, 500.0, 1500.0, 400.0] {
            scroll_and_render(&mut scene, &mut scheduler, &scroller, top);
        }
        // Enter at 0 resets; EnterBack after leaving does not.
        let resets = scene.page.as_ref().map(|p| p.pinned[0].resets);
        assert_eq!(resets, Some(1));

        scroll_and_render(&mut scene, &mut scheduler, &scroller, 500.0);
        let visual = &scene.surface.pins[0];
        assert_eq!(visual.progress, 0.5);
        assert_eq!(visual.cards[0].rot, -7.5);
    }

    #[test]
    fn pinned_section_resets_when_scrolled_back_above_its_start() {
        let spec = PageSpec {
            title: "pins",
            sections: vec![
                SectionSpec {
                    title: "intro",
                    height: 1000.0,
                    kind: SectionKind::Plain,
                },
                cards(1000.0),
            ],
        };
        let (mut scene, scroller) = attached_scene(2800.0 + VIEWPORT.height);
        let mut scheduler = FrameScheduler::new();
        let nav = Rc::new(CountingNavigator(Cell::new(0)));
        let page = mount(&spec, &mut scene, &mut scheduler, nav);
        scene.page = Some(page);

        scroll_and_render(&mut scene, &mut scheduler, &scroller, 1500.0);
        let pin = |scene: &Scene| scene.page.as_ref().map(|p| p.pinned[0].resets);
        assert_eq!(pin(&scene), Some(1));
        assert_eq!(scene.surface.pins[0].progress, 0.5);
        assert_eq!(scene.surface.pins[0].cards[0].rot, -7.5);

        scroll_and_render(&mut scene, &mut scheduler, &scroller, 200.0);
        assert_eq!(pin(&scene), Some(2));
        let visual = &scene.surface.pins[0];
        assert_eq!(visual.progress, 0.0);
        assert_eq!(visual.cards[0].rot, -15.0);
        assert!(!visual.flip.shows_back());
    }

    #[test]
    fn sections_reveal_once_their_top_reaches_the_viewport_bottom() {
        let spec = PageSpec {
            title: "reveal",
            sections: vec![
                SectionSpec {
                    title: "intro",
                    height: 1000.0,
                    kind: SectionKind::Plain,
                },
                SectionSpec {
                    title: "below",
                    height: 800.0,
                    kind: SectionKind::Plain,
                },
            ],
        };
        let (mut scene, scroller) = attached_scene(1800.0);
        let mut scheduler = FrameScheduler::new();
        let nav = Rc::new(CountingNavigator(Cell::new(0)));
        let page = mount(&spec, &mut scene, &mut scheduler, nav);
        scene.page = Some(page);
        let revealed = |scene: &Scene, section| {
            scene.page.as_ref().is_some_and(|p| p.is_revealed(section))
        };

        scroll_and_render(&mut scene, &mut scheduler, &scroller, 0.0);
        assert!(revealed(&scene, 0));
        assert!(!revealed(&scene, 1));
        assert_eq!(scene.triggers.len(), 1);

        // The second section's top (1000) meets the viewport bottom at 200.
        scroll_and_render(&mut scene, &mut scheduler, &scroller, 250.0);
        assert!(revealed(&scene, 1));
        assert!(scene.triggers.is_empty());

        // Scrolling back keeps the entrance played.
        scroll_and_render(&mut scene, &mut scheduler, &scroller, 0.0);
        assert!(revealed(&scene, 1));
    }

    #[test]
    fn hovered_button_schedules_one_frame_and_goes_idle() {
        let spec = &catalogue(1200.0)[2];
        let mut scene = Scene::new();
        let mut scheduler = FrameScheduler::new();
        let nav = Rc::new(CountingNavigator(Cell::new(0)));
        let page = mount(spec, &mut scene, &mut scheduler, nav);
        let bounds = page.buttons[0].bounds;
        scene.page = Some(page);
        let baseline = scheduler.pending_in(Phase::Render);

        let (cx, cy) = (bounds.x + bounds.width, bounds.y + bounds.height / 2.0);
        for _ in 0..5 {
            if let Some(page) = scene.page.as_mut() {
                page.on_pointer_move(cx - 1.0, cy, &mut scheduler);
            }
        }
        assert_eq!(scheduler.pending_in(Phase::Render), baseline + 1);

        for _ in 0..20 {
            scheduler.run_frame(&mut scene, 1.0 / 60.0);
        }
        assert!(scene.surface.buttons[0].translate_x > 0.0);

        if let Some(page) = scene.page.as_mut() {
            page.on_pointer_move(-100.0, -100.0, &mut scheduler);
        }
        for _ in 0..200 {
            scheduler.run_frame(&mut scene, 1.0 / 60.0);
        }
        assert_eq!(scheduler.pending_in(Phase::Render), baseline);
        let page = scene.page.as_ref().expect("mounted");
        assert_eq!(page.buttons[0].frame(), None);
        assert!(!page.buttons[0].spring.is_scheduled());
    }
}
