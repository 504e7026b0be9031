//! Input handling: maps terminal and script events to state mutations.
//!
//! Every entry point finishes by applying a pending navigation, so a gate
//! that fires inside a listener is never torn down while its own listener is
//! still on the stack.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::Action;
use crate::core::trigger::ScrollerProxy;
use crate::core::wheel::WheelEvent;
use crate::ui::layout::{AppLayout, COL_PX, ROW_PX};

use super::bridge::Viewport;
use super::listeners::Disposition;
use super::state::AppState;

/// Pixels per mouse-wheel notch reported by the terminal.
pub const WHEEL_NOTCH_PX: f64 = 100.0;

/// Virtual viewport covered by the page area of a terminal of `cols`×`rows`.
pub fn viewport_for_terminal(cols: u16, rows: u16) -> Viewport {
    let layout = AppLayout::from_area(Rect::new(0, 0, cols, rows));
    Viewport {
        width: f64::from(layout.page_area.width) * COL_PX,
        height: f64::from(layout.page_area.height) * ROW_PX,
    }
}

// ── wheel / frame ───────────────────────────────────────────────

/// Deliver a wheel event: gates first, then the engine (or the document when
/// no engine is live) unless a listener cancelled the default.
pub fn handle_wheel(state: &mut AppState, event: WheelEvent) -> Disposition {
    let delta = event.delta_px(state.config.wheel_delta_mode, state.document.viewport().height);
    if delta == 0.0 {
        return Disposition::Continue;
    }
    let disposition = state.scene.wheel.dispatch(&WheelEvent::pixels(delta));
    if disposition == Disposition::Continue {
        match state.engine() {
            Some(engine) => engine.on_wheel(delta),
            None => state
                .document
                .set_scroll_top(state.document.scroll_top() + delta),
        }
    }
    apply_pending_navigation(state);
    disposition
}

/// Run one frame (engine, triggers, visuals), then report section
/// visibility from the freshly published position.
pub fn handle_frame(state: &mut AppState, dt: f64) -> usize {
    let ran = state.scheduler.run_frame(&mut state.scene, dt);
    observe_sections(state);
    apply_pending_navigation(state);
    ran
}

fn observe_sections(state: &mut AppState) {
    let scroll = current_scroll(state);
    let height = state.document.viewport().height;
    let Some(page) = state.scene.page.as_mut() else {
        return;
    };
    for entry in page.observe(scroll, height) {
        state.scene.intersections.dispatch(&entry);
    }
}

fn apply_pending_navigation(state: &mut AppState) {
    let Some((route, via)) = state.router.take_pending() else {
        return;
    };
    if let Err(err) = state.change_route(route, via) {
        tracing::error!(%err, route, "route change failed");
        state.status_message = Some(err.to_string());
    }
}

/// Scroll position as the trigger system sees it.
pub fn current_scroll(state: &AppState) -> f64 {
    match state.bridge() {
        Some(bridge) => bridge.scroll_top(),
        None => state.document.scroll_top(),
    }
}

/// Largest reachable scroll position.
pub fn max_scroll(state: &AppState) -> f64 {
    state
        .engine()
        .map(|e| e.limit())
        .unwrap_or_else(|| state.document.max_scroll())
}

// ── pointer / jumps / resize ────────────────────────────────────

/// Pointer at page coordinates.
pub fn handle_pointer_move(state: &mut AppState, x: f64, y: f64) {
    if let Some(page) = state.scene.page.as_mut() {
        page.on_pointer_move(x, y, &mut state.scheduler);
    }
}

pub fn handle_pointer_leave(state: &mut AppState) {
    if let Some(page) = state.scene.page.as_mut() {
        page.on_pointer_leave(&mut state.scheduler);
    }
}

/// Jump through the trigger system's scroller (the bridge setter), the same
/// path external callers use.
pub fn jump_to(state: &mut AppState, offset: f64) {
    let offset = offset.clamp(0.0, max_scroll(state));
    if state.scene.triggers.is_attached() {
        state.scene.triggers.scroll_to(offset);
    } else {
        state.document.set_scroll_top(offset);
    }
}

pub fn handle_resize(state: &mut AppState, viewport: Viewport) {
    state.document.set_viewport(viewport);
    if let Some(engine) = state.engine() {
        engine.set_limit(state.document.max_scroll());
    }
    if let Some(page) = state.scene.page.as_mut() {
        page.relayout(viewport);
    }
    state.scene.triggers.refresh();
    tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
}

/// Remount the current route.
pub fn reload(state: &mut AppState) {
    state.router.request(state.router.current());
    apply_pending_navigation(state);
}

// ── terminal input ──────────────────────────────────────────────

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }
    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let screen = state.document.viewport().height;
    let target = match action {
        Action::PageDown => current_scroll(state) + screen,
        Action::PageUp => current_scroll(state) - screen,
        Action::Top => 0.0,
        Action::Bottom => max_scroll(state),
        Action::Reload => return reload(state),
        Action::Quit => {
            state.should_quit = true;
            return;
        }
    };
    jump_to(state, target);
}

/// Process a mouse event.  Wheel notches become pixel wheel events; motion
/// over the page area becomes pointer movement in page coordinates.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            handle_wheel(state, WheelEvent::pixels(WHEEL_NOTCH_PX));
        }
        MouseEventKind::ScrollUp => {
            handle_wheel(state, WheelEvent::pixels(-WHEEL_NOTCH_PX));
        }
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            let x = f64::from(mouse.column) * COL_PX;
            let y = f64::from(mouse.row) * ROW_PX;
            if y >= state.document.viewport().height {
                handle_pointer_leave(state);
            } else {
                let scroll = current_scroll(state);
                handle_pointer_move(state, x, y + scroll);
            }
        }
        _ => {}
    }
}
