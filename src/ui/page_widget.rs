//! Custom Ratatui widget that draws the mounted page at the current scroll
//! position.
//!
//! Page geometry is in page pixels; [`COL_PX`] and [`ROW_PX`] map it onto
//! terminal cells.  Anything partially off-screen is clipped to the page
//! area.  The widget only reads: section layout from the [`Page`], visuals
//! written by frame callbacks from the [`Surface`].

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::page::{Page, SectionLayout, CARD_HEIGHT, CARD_WIDTH};
use crate::app::scene::{PinVisual, Surface};
use crate::app::site::SectionKind;
use crate::core::spring::SpringVisual;

use super::layout::{COL_PX, ROW_PX};
use super::theme::Theme;

/// The page widget: created fresh each frame.
pub struct PageWidget<'a> {
    page: &'a Page,
    surface: &'a Surface,
    scroll: f64,
}

impl<'a> PageWidget<'a> {
    pub fn new(page: &'a Page, surface: &'a Surface, scroll: f64) -> Self {
        Self {
            page,
            surface,
            scroll,
        }
    }

    fn render_section(&self, section: &SectionLayout, area: Rect, buf: &mut Buffer) {
        let top = section.content_top(self.scroll) - self.scroll;
        let body = section.height - section.pin_extent();
        let width_px = f64::from(area.width) * COL_PX;
        let revealed = self.page.is_revealed(section.id);

        if let Some(rect) = cell_rect(area, 0.0, top, width_px, ROW_PX) {
            let style = if revealed {
                Theme::section_title_style()
            } else {
                Theme::hidden_section_style()
            };
            let rule = format!("── {} {}", section.title, "─".repeat(usize::from(area.width)));
            buf.set_stringn(rect.x, rect.y, rule, usize::from(rect.width), style);
        }

        match &section.kind {
            SectionKind::Plain => {
                let text = format!("{:.0}px of content", body);
                if let Some(rect) = cell_rect(area, 2.0 * COL_PX, top + ROW_PX, width_px, ROW_PX) {
                    buf.set_stringn(rect.x, rect.y, text, usize::from(rect.width), Theme::body_style());
                }
            }
            SectionKind::Cards { .. } => {
                if let Some(pin) = self.surface.pins.iter().find(|p| p.section == section.id) {
                    render_cards(pin, top, area, buf);
                }
            }
            SectionKind::Magnetic { .. } => self.render_buttons(section, area, buf),
            SectionKind::Gate => {
                let Some(gate) = self.page.gate_for(section.id) else {
                    return;
                };
                let y = top + (body - ROW_PX) / 2.0;
                if let Some(rect) = cell_rect(area, 0.0, y, width_px, ROW_PX) {
                    let text = if gate.fired() {
                        "loading next page".to_string()
                    } else {
                        format!("keep scrolling to continue  {}", bar(gate.progress(), 20))
                    };
                    let style = if gate.in_view() || gate.fired() {
                        Theme::gate_style()
                    } else {
                        Theme::hidden_section_style()
                    };
                    Paragraph::new(text)
                        .alignment(Alignment::Center)
                        .style(style)
                        .render(rect, buf);
                }
            }
        }
    }

    fn render_buttons(&self, section: &SectionLayout, area: Rect, buf: &mut Buffer) {
        for (index, button) in self.page.buttons.iter().enumerate() {
            if button.section != section.id {
                continue;
            }
            let visual = self
                .surface
                .buttons
                .get(index)
                .copied()
                .unwrap_or(SpringVisual::REST);
            let b = button.bounds;
            let Some(rect) = cell_rect(
                area,
                b.x + visual.translate_x,
                b.y - self.scroll + visual.translate_y,
                b.width * visual.scale,
                b.height * visual.scale,
            ) else {
                continue;
            };
            let style = Theme::button_style(button.spring.state().hovered);
            Paragraph::new(format!("button {}", index + 1))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(style))
                .style(style)
                .render(rect, buf);
        }
    }
}

fn render_cards(pin: &PinVisual, top: f64, area: Rect, buf: &mut Buffer) {
    let back = pin.flip.shows_back();
    for (i, pose) in pin.cards.iter().enumerate() {
        let Some(rect) = cell_rect(area, pose.pos.x, top + pose.pos.y, CARD_WIDTH, CARD_HEIGHT) else {
            continue;
        };
        let (style, face): (Style, Line) = if back {
            (Theme::card_back_style(), Line::from("★ back"))
        } else {
            (Theme::card_front_style(), Line::from(format!("{:+.1}°", pose.rot)))
        };
        Paragraph::new(face)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(format!(" {} ", i + 1)),
            )
            .style(style)
            .render(rect, buf);
    }
}

/// Text progress bar for a `0..=100` value.
fn bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        progress.clamp(0.0, 100.0)
    )
}

/// Map a page-pixel rectangle (relative to the top-left of `area`) to the
/// cells it covers, clipped to `area`.  `None` when nothing is visible.
fn cell_rect(area: Rect, x_px: f64, y_px: f64, w_px: f64, h_px: f64) -> Option<Rect> {
    let x0 = i32::from(area.x) + (x_px / COL_PX).round() as i32;
    let y0 = i32::from(area.y) + (y_px / ROW_PX).round() as i32;
    let x1 = x0 + ((w_px / COL_PX).round() as i32).max(1);
    let y1 = y0 + ((h_px / ROW_PX).round() as i32).max(1);

    let left = x0.max(i32::from(area.left()));
    let top = y0.max(i32::from(area.top()));
    let right = x1.min(i32::from(area.right()));
    let bottom = y1.min(i32::from(area.bottom()));
    if left >= right || top >= bottom {
        return None;
    }
    Some(Rect::new(
        u16::try_from(left).ok()?,
        u16::try_from(top).ok()?,
        u16::try_from(right - left).ok()?,
        u16::try_from(bottom - top).ok()?,
    ))
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for section in &self.page.sections {
            self.render_section(section, area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_rect_clips_to_area() {
        let area = Rect::new(0, 0, 80, 20);
        assert_eq!(cell_rect(area, 0.0, -100.0, 200.0, 60.0), None);
        assert_eq!(
            cell_rect(area, 0.0, -20.0, 200.0, 60.0),
            Some(Rect::new(0, 0, 20, 2))
        );
        assert_eq!(
            cell_rect(area, 750.0, 380.0, 200.0, 60.0),
            Some(Rect::new(75, 19, 5, 1))
        );
    }

    #[test]
    fn gate_row_shows_progress_once_in_view() {
        use crate::app::{bridge::Viewport, handler, state::AppState};
        use crate::config::AppConfig;
        use crate::core::wheel::WheelEvent;

        let viewport = Viewport {
            width: 1200.0,
            height: 800.0,
        };
        let mut state = AppState::new(AppConfig::default(), viewport).expect("state");
        let bottom = handler::max_scroll(&state);
        handler::jump_to(&mut state, bottom);
        handler::handle_frame(&mut state, 1.0 / 60.0);
        handler::handle_wheel(&mut state, WheelEvent::pixels(1500.0));

        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        let page = state.page().expect("page");
        PageWidget::new(page, &state.scene.surface, handler::current_scroll(&state))
            .render(area, &mut buf);
        let text: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("keep scrolling to continue"));
        assert!(text.contains(" 50%"));
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(bar(50.0, 10), "[#####.....]  50%");
        assert_eq!(bar(140.0, 4), "[####] 100%");
    }
}
