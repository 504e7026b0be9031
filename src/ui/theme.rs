//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── page ───────────────────────────────────────────────────
    pub fn section_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    /// Sections that have not yet played their entrance.
    pub fn hidden_section_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn body_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn card_front_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn card_back_style() -> Style {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn button_style(hovered: bool) -> Style {
        if hovered {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        }
    }

    pub fn gate_style() -> Style {
        Style::default().fg(Color::LightBlue)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn nav_gauge_style() -> Style {
        Style::default().fg(Color::LightBlue).bg(Color::Black)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
