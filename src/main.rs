//! Smooth scrolling, scroll-linked triggers and progressive page navigation
//! in the terminal.
//!
//! Run the binary to browse the demo site interactively (mouse wheel scrolls,
//! keys jump).  Run with `--replay FILE` to drive the same state headlessly
//! from a script and print the route history.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Gauge, Paragraph},
    Frame, Terminal,
};

use crate::app::{
    bridge::Viewport,
    event::{spawn_event_reader, spawn_frame_clock, AppEvent},
    handler, script,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::wheel::DeltaMode;
use crate::ui::{layout::AppLayout, page_widget::PageWidget, theme::Theme};

/// Virtual viewport used for headless replays.
const REPLAY_VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = env!("CARGO_PKG_DESCRIPTION"))]
struct Cli {
    /// Replay a script headlessly instead of opening the terminal view.
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Frame clock rate (overrides the config file).
    #[arg(long)]
    fps: Option<u32>,

    /// Wheel pixels a gate accumulates before navigating (100 to 100000).
    #[arg(long)]
    threshold: Option<f64>,

    /// Wheel delta interpretation: `raw` or `normalized`.
    #[arg(long, value_parser = parse_delta_mode)]
    delta_mode: Option<DeltaMode>,

    /// Write the default config file and exit.
    #[arg(long = "init-config")]
    init_config: bool,
}

fn parse_delta_mode(s: &str) -> Result<DeltaMode, String> {
    DeltaMode::parse(s).ok_or_else(|| {
        let known: Vec<&str> = DeltaMode::ALL.iter().map(|m| m.label()).collect();
        format!("expected one of: {}", known.join(", "))
    })
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());

    let scroll = state
        .scene
        .surface
        .page_offset
        .unwrap_or_else(|| handler::current_scroll(state));
    if let Some(page) = state.page() {
        frame.render_widget(
            PageWidget::new(page, &state.scene.surface, scroll),
            layout.page_area,
        );
    }

    let progress = state.indicator.get();
    let gauge = Gauge::default()
        .gauge_style(Theme::nav_gauge_style())
        .ratio(progress / 100.0)
        .label(format!("{}  next page {:.0}%", state.current_route().title, progress));
    frame.render_widget(gauge, layout.nav_area);

    let readout = state
        .readout()
        .map(|s| {
            format!(
                "{:.0}/{:.0}px ({:.0}%) {:+.0}px/s",
                s.offset,
                s.limit,
                s.progress() * 100.0,
                s.velocity
            )
        })
        .unwrap_or_else(|| "native scroll".into());
    let hint = state.config.status_bar_hint();
    let message = state.status_message.as_deref().unwrap_or(&hint);
    let status = Paragraph::new(format!(" {readout} | {message}")).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}

// ───────────────────────────────────────── modes ────────────

fn run_replay(config: AppConfig, path: &Path) -> Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading replay script {}", path.display()))?;
    let steps = script::parse(&source)?;

    let mut state = AppState::new(config, REPLAY_VIEWPORT)?;
    let frames = script::run(&mut state, &steps);
    tracing::info!(steps = steps.len(), frames, "replay finished");

    for visit in state.router.history() {
        let title = state.routes[visit.route].title;
        match visit.via {
            Some(section) => println!(
                "{}  {:<8} (gate in section {section})",
                visit.at.format("%H:%M:%S%.3f"),
                title
            ),
            None => println!("{}  {:<8}", visit.at.format("%H:%M:%S%.3f"), title),
        }
    }
    if let Some(engine) = state.readout() {
        println!("final offset {:.1} of {:.1}", engine.offset, engine.limit);
    }
    Ok(())
}

async fn run_terminal(config: AppConfig) -> Result<()> {
    let fps = config.fps;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut state = AppState::new(config, handler::viewport_for_terminal(size.width, size.height))?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(50));
    let mut frames = spawn_frame_clock(fps);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| draw(frame, &state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => match event {
                AppEvent::Key(k) => handler::handle_key(&mut state, k),
                AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                AppEvent::Resize(w, h) => {
                    handler::handle_resize(&mut state, handler::viewport_for_terminal(w, h));
                }
                AppEvent::Frame(dt) => {
                    handler::handle_frame(&mut state, dt);
                }
            },

            Some(AppEvent::Frame(dt)) = frames.recv() => {
                handler::handle_frame(&mut state, dt);
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only emits when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = AppConfig::default().save()?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = AppConfig::load();
    if let Some(fps) = cli.fps {
        config.fps = fps.clamp(10, 240);
    }
    if let Some(threshold) = cli.threshold {
        config.set_gate_threshold(threshold);
    }
    if let Some(mode) = cli.delta_mode {
        config.wheel_delta_mode = mode;
    }

    match cli.replay {
        Some(path) => run_replay(config, &path),
        None => run_terminal(config).await,
    }
}
