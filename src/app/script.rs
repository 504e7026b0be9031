//! Headless replay scripts.
//!
//! One command per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! wheel 120            # pixel delta (optional unit: px | line | page)
//! frames 60            # run 60 frames at the default 1/60 s
//! frames 10 0.033      # ...or with an explicit frame delta
//! pointer 300 1000     # pointer at page coordinates
//! leave                # pointer left the page
//! jump 2400            # jump through the bridge setter
//! resize 1280 720      # viewport in page pixels
//! reload
//! quit
//! ```

use crate::core::wheel::{DeltaUnit, WheelEvent};

use super::bridge::Viewport;
use super::handler;
use super::state::AppState;

const DEFAULT_DT: f64 = 1.0 / 60.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Wheel(WheelEvent),
    Frames { count: u32, dt: f64 },
    Pointer { x: f64, y: f64 },
    Leave,
    Jump(f64),
    Resize(Viewport),
    Reload,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` expects {expected}")]
    BadArguments {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },
}

/// Parse a whole script.  Stops at the first malformed line.
pub fn parse(source: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        steps.push(parse_line(index + 1, line)?);
    }
    Ok(steps)
}

fn parse_line(line: usize, text: &str) -> Result<ScriptStep, ScriptError> {
    let mut words = text.split_whitespace();
    let command = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    let bad = |command: &'static str, expected: &'static str| ScriptError::BadArguments {
        line,
        command,
        expected,
    };

    let step = match (command, args.as_slice()) {
        ("wheel", [delta, rest @ ..]) => {
            let delta_y = num(delta).ok_or_else(|| bad("wheel", "a delta and an optional unit"))?;
            let unit = match rest {
                [] | ["px"] | ["pixel"] => DeltaUnit::Pixel,
                ["line"] => DeltaUnit::Line,
                ["page"] => DeltaUnit::Page,
                _ => return Err(bad("wheel", "a delta and an optional unit")),
            };
            ScriptStep::Wheel(WheelEvent { delta_y, unit })
        }
        ("frames", [count, rest @ ..]) => {
            let count = count
                .parse::<u32>()
                .map_err(|_| bad("frames", "a frame count and an optional delta"))?;
            let dt = match rest {
                [] => DEFAULT_DT,
                [dt] => num(dt).ok_or_else(|| bad("frames", "a frame count and an optional delta"))?,
                _ => return Err(bad("frames", "a frame count and an optional delta")),
            };
            ScriptStep::Frames { count, dt }
        }
        ("pointer", [x, y]) => match (num(x), num(y)) {
            (Some(x), Some(y)) => ScriptStep::Pointer { x, y },
            _ => return Err(bad("pointer", "two coordinates")),
        },
        ("leave", []) => ScriptStep::Leave,
        ("jump", [offset]) => ScriptStep::Jump(num(offset).ok_or_else(|| bad("jump", "an offset"))?),
        ("resize", [w, h]) => match (num(w), num(h)) {
            (Some(width), Some(height)) if width >= 0.0 && height >= 0.0 => {
                ScriptStep::Resize(Viewport { width, height })
            }
            _ => return Err(bad("resize", "a width and a height")),
        },
        ("reload", []) => ScriptStep::Reload,
        ("quit", []) => ScriptStep::Quit,
        ("wheel", _) => return Err(bad("wheel", "a delta and an optional unit")),
        ("frames", _) => return Err(bad("frames", "a frame count and an optional delta")),
        ("pointer", _) => return Err(bad("pointer", "two coordinates")),
        ("leave", _) => return Err(bad("leave", "no arguments")),
        ("jump", _) => return Err(bad("jump", "an offset")),
        ("resize", _) => return Err(bad("resize", "a width and a height")),
        ("reload", _) => return Err(bad("reload", "no arguments")),
        ("quit", _) => return Err(bad("quit", "no arguments")),
        (other, _) => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(step)
}

fn num(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Drive `state` through `steps`.  Returns the number of frames run.
pub fn run(state: &mut AppState, steps: &[ScriptStep]) -> u64 {
    let mut frames = 0;
    for step in steps {
        match *step {
            ScriptStep::Wheel(event) => {
                handler::handle_wheel(state, event);
            }
            ScriptStep::Frames { count, dt } => {
                for _ in 0..count {
                    handler::handle_frame(state, dt);
                }
                frames += u64::from(count);
            }
            ScriptStep::Pointer { x, y } => handler::handle_pointer_move(state, x, y),
            ScriptStep::Leave => handler::handle_pointer_leave(state),
            ScriptStep::Jump(offset) => handler::jump_to(state, offset),
            ScriptStep::Resize(viewport) => handler::handle_resize(state, viewport),
            ScriptStep::Reload => handler::reload(state),
            ScriptStep::Quit => state.should_quit = true,
        }
        if state.should_quit {
            break;
        }
    }
    frames
}
