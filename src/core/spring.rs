//! Pointer-relative spring ("magnetic" hover).
//!
//! While hovered, an element leans toward the pointer: the pointer position
//! relative to the element's centre becomes a target offset, and each frame
//! the visual offset closes a fixed fraction of the remaining distance.
//! This is critically damped, so it never overshoots.
//!
//! The spring only wants frames while it is moving.  [`PointerSpring::step`]
//! returns `Break` once it is unhovered and at rest, and the `scheduled`
//! flag guarantees at most one pending frame callback per element.

use std::ops::ControlFlow;

/// Axis-aligned element bounds in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Tunables for [`PointerSpring`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Fraction of remaining distance closed per step, in `(0, 1]`.
    pub ease: f64,
    /// Offset (pixels) reached with the pointer on the element's edge.
    pub strength: f64,
    /// Rest distance below which an unhovered spring stops ticking.
    pub epsilon: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            ease: 0.15,
            strength: 24.0,
            epsilon: 0.05,
        }
    }
}

/// Mutable spring state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringState {
    pub target_x: f64,
    pub target_y: f64,
    pub current_x: f64,
    pub current_y: f64,
    pub hovered: bool,
    /// A frame callback is pending for this element.
    pub scheduled: bool,
}

/// Derived visual parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringVisual {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Degrees.
    pub rotate: f64,
    pub scale: f64,
}

impl SpringVisual {
    /// Untransformed element.
    pub const REST: SpringVisual = SpringVisual {
        translate_x: 0.0,
        translate_y: 0.0,
        rotate: 0.0,
        scale: 1.0,
    };
}

/// Max tilt (degrees) at full horizontal offset.
const MAX_TILT_DEG: f64 = 6.0;
/// Extra scale at full offset.
const MAX_SCALE_GAIN: f64 = 0.06;

#[derive(Debug, Clone)]
pub struct PointerSpring {
    state: SpringState,
    config: SpringConfig,
}

impl PointerSpring {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            state: SpringState::default(),
            config: SpringConfig {
                ease: config.ease.clamp(0.01, 1.0),
                strength: config.strength.max(0.0),
                epsilon: config.epsilon.max(f64::EPSILON),
            },
        }
    }

    pub fn state(&self) -> SpringState {
        self.state
    }

    #[cfg(test)]
    pub fn is_scheduled(&self) -> bool {
        self.state.scheduled
    }

    /// Pointer moved over the element.  Returns `true` when the caller must
    /// request a frame callback (none is pending yet).
    pub fn on_pointer_move(&mut self, x: f64, y: f64, bounds: Bounds) -> bool {
        if bounds.is_degenerate() || !x.is_finite() || !y.is_finite() {
            return false;
        }
        let half_w = bounds.width / 2.0;
        let half_h = bounds.height / 2.0;
        let nx = ((x - (bounds.x + half_w)) / half_w).clamp(-1.0, 1.0);
        let ny = ((y - (bounds.y + half_h)) / half_h).clamp(-1.0, 1.0);

        self.state.target_x = nx * self.config.strength;
        self.state.target_y = ny * self.config.strength;
        self.state.hovered = true;
        self.claim_schedule()
    }

    /// Pointer left the element: relax back to the origin.
    pub fn on_pointer_leave(&mut self) -> bool {
        self.state.target_x = 0.0;
        self.state.target_y = 0.0;
        self.state.hovered = false;
        if self.distance_to_target() < self.config.epsilon {
            return false;
        }
        self.claim_schedule()
    }

    /// One frame.  `Break` means "at rest, stop requesting frames".
    pub fn step(&mut self) -> ControlFlow<()> {
        let s = &mut self.state;
        s.current_x += (s.target_x - s.current_x) * self.config.ease;
        s.current_y += (s.target_y - s.current_y) * self.config.ease;

        if !self.state.hovered && self.distance_to_target() < self.config.epsilon {
            self.state.current_x = self.state.target_x;
            self.state.current_y = self.state.target_y;
            self.state.scheduled = false;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    pub fn visual(&self) -> SpringVisual {
        let (nx, ny) = if self.config.strength > 0.0 {
            (
                self.state.current_x / self.config.strength,
                self.state.current_y / self.config.strength,
            )
        } else {
            (0.0, 0.0)
        };
        let reach = (nx * nx + ny * ny).sqrt().min(1.0);
        SpringVisual {
            translate_x: self.state.current_x,
            translate_y: self.state.current_y,
            rotate: nx * MAX_TILT_DEG,
            scale: 1.0 + reach * MAX_SCALE_GAIN,
        }
    }

    fn claim_schedule(&mut self) -> bool {
        if self.state.scheduled {
            false
        } else {
            self.state.scheduled = true;
            true
        }
    }

    fn distance_to_target(&self) -> f64 {
        let dx = self.state.target_x - self.state.current_x;
        let dy = self.state.target_y - self.state.current_y;
        (dx * dx + dy * dy).sqrt()
    }
}
