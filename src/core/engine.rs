//! Smooth-scroll integrator with exponential ease-out.
//!
//! Input moves a *target* offset immediately; each frame the virtual offset
//! closes a fixed fraction of the remaining distance to that target, so the
//! page decelerates visibly instead of jumping.  The offset is always kept
//! inside `[0, limit]`.

/// Snap to the target once closer than this (pixels).
const SNAP_DISTANCE: f64 = 0.5;

/// Reference frame rate the `lerp` factor is expressed against.
const REFERENCE_FPS: f64 = 60.0;

/// Published scroll state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Virtual offset in pixels, within `[0, limit]`.
    pub offset: f64,
    /// Largest reachable offset (content height minus viewport height).
    pub limit: f64,
    /// Pixels per second over the last frame.
    pub velocity: f64,
}

impl ScrollState {
    /// Fraction of the scrollable extent consumed, `0.0` when nothing scrolls.
    pub fn progress(&self) -> f64 {
        if self.limit > 0.0 {
            (self.offset / self.limit).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Tunables for [`SmoothScroll`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Fraction of remaining distance closed per 60 Hz frame.
    pub lerp: f64,
    /// Scale applied to every wheel delta before it moves the target.
    pub wheel_multiplier: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lerp: 0.1,
            wheel_multiplier: 1.0,
        }
    }
}

/// Options for [`SmoothScroll::scroll_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollTo {
    /// Jump without easing.
    pub immediate: bool,
}

impl ScrollTo {
    pub const IMMEDIATE: ScrollTo = ScrollTo { immediate: true };
}

/// Virtual scroll offset animator.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    state: ScrollState,
    target: f64,
    config: EngineConfig,
}

impl SmoothScroll {
    pub fn new(config: EngineConfig, limit: f64) -> Self {
        Self {
            state: ScrollState {
                offset: 0.0,
                limit: sanitize_limit(limit),
                velocity: 0.0,
            },
            target: 0.0,
            config: EngineConfig {
                lerp: config.lerp.clamp(0.01, 1.0),
                wheel_multiplier: if config.wheel_multiplier.is_finite() {
                    config.wheel_multiplier.max(0.0)
                } else {
                    1.0
                },
            },
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    pub fn limit(&self) -> f64 {
        self.state.limit
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Still easing toward the target.
    pub fn is_animating(&self) -> bool {
        self.state.offset != self.target
    }

    /// Feed a wheel delta (pixels, positive = down).
    pub fn on_wheel(&mut self, delta_px: f64) {
        if !delta_px.is_finite() {
            return;
        }
        self.target = self.clamp(self.target + delta_px * self.config.wheel_multiplier);
    }

    /// Move to `offset`, easing unless `opts.immediate`.
    pub fn scroll_to(&mut self, offset: f64, opts: ScrollTo) {
        if !offset.is_finite() {
            return;
        }
        self.target = self.clamp(offset);
        if opts.immediate {
            self.state.offset = self.target;
            self.state.velocity = 0.0;
        }
    }

    /// Update the scrollable extent (content resized).  Offset and target are
    /// re-clamped into the new range.
    pub fn set_limit(&mut self, limit: f64) {
        self.state.limit = sanitize_limit(limit);
        self.target = self.clamp(self.target);
        self.state.offset = self.clamp(self.state.offset);
    }

    /// Advance one frame of `dt` seconds.  Returns the new state.
    pub fn tick(&mut self, dt: f64) -> ScrollState {
        let previous = self.state.offset;
        if self.is_animating() && dt > 0.0 {
            // Frame-rate independent: lerp is defined per 60 Hz frame.
            let factor = 1.0 - (1.0 - self.config.lerp).powf(dt * REFERENCE_FPS);
            let next = previous + (self.target - previous) * factor;
            self.state.offset = if (self.target - next).abs() < SNAP_DISTANCE {
                self.target
            } else {
                self.clamp(next)
            };
        }
        self.state.velocity = if dt > 0.0 {
            (self.state.offset - previous) / dt
        } else {
            0.0
        };
        self.state
    }

    fn clamp(&self, v: f64) -> f64 {
        v.clamp(0.0, self.state.limit)
    }
}

fn sanitize_limit(limit: f64) -> f64 {
    if limit.is_finite() && limit > 0.0 {
        limit
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn wheel_target_is_clamped_to_limit() {
        let mut s = SmoothScroll::new(EngineConfig::default(), 1000.0);
        s.on_wheel(5000.0);
        assert_eq!(s.target(), 1000.0);
        s.on_wheel(-9000.0);
        assert_eq!(s.target(), 0.0);
    }

    #[test]
    fn tick_eases_and_settles() {
        let mut s = SmoothScroll::new(EngineConfig::default(), 1000.0);
        s.on_wheel(300.0);
        let first = s.tick(DT);
        assert!(first.offset > 0.0 && first.offset < 300.0);
        assert!(first.velocity > 0.0);

        for _ in 0..600 {
            s.tick(DT);
        }
        assert_eq!(s.offset(), 300.0);
        assert!(!s.is_animating());
        assert_eq!(s.tick(DT).velocity, 0.0);
    }

    #[test]
    fn offset_never_leaves_bounds() {
        let mut s = SmoothScroll::new(EngineConfig::default(), 200.0);
        for delta in [500.0, -80.0, 900.0, -2000.0, 45.0] {
            s.on_wheel(delta);
            for _ in 0..5 {
                let st = s.tick(DT);
                assert!(st.offset >= 0.0 && st.offset <= st.limit);
            }
        }
    }

    #[test]
    fn immediate_scroll_to_jumps() {
        let mut s = SmoothScroll::new(EngineConfig::default(), 1000.0);
        s.scroll_to(640.0, ScrollTo::IMMEDIATE);
        assert_eq!(s.offset(), 640.0);
        assert!(!s.is_animating());

        s.scroll_to(100.0, ScrollTo::default());
        assert_eq!(s.offset(), 640.0);
        assert_eq!(s.target(), 100.0);
    }

    #[test]
    fn zero_height_content_clamps_to_origin_and_still_ticks() {
        let mut s = SmoothScroll::new(EngineConfig::default(), 0.0);
        s.on_wheel(120.0);
        assert_eq!(s.tick(DT), ScrollState::default());

        let mut nan = SmoothScroll::new(EngineConfig::default(), f64::NAN);
        nan.scroll_to(50.0, ScrollTo::IMMEDIATE);
        assert_eq!(nan.offset(), 0.0);
    }

    #[test]
    fn shrinking_limit_reclamps_offset() {
        let mut s = SmoothScroll::new(EngineConfig::default(), 1000.0);
        s.scroll_to(900.0, ScrollTo::IMMEDIATE);
        s.set_limit(400.0);
        assert_eq!(s.offset(), 400.0);
        assert_eq!(s.target(), 400.0);
    }

    #[test]
    fn progress_is_fraction_of_limit() {
        let st = ScrollState {
            offset: 250.0,
            limit: 1000.0,
            velocity: 0.0,
        };
        assert_eq!(st.progress(), 0.25);
        assert_eq!(ScrollState::default().progress(), 0.0);
    }
}
