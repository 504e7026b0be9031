//! Progressive-navigation gate.
//!
//! A section that leads to the next page does not navigate on the first
//! flick.  While the section is in view, wheel motion accumulates toward a
//! threshold (backward motion drains it again, never below zero); crossing
//! the threshold fires a single "advance" and latches.  Leaving the view
//! discards whatever had accumulated.
//!
//! ```text
//!   Idle ──enter_view──▶ Accumulating ──acc ≥ threshold──▶ Fired
//!    ▲                       │
//!    └──────leave_view───────┘
//! ```

/// Smallest threshold accepted; anything lower would fire on noise.
pub const MIN_THRESHOLD: f64 = 1.0;

/// Gate state.  `Fired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateState {
    /// Section not in view; wheel motion is ignored.
    Idle,
    /// Section in view; `accumulated` is in `[0, threshold)`.
    Accumulating { accumulated: f64 },
    /// Threshold crossed and the advance command issued.
    Fired,
}

/// What a wheel event did to the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOutcome {
    /// Not in view; nothing changed.
    Ignored,
    /// Accumulation moved; carries the new 0–100 progress.
    Progress(f64),
    /// Threshold crossed on this event.  Issue exactly one advance.
    Advance,
    /// Already fired; the event must not scroll the page either.
    Swallowed,
}

impl GateOutcome {
    /// Whether the host should cancel the event's default scrolling.
    pub fn prevents_default(self) -> bool {
        matches!(self, GateOutcome::Advance | GateOutcome::Swallowed)
    }
}

/// One-shot threshold state machine for a navigable section.
#[derive(Debug, Clone)]
pub struct ProgressGate {
    threshold: f64,
    state: GateState,
}

impl ProgressGate {
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.max(MIN_THRESHOLD)
        } else {
            MIN_THRESHOLD
        };
        Self {
            threshold,
            state: GateState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[cfg(test)]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn in_view(&self) -> bool {
        matches!(self.state, GateState::Accumulating { .. })
    }

    pub fn fired(&self) -> bool {
        self.state == GateState::Fired
    }

    /// Accumulated motion; the full threshold once fired.
    pub fn accumulated(&self) -> f64 {
        match self.state {
            GateState::Idle => 0.0,
            GateState::Accumulating { accumulated } => accumulated,
            GateState::Fired => self.threshold,
        }
    }

    /// Accumulation mapped to `0.0..=100.0`.
    pub fn progress(&self) -> f64 {
        self.accumulated() / self.threshold * 100.0
    }

    /// The owning section entered the viewport.  Always starts from zero.
    pub fn enter_view(&mut self) {
        if self.state == GateState::Idle {
            self.state = GateState::Accumulating { accumulated: 0.0 };
        }
    }

    /// The owning section left the viewport; accumulation is discarded.
    pub fn leave_view(&mut self) {
        if let GateState::Accumulating { .. } = self.state {
            self.state = GateState::Idle;
        }
    }

    /// Apply one wheel delta (pixels, positive = forward).
    pub fn on_wheel(&mut self, delta_y: f64) -> GateOutcome {
        match self.state {
            GateState::Idle => GateOutcome::Ignored,
            GateState::Fired => GateOutcome::Swallowed,
            GateState::Accumulating { accumulated } => {
                if !delta_y.is_finite() {
                    return GateOutcome::Progress(self.progress());
                }
                let next = (accumulated + delta_y).clamp(0.0, self.threshold);
                if next >= self.threshold {
                    self.state = GateState::Fired;
                    GateOutcome::Advance
                } else {
                    self.state = GateState::Accumulating { accumulated: next };
                    GateOutcome::Progress(self.progress())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_motion_while_out_of_view() {
        let mut gate = ProgressGate::new(3000.0);
        assert_eq!(gate.on_wheel(5000.0), GateOutcome::Ignored);
        assert_eq!(gate.accumulated(), 0.0);
        assert!(!gate.fired());
    }

    #[test]
    fn forward_motion_is_monotonic_and_fires_once() {
        let mut gate = ProgressGate::new(3000.0);
        gate.enter_view();

        let mut last = 0.0;
        let mut advances = 0;
        for _ in 0..100 {
            match gate.on_wheel(120.0) {
                GateOutcome::Advance => advances += 1,
                GateOutcome::Progress(_) | GateOutcome::Swallowed => {}
                GateOutcome::Ignored => panic!("gate is in view"),
            }
            let acc = gate.accumulated();
            assert!(acc >= last);
            assert!(acc <= gate.threshold());
            last = acc;
        }
        assert_eq!(advances, 1);
        assert!(gate.fired());
        assert_eq!(gate.on_wheel(10_000.0), GateOutcome::Swallowed);
    }

    #[test]
    fn backward_motion_drains_to_exactly_zero() {
        let mut gate = ProgressGate::new(3000.0);
        gate.enter_view();
        gate.on_wheel(1500.0);
        assert_eq!(gate.accumulated(), 1500.0);

        for _ in 0..3 {
            gate.on_wheel(-500.0);
        }
        assert_eq!(gate.accumulated(), 0.0);
        gate.on_wheel(-800.0);
        assert_eq!(gate.accumulated(), 0.0);
    }

    #[test]
    fn leaving_view_resets_accumulation() {
        let mut gate = ProgressGate::new(3000.0);
        gate.enter_view();
        gate.on_wheel(2400.0);
        gate.leave_view();
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(gate.accumulated(), 0.0);

        gate.enter_view();
        assert_eq!(gate.accumulated(), 0.0);
        assert_eq!(gate.on_wheel(100.0), GateOutcome::Progress(100.0 / 3000.0 * 100.0));
    }

    #[test]
    fn fired_latch_survives_view_changes() {
        let mut gate = ProgressGate::new(500.0);
        gate.enter_view();
        assert_eq!(gate.on_wheel(900.0), GateOutcome::Advance);
        gate.leave_view();
        gate.enter_view();
        assert!(gate.fired());
        assert_eq!(gate.progress(), 100.0);
        assert!(gate.on_wheel(1.0).prevents_default());
    }

    #[test]
    fn degenerate_threshold_is_floored() {
        let gate = ProgressGate::new(-10.0);
        assert_eq!(gate.threshold(), MIN_THRESHOLD);
        assert_eq!(ProgressGate::new(f64::INFINITY).threshold(), MIN_THRESHOLD);
    }
}
