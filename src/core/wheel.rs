//! Wheel input model.
//!
//! Browsers and terminals report wheel motion in different units (pixels,
//! lines, pages) and trackpads emit many small deltas where a mouse wheel
//! emits a few large ones.  [`DeltaMode::Raw`] keeps the reported magnitude
//! untouched; [`DeltaMode::Normalized`] converts units to pixels and caps a
//! single event so one hard flick weighs the same on every device.

/// Pixels per wheel "line" when normalising line-mode deltas.
pub const LINE_HEIGHT_PX: f64 = 16.0;

/// Largest magnitude a single normalised event may contribute.
pub const MAX_NORMALIZED_STEP: f64 = 120.0;

/// Unit of a reported wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaUnit {
    #[default]
    Pixel,
    Line,
    Page,
}

/// How wheel deltas are interpreted before they reach the engine and gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    /// Use the reported value as pixels, whatever its unit.
    #[default]
    Raw,
    /// Convert to pixels and clamp to [`MAX_NORMALIZED_STEP`].
    Normalized,
}

impl DeltaMode {
    pub const ALL: &[DeltaMode] = &[DeltaMode::Raw, DeltaMode::Normalized];

    pub fn label(self) -> &'static str {
        match self {
            DeltaMode::Raw => "raw",
            DeltaMode::Normalized => "normalized",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Some(DeltaMode::Raw),
            "normalized" | "normalised" => Some(DeltaMode::Normalized),
            _ => None,
        }
    }
}

/// One wheel event.  Positive `delta_y` is forward (down the page).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub delta_y: f64,
    pub unit: DeltaUnit,
}

impl WheelEvent {
    pub fn pixels(delta_y: f64) -> Self {
        Self {
            delta_y,
            unit: DeltaUnit::Pixel,
        }
    }

    /// Vertical delta in pixels under `mode`.  `page_height` is the viewport
    /// height used for page-unit deltas.  Non-finite input yields `0.0`.
    pub fn delta_px(&self, mode: DeltaMode, page_height: f64) -> f64 {
        if !self.delta_y.is_finite() {
            return 0.0;
        }
        match mode {
            DeltaMode::Raw => self.delta_y,
            DeltaMode::Normalized => {
                let scaled = match self.unit {
                    DeltaUnit::Pixel => self.delta_y,
                    DeltaUnit::Line => self.delta_y * LINE_HEIGHT_PX,
                    DeltaUnit::Page => self.delta_y * page_height.max(0.0),
                };
                scaled.clamp(-MAX_NORMALIZED_STEP, MAX_NORMALIZED_STEP)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_mode_keeps_magnitude() {
        let ev = WheelEvent {
            delta_y: 3.0,
            unit: DeltaUnit::Line,
        };
        assert_eq!(ev.delta_px(DeltaMode::Raw, 800.0), 3.0);
        assert_eq!(WheelEvent::pixels(-450.0).delta_px(DeltaMode::Raw, 800.0), -450.0);
    }

    #[test]
    fn normalized_mode_scales_and_caps() {
        let lines = WheelEvent {
            delta_y: 3.0,
            unit: DeltaUnit::Line,
        };
        assert_eq!(lines.delta_px(DeltaMode::Normalized, 800.0), 48.0);

        let flick = WheelEvent::pixels(-900.0);
        assert_eq!(flick.delta_px(DeltaMode::Normalized, 800.0), -MAX_NORMALIZED_STEP);
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        assert_eq!(WheelEvent::pixels(f64::NAN).delta_px(DeltaMode::Raw, 800.0), 0.0);
    }

    #[test]
    fn parse_round_trips_labels() {
        for &mode in DeltaMode::ALL {
            assert_eq!(DeltaMode::parse(mode.label()), Some(mode));
        }
        assert_eq!(DeltaMode::parse("bogus"), None);
    }
}
