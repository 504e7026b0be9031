//! Scroll-fraction choreography.
//!
//! A pinned section holds still while its scroll extent is consumed; the
//! fraction consumed (`progress`) drives every card's pose.  Poses are pure
//! functions of `progress` and each card's track, so re-deriving at `0.0` or
//! `1.0` is always exact no matter how many pin cycles came before.

/// 2-D point in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Linear interpolation that is exact at both ends (`t = 0` → `a`,
/// `t = 1` → `b`).
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Fraction of a pin's extent consumed at `scroll`, clamped to `[0, 1]`.
/// A zero or negative extent is treated as already complete once reached.
pub fn pin_progress(scroll: f64, start: f64, extent: f64) -> f64 {
    if extent.is_nan() || extent <= 0.0 {
        return if scroll >= start { 1.0 } else { 0.0 };
    }
    ((scroll - start) / extent).clamp(0.0, 1.0)
}

/// Start and end parameters of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTrack {
    pub initial_pos: Vec2,
    pub final_pos: Vec2,
    /// Degrees; eases to zero as progress reaches `1.0`.
    pub initial_rot: f64,
}

/// Visual state of one card at some progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    pub pos: Vec2,
    pub rot: f64,
}

/// Rotation of the two faces of a flip card, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipPose {
    pub front: f64,
    pub back: f64,
}

impl FlipPose {
    /// The back face is the one facing the viewer.
    pub fn shows_back(&self) -> bool {
        self.front > 90.0
    }
}

/// Progress plus the tracks it drives.
#[derive(Debug, Clone)]
pub struct Choreography {
    progress: f64,
    tracks: Vec<CardTrack>,
}

impl Choreography {
    pub fn new(tracks: Vec<CardTrack>) -> Self {
        Self {
            progress: 0.0,
            tracks,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Set progress, clamped to `[0, 1]`.  NaN resets to zero.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    /// Force the `progress = 0` pose (pin entered or left backwards).
    pub fn reset(&mut self) {
        self.progress = 0.0;
    }

    #[cfg(test)]
    pub fn pose(&self, index: usize) -> Option<CardPose> {
        self.tracks
            .get(index)
            .map(|track| pose_at(track, self.progress))
    }

    pub fn poses(&self) -> impl Iterator<Item = CardPose> + '_ {
        self.tracks.iter().map(|track| pose_at(track, self.progress))
    }

    pub fn flip(&self) -> FlipPose {
        flip_at(self.progress)
    }
}

/// Pose of `track` at `progress`.
pub fn pose_at(track: &CardTrack, progress: f64) -> CardPose {
    CardPose {
        pos: Vec2 {
            x: lerp(track.initial_pos.x, track.final_pos.x, progress),
            y: lerp(track.initial_pos.y, track.final_pos.y, progress),
        },
        rot: track.initial_rot * (1.0 - progress),
    }
}

/// Face angles at `progress`; both cross 90° together at `0.5`.
pub fn flip_at(progress: f64) -> FlipPose {
    let front = progress * 180.0;
    FlipPose {
        front,
        back: front - 180.0,
    }
}
