//! Frame context: everything frame callbacks are allowed to touch.
//!
//! The [`FrameScheduler`](crate::core::frame::FrameScheduler) runs its
//! callbacks against a `Scene`.  The scene holds the trigger system, the
//! event listener registries, the mounted page, and the [`Surface`] that
//! visual writes land on for the renderer to pick up.

use crate::core::choreo::{CardPose, FlipPose};
use crate::core::spring::SpringVisual;
use crate::core::trigger::TriggerSystem;
use crate::core::wheel::WheelEvent;

use super::listeners::Listeners;
use super::page::{IntersectionEntry, Page};
use super::router::SectionId;

/// Visual state of one pinned section.
#[derive(Debug, Clone, PartialEq)]
pub struct PinVisual {
    pub section: SectionId,
    pub progress: f64,
    pub cards: Vec<CardPose>,
    pub flip: FlipPose,
}

/// Render-layer writes produced by frame callbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    /// Page translation written by the engine itself when no trigger system
    /// is attached; `None` while triggers drive visuals.
    pub page_offset: Option<f64>,
    pub pins: Vec<PinVisual>,
    pub buttons: Vec<SpringVisual>,
}

/// Scheduler context.
#[derive(Default)]
pub struct Scene {
    pub surface: Surface,
    pub triggers: TriggerSystem,
    pub wheel: Listeners<WheelEvent>,
    pub intersections: Listeners<IntersectionEntry>,
    pub page: Option<Page>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }
}
