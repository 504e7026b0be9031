//! Root layout: owns the smooth-scroll engine's lifetime and its frame loop.
//!
//! Mounting creates the engine through the store and registers exactly one
//! `Scroll`-phase callback that integrates it.  Unmounting cancels that
//! callback before destroying the engine, so no tick can land on a retired
//! engine.

use std::ops::ControlFlow;
use std::rc::Rc;

use crate::core::engine::EngineConfig;
use crate::core::frame::{FrameId, FrameScheduler, Phase};

use super::scene::Scene;
use super::store::{EngineError, EngineHandle, EngineStore};

#[derive(Debug, Default)]
pub struct RootLayout {
    engine_loop: Option<FrameId>,
    handle: Option<EngineHandle>,
}

impl RootLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the engine and start its frame loop.
    pub fn mount(
        &mut self,
        store: &Rc<EngineStore>,
        scheduler: &mut FrameScheduler<Scene>,
        config: EngineConfig,
        limit: f64,
    ) -> Result<EngineHandle, EngineError> {
        let handle = store.create(config, limit)?;

        let engine = handle.clone();
        let publish = Rc::clone(store);
        let id = scheduler.request(Phase::Scroll, move |scene, tick| {
            let state = engine.tick(tick.dt);
            publish.notify();
            // With no trigger system attached the engine moves the page
            // itself.
            scene.surface.page_offset = if scene.triggers.is_attached() {
                None
            } else {
                Some(state.offset)
            };
            ControlFlow::Continue(())
        });

        tracing::debug!(engine = handle.id(), "engine frame loop started");
        self.engine_loop = Some(id);
        self.handle = Some(handle.clone());
        Ok(handle)
    }

    /// Stop the frame loop and destroy the engine.
    pub fn unmount(&mut self, store: &EngineStore, scheduler: &mut FrameScheduler<Scene>) {
        if let Some(id) = self.engine_loop.take() {
            scheduler.cancel(id);
        }
        if self.handle.take().is_some() {
            store.destroy();
        }
    }
}
