//! Central application state.
//!
//! `AppState` is the root scope: it owns the scheduler, the engine store,
//! the document, the trigger bridge, the router and the mounted page.  Event
//! handling is a set of functions over `&mut AppState`; rendering reads
//! `&AppState`.

use std::cell::{Cell, OnceCell};
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::core::engine::ScrollState;
use crate::core::frame::{FrameScheduler, Phase};

use super::bridge::{Document, TriggerBridge, Viewport};
use super::listeners::Subscription;
use super::page::{self, MountCtx, Page};
use super::root::RootLayout;
use super::router::{NavIndicator, Navigator, Router, SectionId};
use super::scene::{Scene, Surface};
use super::site::{catalogue, PageSpec};
use super::store::{EngineError, EngineHandle, EngineStore};

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    /// Per-frame callback driver; frame callbacks run against `scene`.
    pub scheduler: FrameScheduler<Scene>,
    pub scene: Scene,
    pub store: Rc<EngineStore>,
    /// Raw device scroll, authoritative while no engine is live.
    pub document: Rc<Document>,
    bridge: OnceCell<Rc<TriggerBridge>>,
    pub root: RootLayout,
    pub router: Rc<Router>,
    /// Progress of the gate in view, shown in the navigation bar.
    pub indicator: NavIndicator,
    pub routes: Vec<PageSpec>,
    /// Latest engine state as published through the store.
    readout: Rc<Cell<Option<ScrollState>>>,
    _readout_sub: Subscription,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the root scope, install the trigger bridge and mount the first
    /// route.
    pub fn new(config: AppConfig, viewport: Viewport) -> Result<Self, EngineError> {
        let routes = catalogue(config.pin_extent);
        let store = Rc::new(EngineStore::new());

        let readout = Rc::new(Cell::new(None));
        let sink = Rc::clone(&readout);
        let weak = Rc::downgrade(&store);
        let readout_sub = store.subscribe(move || {
            let state = weak
                .upgrade()
                .map_or_else(EngineStore::get_server_snapshot, |s| s.get_snapshot())
                .map(|engine| engine.state());
            sink.set(state);
        });

        let mut state = Self {
            config,
            scheduler: FrameScheduler::new(),
            scene: Scene::new(),
            store,
            document: Rc::new(Document::new(viewport)),
            bridge: OnceCell::new(),
            root: RootLayout::new(),
            router: Rc::new(Router::new(routes.len())),
            indicator: NavIndicator::default(),
            routes,
            readout,
            _readout_sub: readout_sub,
            should_quit: false,
            status_message: None,
        };
        state.install_bridge();
        state.change_route(0, None)?;
        Ok(state)
    }

    /// Bind the trigger system to the engine-or-document scroller and start
    /// the trigger update loop.  Only the first call does anything; later
    /// calls hand back the installed bridge.
    pub fn install_bridge(&mut self) -> Rc<TriggerBridge> {
        if let Some(bridge) = self.bridge.get() {
            return Rc::clone(bridge);
        }
        let bridge = Rc::new(TriggerBridge::new(
            Rc::clone(&self.store),
            Rc::clone(&self.document),
        ));
        self.scene.triggers.set_scroller(bridge.clone());
        self.scheduler.request(Phase::Trigger, |scene, _| {
            scene.triggers.update();
            ControlFlow::Continue(())
        });
        tracing::info!("trigger bridge installed");
        self.bridge.get_or_init(|| bridge).clone()
    }

    pub fn bridge(&self) -> Option<&Rc<TriggerBridge>> {
        self.bridge.get()
    }

    pub fn engine(&self) -> Option<EngineHandle> {
        self.store.get_snapshot()
    }

    /// Engine state as last published to store subscribers.
    pub fn readout(&self) -> Option<ScrollState> {
        self.readout.get()
    }

    pub fn page(&self) -> Option<&Page> {
        self.scene.page.as_ref()
    }

    pub fn current_route(&self) -> &PageSpec {
        &self.routes[self.router.current() % self.routes.len()]
    }

    /// Tear down the current page and engine, then mount `route` with a
    /// fresh engine.  `via` is the section whose gate asked for it.
    pub fn change_route(&mut self, route: usize, via: Option<SectionId>) -> Result<(), EngineError> {
        let route = route % self.routes.len();

        if let Some(page) = self.scene.page.take() {
            page.unmount(&mut self.scheduler, &mut self.scene.triggers);
        }
        self.root.unmount(&self.store, &mut self.scheduler);
        self.scene.surface = Surface::default();
        self.indicator.set(0.0);

        let spec = &self.routes[route];
        self.document.set_scroll_height(page::content_height(spec));
        self.document.set_scroll_top(0.0);
        self.root.mount(
            &self.store,
            &mut self.scheduler,
            self.config.engine_config(),
            self.document.max_scroll(),
        )?;

        let navigator: Rc<dyn Navigator> = self.router.clone();
        let page = Page::mount(
            route,
            spec,
            MountCtx {
                scheduler: &mut self.scheduler,
                triggers: &mut self.scene.triggers,
                wheel: &self.scene.wheel,
                intersections: &self.scene.intersections,
                navigator,
                indicator: self.indicator.clone(),
                viewport: self.document.viewport(),
                gate_threshold: self.config.gate_threshold,
                spring: self.config.spring_config(),
            },
        );
        self.scene.page = Some(page);
        self.scene.triggers.update();
        self.router.commit(route, via);

        tracing::info!(route, title = spec.title, ?via, "route mounted");
        self.status_message = Some(format!("{} loaded", spec.title));
        Ok(())
    }
}
