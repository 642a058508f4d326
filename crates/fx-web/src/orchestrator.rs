//! Name → handler registry and dispatch.
//!
//! `play` resolves legacy aliases, merges configuration layers, builds the
//! execution context and invokes the handler. Handler failures are caught
//! and logged here; nothing thrown by an effect escapes the orchestrator
//! or stops the shared loop.

use std::cell::RefCell;
use std::rc::Rc;

use fnv::FnvHashMap;

use fx_core::catalog;
use fx_core::config::{resolve_effect_config, ConfigValue, Motion};
use fx_core::particles::{Particle, ParticleSystem};
use fx_core::rng::FxRng;

use crate::disposer::Disposable;
use crate::notify::{EngineEvent, NotificationSink};
use crate::surface_manager::{self, SurfaceManager};

pub type Handler = Box<dyn Fn(&EffectCtx, &ConfigValue) -> anyhow::Result<()>>;

/// Execution context handed to every handler.
pub struct EffectCtx {
    pub manager: Rc<RefCell<SurfaceManager>>,
    pub particles: Rc<RefCell<ParticleSystem>>,
    pub motion: Motion,
    pub notifier: Rc<dyn NotificationSink>,
    rng: Rc<RefCell<FxRng>>,
    tracked: RefCell<Vec<Disposable>>,
}

impl EffectCtx {
    pub fn stage_size(&self) -> (f32, f32) {
        self.manager.borrow().stage_size()
    }

    pub fn css_layer(&self) -> Option<web_sys::HtmlElement> {
        self.manager.borrow().css_layer()
    }

    pub fn document(&self) -> Option<web_sys::Document> {
        self.manager.borrow().document()
    }

    /// Append a batch to the shared pool and kick the shared loop.
    pub fn add_particles(&self, batch: Vec<Box<dyn Particle>>) {
        let count = batch.len();
        if count == 0 {
            return;
        }
        let total = self.particles.borrow_mut().add_particles(batch);
        self.notifier
            .notify(&EngineEvent::ParticlesAdded { count, total });
        surface_manager::request_frame(&self.manager);
    }

    pub fn scale_count(&self, count: usize) -> usize {
        self.motion.scale_count(count)
    }

    pub fn scale_duration_ms(&self, ms: f64) -> f64 {
        self.motion.scale_duration_ms(ms)
    }

    pub fn rand(&self, lo: f32, hi: f32) -> f32 {
        self.rng.borrow_mut().range(lo, hi)
    }

    pub fn chance(&self, p: f32) -> bool {
        self.rng.borrow_mut().chance(p)
    }

    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        self.rng.borrow_mut().pick(items)
    }

    /// Independent RNG stream for an effect's own loop.
    pub fn fork_rng(&self) -> FxRng {
        self.rng.borrow_mut().fork()
    }

    /// Register a disposer so the orchestrator can force teardown later.
    pub fn track(&self, disposable: Disposable) {
        self.tracked.borrow_mut().push(disposable);
    }
}

pub struct EffectOrchestrator {
    manager: Rc<RefCell<SurfaceManager>>,
    particles: Rc<RefCell<ParticleSystem>>,
    motion: Motion,
    notifier: Rc<dyn NotificationSink>,
    rng: Rc<RefCell<FxRng>>,
    registry: FnvHashMap<&'static str, Handler>,
    stored: FnvHashMap<String, ConfigValue>,
    active_effect: Option<String>,
    disposables: Vec<Disposable>,
}

impl EffectOrchestrator {
    pub fn new(
        manager: Rc<RefCell<SurfaceManager>>,
        particles: Rc<RefCell<ParticleSystem>>,
        motion: Motion,
        notifier: Rc<dyn NotificationSink>,
        seed: u64,
    ) -> Self {
        let mut registry = FnvHashMap::default();
        crate::effects::register_all(&mut registry);
        Self {
            manager,
            particles,
            motion,
            notifier,
            rng: Rc::new(RefCell::new(FxRng::seeded(seed))),
            registry,
            stored: FnvHashMap::default(),
            active_effect: None,
            disposables: Vec::new(),
        }
    }

    pub fn has_effect(&self, name: &str) -> bool {
        catalog::resolve_alias(name)
            .map(|(canonical, _)| self.registry.contains_key(canonical))
            .unwrap_or(false)
    }

    /// Canonical effect names only; aliases are not listed.
    pub fn effects_list(&self) -> Vec<&'static str> {
        catalog::EFFECT_NAMES
            .iter()
            .copied()
            .filter(|n| self.registry.contains_key(n))
            .collect()
    }

    pub fn active_effect(&self) -> Option<&str> {
        self.active_effect.as_deref()
    }

    /// Boundary for the external config service: pre-validated, already
    /// migrated per-effect trees.
    pub fn set_stored_config(&mut self, name: &str, cfg: ConfigValue) {
        self.stored.insert(name.to_string(), cfg);
    }

    /// Dispatch an effect. Returns true iff a handler existed; internal
    /// failures are logged, never propagated.
    pub fn play(&mut self, name: &str, overrides: Option<&ConfigValue>) -> bool {
        let Some((canonical, implied)) = catalog::resolve_alias(name) else {
            log::warn!("[fx] unknown effect {name:?}");
            return false;
        };
        if !self.registry.contains_key(canonical) {
            log::warn!("[fx] no handler registered for {canonical:?}");
            return false;
        }
        if let Some(o) = overrides {
            if let Err(e) = o.validate() {
                // clamping accessors still guard every read; the caller
                // just gets told their tree is suspect
                log::warn!("[fx] overrides for {canonical}: {e}");
            }
        }
        if !surface_manager::ensure_overlay(&self.manager) {
            return false;
        }

        let defaults = catalog::defaults_for(canonical);
        let base = resolve_effect_config(&defaults, implied.as_ref(), None);
        let cfg = resolve_effect_config(&base, self.stored.get(canonical), overrides);

        self.active_effect = Some(canonical.to_string());
        self.notifier.notify(&EngineEvent::EffectStarted {
            name: canonical.to_string(),
        });

        let ctx = EffectCtx {
            manager: self.manager.clone(),
            particles: self.particles.clone(),
            motion: self.motion,
            notifier: self.notifier.clone(),
            rng: self.rng.clone(),
            tracked: RefCell::new(Vec::new()),
        };
        let handler = &self.registry[canonical];
        if let Err(e) = handler(&ctx, &cfg) {
            log::error!("[fx] effect {canonical} failed: {e:?}");
        }

        self.disposables.retain(|d| !d.is_disposed());
        self.disposables.extend(ctx.tracked.into_inner());
        true
    }

    /// Force-tear-down every live effect the orchestrator knows about.
    pub fn dispose_all(&mut self) {
        for d in self.disposables.drain(..) {
            d.dispose();
        }
    }
}
