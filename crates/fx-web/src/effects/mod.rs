//! Effect handlers and the helpers they share.

mod crack;
mod css;
mod gpu;
mod matrix;
mod particles;
mod spiderweb;

use std::cell::Cell;
use std::rc::Rc;

use fnv::FnvHashMap;
use instant::Instant;
use wasm_bindgen::closure::Closure;
use web_sys as web;

use fx_core::catalog;
use fx_core::config::ConfigValue;

use crate::constants::DEFAULT_CLEANUP_BUFFER_MS;
use crate::disposer::Disposable;
use crate::dom;
use crate::orchestrator::{EffectCtx, Handler};

pub fn register_all(registry: &mut FnvHashMap<&'static str, Handler>) {
    for name in catalog::EFFECT_NAMES.iter().copied() {
        if catalog::is_particle_effect(name) {
            registry.insert(name, particles::handler_for(name));
        }
    }
    css::register(registry);
    registry.insert("crackedGlass", crack::handler());
    registry.insert("spiderWeb", spiderweb::handler());
    registry.insert("matrixRain", matrix::handler());
    registry.insert("shaderFire", gpu::fire_handler());
    registry.insert("waterRipple", gpu::ripple_handler());
}

/// Create an effect's root element under the shared CSS layer.
///
/// The layer is shared by every concurrently active effect; each effect
/// owns only the subtree under the root returned here.
pub(crate) fn effect_root(ctx: &EffectCtx, css_text: &str) -> anyhow::Result<web::HtmlElement> {
    let document = ctx
        .document()
        .ok_or_else(|| anyhow::anyhow!("document unavailable"))?;
    let layer = ctx
        .css_layer()
        .ok_or_else(|| anyhow::anyhow!("overlay not materialized"))?;
    let root = dom::create_div(&document, css_text)
        .ok_or_else(|| anyhow::anyhow!("failed to create effect root"))?;
    layer
        .append_child(&root)
        .map_err(|e| anyhow::anyhow!("append failed: {e:?}"))?;
    Ok(root)
}

/// Effect duration plus the forced-cleanup buffer, reduced-motion scaled.
pub(crate) fn cleanup_deadline_ms(ctx: &EffectCtx, cfg: &ConfigValue) -> f64 {
    let duration = cfg.number_clamped("durationMs", 3000.0, 50.0, 600_000.0);
    let buffer = cfg.number_clamped("cleanupBufferMs", DEFAULT_CLEANUP_BUFFER_MS, 0.0, 10_000.0);
    ctx.scale_duration_ms(duration) + buffer
}

/// Schedule the safety-net teardown. Firing after a manual dispose is a
/// no-op thanks to disposer idempotency.
pub(crate) fn schedule_forced_cleanup(disposable: &Disposable, deadline_ms: f64) {
    let d = disposable.clone();
    dom::set_timeout(move || d.dispose(), deadline_ms as i32);
}

/// A per-effect animation loop, independent of the shared one.
///
/// The tick closure receives the frame delta in seconds and returns
/// whether to keep looping. `cancel` is synchronous: no tick runs after
/// it.
pub(crate) struct EffectLoop {
    cancelled: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
}

impl EffectLoop {
    pub(crate) fn start(mut tick: impl FnMut(f32) -> bool + 'static) -> Self {
        let cancelled = Rc::new(Cell::new(false));
        let raf_id = Rc::new(Cell::new(None));
        let state = Self {
            cancelled: cancelled.clone(),
            raf_id: raf_id.clone(),
        };

        let mut last = Instant::now();
        let closure: Rc<std::cell::RefCell<Option<Closure<dyn FnMut()>>>> =
            Rc::new(std::cell::RefCell::new(None));
        let closure_clone = closure.clone();
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if cancelled.get() {
                raf_id.set(None);
                return;
            }
            let now = Instant::now();
            let dt = (now - last)
                .as_secs_f32()
                .min(crate::constants::MAX_FRAME_DT_SEC);
            last = now;
            if tick(dt) {
                let id = closure_clone.borrow().as_ref().and_then(dom::request_frame);
                raf_id.set(id);
            } else {
                raf_id.set(None);
            }
        }) as Box<dyn FnMut()>));
        let id = closure.borrow().as_ref().and_then(dom::request_frame);
        state.raf_id.set(id);
        state
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.set(true);
        if let Some(id) = self.raf_id.take() {
            dom::cancel_frame(id);
        }
    }
}
