//! Spider web: a lattice rendered in four passes across four stacked
//! canvases (reflection, fractures, main line, noise), grown in over
//! `growMs`. Stage resizes regenerate the lattice after the shared
//! debounce interval.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use fx_core::config::ConfigValue;
use fx_core::procedural::lattice::{LatticeParams, WebLattice};
use fx_core::rng::FxRng;
use fx_core::surface::Surface;

use crate::canvas_surface::CanvasSurface;
use crate::constants::RESIZE_DEBOUNCE_MS;
use crate::disposer::{Disposable, DisposableNodeExt};
use crate::dom;
use crate::orchestrator::{EffectCtx, Handler};

use super::{cleanup_deadline_ms, effect_root, schedule_forced_cleanup, EffectLoop};

pub fn handler() -> Handler {
    Box::new(spider_web)
}

struct WebState {
    lattice: WebLattice,
    reveal: f32,
    rng: FxRng,
    stage: (f32, f32),
    /// Forces a full redraw outside the grow-in window.
    dirty: bool,
}

fn generate(params: &LatticeParams, w: f32, h: f32, rng: &mut FxRng) -> WebLattice {
    let center = Vec2::new(rng.range(w * 0.25, w * 0.75), rng.range(h * 0.25, h * 0.75));
    let mut lattice = WebLattice::generate(center, params, w, h, rng);
    lattice.clamp_to_stage(w, h);
    lattice
}

fn spider_web(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let document = ctx
        .document()
        .ok_or_else(|| anyhow::anyhow!("document unavailable"))?;
    let (w, h) = ctx.stage_size();
    let grow_ms = ctx.scale_duration_ms(cfg.number_clamped("growMs", 1500.0, 50.0, 30_000.0)) as f32;
    let params = LatticeParams {
        spokes: cfg.number_clamped("spokes", 12.0, 3.0, 32.0) as usize,
        max_rings: cfg.number_clamped("maxRings", 9.0, 1.0, 16.0) as usize,
        ..LatticeParams::default()
    };

    let root = effect_root(ctx, "position:absolute;inset:0;")?;
    // stacked in blend order: reflection lowest, noise on top
    let mut surfaces = Vec::with_capacity(4);
    for _ in 0..4 {
        let canvas = dom::create_canvas(
            &document,
            "position:absolute;inset:0;width:100%;height:100%;",
        )
        .ok_or_else(|| anyhow::anyhow!("failed to create pass canvas"))?;
        root.append_child(&canvas)
            .map_err(|e| anyhow::anyhow!("append failed: {e:?}"))?;
        dom::size_canvas_backing(&canvas, w, h, 1.0);
        let surface = CanvasSurface::from_canvas(&canvas)
            .ok_or_else(|| anyhow::anyhow!("no 2D context for web pass"))?;
        surfaces.push((canvas, surface));
    }

    let mut rng = ctx.fork_rng();
    let lattice = generate(&params, w, h, &mut rng);
    let state = Rc::new(RefCell::new(WebState {
        lattice,
        reveal: 0.0,
        rng,
        stage: (w, h),
        dirty: false,
    }));

    // debounced regeneration on window resize
    let resize_timer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let state_resize = state.clone();
    let params_resize = params.clone();
    let timer_slot = resize_timer.clone();
    let resize_listener = Closure::<dyn FnMut()>::new(move || {
        if let Some(old) = timer_slot.take() {
            dom::clear_timeout(old);
        }
        let state_fire = state_resize.clone();
        let params_fire = params_resize.clone();
        let slot_fire = timer_slot.clone();
        let id = dom::set_timeout(
            move || {
                slot_fire.set(None);
                let Some(window) = web::window() else { return };
                let nw = window
                    .inner_width()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0)
                    .max(1.0) as f32;
                let nh = window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0)
                    .max(1.0) as f32;
                let mut s = state_fire.borrow_mut();
                s.stage = (nw, nh);
                let WebState { lattice, rng, .. } = &mut *s;
                *lattice = generate(&params_fire, nw, nh, rng);
                s.dirty = true;
            },
            RESIZE_DEBOUNCE_MS,
        );
        timer_slot.set(id);
    });
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_listener.as_ref().unchecked_ref());
    }

    let state_tick = state.clone();
    let fx_loop = EffectLoop::start(move |dt| {
        let mut s = state_tick.borrow_mut();
        let was_growing = s.reveal < 1.0;
        s.reveal = (s.reveal + dt * 1000.0 / grow_ms).min(1.0);
        if !was_growing && !s.dirty {
            // fully grown and unchanged: idle until a resize marks us dirty
            return true;
        }
        s.dirty = false;
        let (sw, sh) = s.stage;
        let reveal = s.reveal;
        let WebState { lattice, rng, .. } = &mut *s;
        for (i, (_, surface)) in surfaces.iter_mut().enumerate() {
            surface.clear(sw, sh);
            match i {
                0 => lattice.draw_reflection(surface, reveal),
                1 => lattice.draw_fractures(surface, reveal, rng),
                2 => lattice.draw_main(surface, reveal, rng),
                _ => lattice.draw_noise(surface, reveal, rng),
            }
        }
        true
    });

    let root_node = root.clone();
    let timer_for_dispose = resize_timer.clone();
    let disposable = Disposable::new(move || {
        fx_loop.cancel();
        if let Some(id) = timer_for_dispose.take() {
            dom::clear_timeout(id);
        }
        if let Some(window) = web::window() {
            _ = window.remove_event_listener_with_callback(
                "resize",
                resize_listener.as_ref().unchecked_ref(),
            );
        }
        drop(resize_listener);
        root_node.remove();
    });
    disposable.attach_to_node(&root);
    schedule_forced_cleanup(&disposable, cleanup_deadline_ms(ctx, cfg));
    ctx.track(disposable);
    Ok(())
}
