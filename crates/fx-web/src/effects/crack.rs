//! Cracked glass: impact points appear over time, each growing a fractal
//! crack tree on the effect's own canvas. Once every tree is fully grown
//! the loop stops; the canvas stays as a static pane until cleanup.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use fx_core::config::ConfigValue;
use fx_core::procedural::crack::{impacts_due, CrackParams, CrackTree};
use fx_core::rng::FxRng;
use fx_core::surface::Surface;

use crate::canvas_surface::CanvasSurface;
use crate::disposer::{Disposable, DisposableNodeExt};
use crate::dom;
use crate::orchestrator::{EffectCtx, Handler};

use super::{cleanup_deadline_ms, schedule_forced_cleanup, EffectLoop};

pub fn handler() -> Handler {
    Box::new(cracked_glass)
}

struct CrackState {
    trees: Vec<(CrackTree, f32)>,
    elapsed_ms: f64,
    rng: FxRng,
}

fn cracked_glass(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let document = ctx
        .document()
        .ok_or_else(|| anyhow::anyhow!("document unavailable"))?;
    let layer = ctx
        .css_layer()
        .ok_or_else(|| anyhow::anyhow!("overlay not materialized"))?;
    let (w, h) = ctx.stage_size();

    let duration_ms = ctx.scale_duration_ms(cfg.number_clamped("durationMs", 4000.0, 100.0, 600_000.0));
    let grow_ms = ctx.scale_duration_ms(cfg.number_clamped("growMs", 700.0, 50.0, 30_000.0)) as f32;
    let intensity = cfg.number_clamped("intensity", 1.0, 0.2, 3.0) as f32;
    let params = CrackParams {
        branch_depth: cfg.number_clamped("branchDepth", 3.0, 0.0, 6.0) as u32,
        jaggedness: cfg.number_clamped("jaggedness", 3.0, 0.0, 12.0) as f32,
        ..CrackParams::default()
    };
    let impact_count = match cfg.string("countMode", "auto") {
        "fixed" => cfg.number_clamped("count", 3.0, 1.0, 24.0) as usize,
        // one impact per ~450px square of stage, at least one
        _ => (((w * h) as f64 / (450.0 * 450.0)).ceil() as usize).clamp(1, 8),
    };

    let canvas = dom::create_canvas(&document, "position:absolute;inset:0;width:100%;height:100%;")
        .ok_or_else(|| anyhow::anyhow!("failed to create canvas"))?;
    layer
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append failed: {e:?}"))?;
    dom::size_canvas_backing(&canvas, w, h, 1.0);
    let Some(mut surface) = CanvasSurface::from_canvas(&canvas) else {
        canvas.remove();
        anyhow::bail!("no 2D context for cracked glass");
    };

    let state = Rc::new(RefCell::new(CrackState {
        trees: Vec::with_capacity(impact_count),
        elapsed_ms: 0.0,
        rng: ctx.fork_rng(),
    }));

    let loop_state = state.clone();
    let fx_loop = EffectLoop::start(move |dt| {
        let mut s = loop_state.borrow_mut();
        s.elapsed_ms += dt as f64 * 1000.0;

        // materialize impacts that are due by now
        let due = impacts_due(impact_count, duration_ms, s.elapsed_ms);
        while s.trees.len() < due {
            let origin = Vec2::new(
                s.rng.range(w * 0.08, w * 0.92),
                s.rng.range(h * 0.08, h * 0.92),
            );
            let tree = CrackTree::generate(origin, intensity, &params, &mut s.rng);
            s.trees.push((tree, 0.0));
        }

        let step = dt * 1000.0 / grow_ms;
        let mut growing = false;
        for (_, progress) in &mut s.trees {
            if *progress < 1.0 {
                *progress = (*progress + step).min(1.0);
                growing = true;
            }
        }

        surface.clear(w, h);
        let CrackState { trees, rng, .. } = &mut *s;
        for (tree, progress) in trees.iter() {
            tree.draw(&mut surface, *progress, &params, rng);
        }

        // idle once everything is placed and grown; the last frame stays
        // on the canvas
        growing || s.trees.len() < impact_count
    });

    let canvas_node = canvas.clone();
    let disposable = Disposable::new(move || {
        fx_loop.cancel();
        canvas_node.remove();
    });
    disposable.attach_to_node(&canvas);
    schedule_forced_cleanup(&disposable, cleanup_deadline_ms(ctx, cfg));
    ctx.track(disposable);
    Ok(())
}
