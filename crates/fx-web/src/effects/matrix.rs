//! Matrix rain: text-rain columns on the effect's own canvas loop.

use std::cell::RefCell;
use std::rc::Rc;

use fx_core::config::ConfigValue;
use fx_core::procedural::textrain::TextRainField;
use fx_core::rng::FxRng;
use fx_core::surface::Surface;

use crate::canvas_surface::CanvasSurface;
use crate::disposer::{Disposable, DisposableNodeExt};
use crate::dom;
use crate::orchestrator::{EffectCtx, Handler};

use super::{cleanup_deadline_ms, schedule_forced_cleanup, EffectLoop};

pub fn handler() -> Handler {
    Box::new(matrix_rain)
}

struct MatrixState {
    field: TextRainField,
    rng: FxRng,
}

fn matrix_rain(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let document = ctx
        .document()
        .ok_or_else(|| anyhow::anyhow!("document unavailable"))?;
    let layer = ctx
        .css_layer()
        .ok_or_else(|| anyhow::anyhow!("overlay not materialized"))?;
    let (w, h) = ctx.stage_size();
    let cell = cfg.number_clamped("cellPx", 16.0, 6.0, 64.0) as f32;

    let canvas = dom::create_canvas(&document, "position:absolute;inset:0;width:100%;height:100%;")
        .ok_or_else(|| anyhow::anyhow!("failed to create canvas"))?;
    layer
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append failed: {e:?}"))?;
    dom::size_canvas_backing(&canvas, w, h, 1.0);
    let Some(mut surface) = CanvasSurface::from_canvas(&canvas) else {
        canvas.remove();
        anyhow::bail!("no 2D context for matrix rain");
    };

    let mut rng = ctx.fork_rng();
    let field = TextRainField::generate(w, h, cell, &mut rng);
    let state = Rc::new(RefCell::new(MatrixState { field, rng }));

    let state_tick = state.clone();
    let fx_loop = EffectLoop::start(move |dt| {
        let mut s = state_tick.borrow_mut();
        let MatrixState { field, rng } = &mut *s;
        field.step(dt, h, rng);
        surface.clear(w, h);
        field.draw(&mut surface, h);
        true
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
