//! CSS-only effects: a styled node under the shared layer, a keyframe
//! animation, and a timed removal. The forced-cleanup timer doubles as the
//! auto-removal timer.

use fnv::FnvHashMap;

use fx_core::config::ConfigValue;

use crate::disposer::{Disposable, DisposableNodeExt};
use crate::dom;
use crate::orchestrator::{EffectCtx, Handler};

use super::{cleanup_deadline_ms, effect_root, schedule_forced_cleanup};

pub fn register(registry: &mut FnvHashMap<&'static str, Handler>) {
    registry.insert("fade", Box::new(fade));
    registry.insert("flash", Box::new(flash));
    registry.insert("shake", Box::new(shake));
    registry.insert("pulse", Box::new(pulse));
    registry.insert("blur", Box::new(blur));
    registry.insert("vignette", Box::new(vignette));
    registry.insert("zoom", Box::new(zoom));
}

/// Colors come from config; keep them to a conservative charset so a bad
/// tree cannot smuggle arbitrary style text.
fn sanitize_color(raw: &str) -> String {
    let ok = !raw.is_empty()
        && raw.len() <= 48
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "#(),.% ".contains(c));
    if ok {
        raw.to_string()
    } else {
        "#000000".to_string()
    }
}

/// Shared tail: wrap the root in a disposer, expose it on the node, track
/// it, and arm the forced-cleanup timer.
fn finish(ctx: &EffectCtx, cfg: &ConfigValue, root: web_sys::HtmlElement) {
    let node = root.clone();
    let disposable = Disposable::new(move || node.remove());
    disposable.attach_to_node(&root);
    schedule_forced_cleanup(&disposable, cleanup_deadline_ms(ctx, cfg));
    ctx.track(disposable);
}

fn fade(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let duration = ctx.scale_duration_ms(cfg.number_clamped("durationMs", 1200.0, 50.0, 60_000.0));
    let color = sanitize_color(cfg.string("color", "#000000"));
    let mode = if cfg.string("mode", "in") == "out" { "out" } else { "in" };
    if let Some(document) = ctx.document() {
        dom::ensure_style(
            &document,
            "fx-kf-fade",
            "@keyframes fx-fade-in{from{opacity:1}to{opacity:0}}\
             @keyframes fx-fade-out{from{opacity:0}to{opacity:1}}",
        );
    }
    let root = effect_root(
        ctx,
        &format!(
            "position:absolute;inset:0;background:{color};\
             animation:fx-fade-{mode} {duration}ms ease forwards;"
        ),
    )?;
    finish(ctx, cfg, root);
    Ok(())
}

fn flash(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let duration = ctx.scale_duration_ms(cfg.number_clamped("durationMs", 450.0, 50.0, 10_000.0));
    let color = sanitize_color(cfg.string("color", "#ffffff"));
    if let Some(document) = ctx.document() {
        dom::ensure_style(
            &document,
            "fx-kf-flash",
            "@keyframes fx-flash{0%{opacity:0}18%{opacity:.9}100%{opacity:0}}",
        );
    }
    let root = effect_root(
        ctx,
        &format!(
            "position:absolute;inset:0;background:{color};opacity:0;\
             animation:fx-flash {duration}ms ease-out forwards;"
        ),
    )?;
    finish(ctx, cfg, root);
    Ok(())
}

fn pulse(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let duration = ctx.scale_duration_ms(cfg.number_clamped("durationMs", 1400.0, 50.0, 60_000.0));
    let color = sanitize_color(cfg.string("color", "#ffffff"));
    if let Some(document) = ctx.document() {
        dom::ensure_style(
            &document,
            "fx-kf-pulse",
            "@keyframes fx-pulse{0%,100%{opacity:0}25%,75%{opacity:.35}50%{opacity:.1}}",
        );
    }
    let root = effect_root(
        ctx,
        &format!(
            "position:absolute;inset:0;background:{color};opacity:0;\
             animation:fx-pulse {duration}ms ease-in-out forwards;"
        ),
    )?;
    finish(ctx, cfg, root);
    Ok(())
}

fn blur(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let duration = ctx.scale_duration_ms(cfg.number_clamped("durationMs", 1600.0, 50.0, 60_000.0));
    let radius = cfg.number_clamped("radiusPx", 6.0, 0.5, 40.0);
    if let Some(document) = ctx.document() {
        dom::ensure_style(
            &document,
            "fx-kf-blur",
            "@keyframes fx-blur{0%,100%{opacity:0}30%,70%{opacity:1}}",
        );
    }
    let root = effect_root(
        ctx,
        &format!(
            "position:absolute;inset:0;backdrop-filter:blur({radius}px);\
             -webkit-backdrop-filter:blur({radius}px);opacity:0;\
             animation:fx-blur {duration}ms ease-in-out forwards;"
        ),
    )?;
    finish(ctx, cfg, root);
    Ok(())
}

fn vignette(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let duration = ctx.scale_duration_ms(cfg.number_clamped("durationMs", 2400.0, 50.0, 60_000.0));
    let strength = cfg.number_clamped("strength", 0.8, 0.0, 1.0);
    if let Some(document) = ctx.document() {
        dom::ensure_style(
            &document,
            "fx-kf-vignette",
            "@keyframes fx-vignette{0%,100%{opacity:0}35%,65%{opacity:1}}",
        );
    }
    let root = effect_root(
        ctx,
        &format!(
            "position:absolute;inset:0;\
             background:radial-gradient(ellipse at center,transparent 55%,rgba(0,0,0,{strength:.2}) 100%);\
             opacity:0;animation:fx-vignette {duration}ms ease-in-out forwards;"
        ),
    )?;
    finish(ctx, cfg, root);
    Ok(())
}

/// Animates the host body; the marker node under the CSS layer carries
/// the disposer that restores the body style.
fn shake(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let duration = ctx.scale_duration_ms(cfg.number_clamped("durationMs", 700.0, 50.0, 10_000.0));
    let magnitude = cfg.number_clamped("magnitudePx", 10.0, 1.0, 60.0);
    let document = ctx
        .document()
        .ok_or_else(|| anyhow::anyhow!("document unavailable"))?;
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body to shake"))?;
    dom::ensure_style(
        &document,
        "fx-kf-shake",
        &format!(
            "@keyframes fx-shake{{0%,100%{{transform:translate(0,0)}}\
             10%{{transform:translate({m}px,-{h}px)}}30%{{transform:translate(-{m}px,{h}px)}}\
             50%{{transform:translate({h}px,{m}px)}}70%{{transform:translate(-{h}px,-{m}px)}}\
             90%{{transform:translate({h}px,-{h}px)}}}}",
            m = magnitude,
            h = magnitude * 0.5,
        ),
    );
    let marker = effect_root(ctx, "position:absolute;width:0;height:0;")?;
    _ = body
        .style()
        .set_property("animation", &format!("fx-shake {duration}ms ease-in-out"));
    let marker_node = marker.clone();
    let disposable = Disposable::new(move || {
        _ = body.style().remove_property("animation");
        marker_node.remove();
    });
    disposable.attach_to_node(&marker);
    schedule_forced_cleanup(&disposable, cleanup_deadline_ms(ctx, cfg));
    ctx.track(disposable);
    Ok(())
}

fn zoom(ctx: &EffectCtx, cfg: &ConfigValue) -> anyhow::Result<()> {
    let duration = ctx.scale_duration_ms(cfg.number_clamped("durationMs", 900.0, 50.0, 10_000.0));
    let scale = cfg.number_clamped("scale", 1.08, 0.5, 2.0);
    let document = ctx
        .document()
        .ok_or_else(|| anyhow::anyhow!("document unavailable"))?;
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body to zoom"))?;
    dom::ensure_style(
        &document,
        "fx-kf-zoom",
        &format!(
            "@keyframes fx-zoom{{0%,100%{{transform:scale(1)}}50%{{transform:scale({scale:.3})}}}}"
        ),
    );
    let marker = effect_root(ctx, "position:absolute;width:0;height:0;")?;
    _ = body
        .style()
        .set_property("animation", &format!("fx-zoom {duration}ms ease-in-out"));
    let marker_node = marker.clone();
    let disposable = Disposable::new(move || {
        _ = body.style().remove_property("animation");
        marker_node.remove();
    });
    disposable.attach_to_node(&marker);
    schedule_forced_cleanup(&disposable, cleanup_deadline_ms(ctx, cfg));
    ctx.track(disposable);
    Ok(())
}
