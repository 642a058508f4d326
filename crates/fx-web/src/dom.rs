//! Small DOM helpers shared by the surface manager and effect handlers.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

pub fn create_div(document: &web::Document, css_text: &str) -> Option<web::HtmlElement> {
    let el = document.create_element("div").ok()?;
    let el: web::HtmlElement = el.dyn_into().ok()?;
    el.style().set_css_text(css_text);
    Some(el)
}

pub fn create_canvas(document: &web::Document, css_text: &str) -> Option<web::HtmlCanvasElement> {
    let el = document.create_element("canvas").ok()?;
    let el: web::HtmlCanvasElement = el.dyn_into().ok()?;
    el.style().set_css_text(css_text);
    Some(el)
}

/// 2D context for a canvas, `None` when the environment lacks one.
pub fn context_2d(canvas: &web::HtmlCanvasElement) -> Option<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|o| o.dyn_into::<web::CanvasRenderingContext2d>().ok())
}

/// Size a canvas's backing store to `css × dpr` device pixels (at least
/// one per axis) and rescale its transform so drawing code stays in
/// logical pixels.
pub fn size_canvas_backing(
    canvas: &web::HtmlCanvasElement,
    css_w: f32,
    css_h: f32,
    dpr: f64,
) {
    let device_w = ((css_w as f64 * dpr).ceil() as u32).max(1);
    let device_h = ((css_h as f64 * dpr).ceil() as u32).max(1);
    canvas.set_width(device_w);
    canvas.set_height(device_h);
    if let Some(ctx) = context_2d(canvas) {
        _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }
}

pub fn request_frame(closure: &Closure<dyn FnMut()>) -> Option<i32> {
    web::window()?
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}

pub fn cancel_frame(id: i32) {
    if let Some(w) = web::window() {
        _ = w.cancel_animation_frame(id);
    }
}

/// One-shot timeout. The closure is freed after it fires; a cancelled
/// timer's closure is reclaimed by the JS GC.
pub fn set_timeout(f: impl FnOnce() + 'static, delay_ms: i32) -> Option<i32> {
    let window = web::window()?;
    let closure = Closure::once_into_js(f);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.unchecked_ref(),
            delay_ms.max(0),
        )
        .ok()
}

pub fn clear_timeout(id: i32) {
    if let Some(w) = web::window() {
        w.clear_timeout_with_handle(id);
    }
}

/// Inject a `<style>` element once per id (keyframes for CSS effects).
pub fn ensure_style(document: &web::Document, id: &str, css: &str) {
    if document.get_element_by_id(id).is_some() {
        return;
    }
    let Ok(style) = document.create_element("style") else {
        return;
    };
    style.set_id(id);
    style.set_text_content(Some(css));
    if let Some(head) = document.head() {
        _ = head.append_child(&style);
    } else if let Some(body) = document.body() {
        _ = body.append_child(&style);
    }
}

/// Store an arbitrary JS value as a property on a node.
pub fn set_node_prop(node: &web::Element, key: &str, value: &JsValue) {
    _ = js_sys::Reflect::set(node.as_ref(), &JsValue::from_str(key), value);
}
