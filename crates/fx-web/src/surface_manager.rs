//! Overlay root, shared drawing surface and the single shared frame loop.
//!
//! The manager lazily materializes a fixed-position overlay containing one
//! canvas (the particle/theme surface) and one DOM layer (for CSS and
//! canvas sub-effects). It owns exactly one requestAnimationFrame loop:
//! per tick the surface is cleared, the active theme callback runs, then
//! the particle pool is advanced and drawn. The loop self-terminates when
//! neither reports activity and restarts on demand.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use fx_core::particles::ParticleSystem;
use fx_core::surface::Surface;

use crate::canvas_surface::CanvasSurface;
use crate::constants::{MAX_FRAME_DT_SEC, OVERLAY_Z_INDEX, RESIZE_DEBOUNCE_MS};
use crate::dom;
use crate::notify::{EngineEvent, NotificationSink};

/// Per-frame theme callback. Returns whether the theme is still active;
/// an inactive theme is dropped and stops holding the loop open.
pub type ThemeCallback = Box<dyn FnMut(&mut dyn Surface, f32, f32, f32) -> bool>;

pub struct SurfaceManager {
    max_dpr: f64,
    root: Option<web::HtmlElement>,
    canvas: Option<web::HtmlCanvasElement>,
    css_layer: Option<web::HtmlElement>,
    surface: Option<CanvasSurface>,
    css_w: f32,
    css_h: f32,
    particles: Rc<RefCell<ParticleSystem>>,
    theme: Option<ThemeCallback>,
    notifier: Rc<dyn NotificationSink>,
    loop_running: bool,
    raf_id: Option<i32>,
    last_tick: Instant,
    resize_listener: Option<Closure<dyn FnMut()>>,
    resize_timer: Rc<Cell<Option<i32>>>,
    waiting_for_body: bool,
}

impl SurfaceManager {
    pub fn new(
        max_dpr: f64,
        particles: Rc<RefCell<ParticleSystem>>,
        notifier: Rc<dyn NotificationSink>,
    ) -> Self {
        Self {
            max_dpr: if max_dpr.is_finite() && max_dpr >= 1.0 {
                max_dpr
            } else {
                crate::constants::DEFAULT_MAX_DPR
            },
            root: None,
            canvas: None,
            css_layer: None,
            surface: None,
            css_w: 0.0,
            css_h: 0.0,
            particles,
            theme: None,
            notifier,
            loop_running: false,
            raf_id: None,
            last_tick: Instant::now(),
            resize_listener: None,
            resize_timer: Rc::new(Cell::new(None)),
            waiting_for_body: false,
        }
    }

    pub fn has_overlay(&self) -> bool {
        self.root.is_some()
    }

    pub fn stage_size(&self) -> (f32, f32) {
        (self.css_w, self.css_h)
    }

    pub fn css_layer(&self) -> Option<web::HtmlElement> {
        self.css_layer.clone()
    }

    pub fn document(&self) -> Option<web::Document> {
        dom::window_document().map(|(_, d)| d)
    }

    pub fn set_theme(&mut self, theme: Option<ThemeCallback>) {
        self.theme = theme;
    }

    /// Effective device pixel ratio: raw DPR clamped to the configured
    /// maximum.
    fn effective_dpr(&self, window: &web::Window) -> f64 {
        let raw = window.device_pixel_ratio();
        if raw.is_finite() && raw > 0.0 {
            raw.min(self.max_dpr)
        } else {
            1.0
        }
    }

    /// Recompute sizes after a resize signal. Device pixels are
    /// `ceil(css × dpr)` clamped to at least 1 per axis; the canvas
    /// transform is rescaled so drawing stays in logical pixels.
    fn sync_backing_size(&mut self) {
        let Some((window, _)) = dom::window_document() else {
            return;
        };
        let Some(canvas) = &self.canvas else {
            return;
        };
        let css_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
            .max(1.0) as f32;
        let css_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
            .max(1.0) as f32;
        let dpr = self.effective_dpr(&window);
        dom::size_canvas_backing(canvas, css_w, css_h, dpr);
        self.css_w = css_w;
        self.css_h = css_h;
        self.notifier.notify(&EngineEvent::CanvasResized {
            width: css_w,
            height: css_h,
        });
    }

    /// One shared-loop tick. Returns whether the loop should keep going.
    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = (now - self.last_tick).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_tick = now;
        let (w, h) = (self.css_w, self.css_h);
        let Some(surface) = &mut self.surface else {
            return false;
        };
        surface.clear(w, h);
        // theme first: it may influence emission in the same frame
        let mut theme_done = false;
        if let Some(theme) = self.theme.as_mut() {
            theme_done = !theme(&mut *surface, dt, w, h);
        }
        if theme_done {
            self.theme = None;
        }
        self.particles
            .borrow_mut()
            .update_and_draw(&mut *surface, dt, w, h);
        self.theme.is_some() || self.particles.borrow().has_active_particles()
    }
}

/// Idempotent overlay construction. Defers via a one-shot document-ready
/// listener when the body is not yet available. Returns false on failure,
/// never throws.
pub fn ensure_overlay(mgr: &Rc<RefCell<SurfaceManager>>) -> bool {
    if mgr.borrow().root.is_some() {
        return true;
    }
    let Some((window, document)) = dom::window_document() else {
        return false;
    };
    if document.body().is_none() {
        let mut m = mgr.borrow_mut();
        if !m.waiting_for_body {
            m.waiting_for_body = true;
            drop(m);
            let mgr_retry = mgr.clone();
            let retry = Closure::once_into_js(move || {
                mgr_retry.borrow_mut().waiting_for_body = false;
                ensure_overlay(&mgr_retry);
            });
            _ = document.add_event_listener_with_callback(
                "DOMContentLoaded",
                retry.unchecked_ref(),
            );
        }
        return false;
    }
    let Some(body) = document.body() else {
        return false;
    };

    let Some(root) = dom::create_div(
        &document,
        &format!(
            "position:fixed;inset:0;pointer-events:none;overflow:hidden;z-index:{OVERLAY_Z_INDEX};"
        ),
    ) else {
        return false;
    };
    let Some(canvas) = dom::create_canvas(
        &document,
        "position:absolute;inset:0;width:100%;height:100%;",
    ) else {
        return false;
    };
    let Some(css_layer) = dom::create_div(&document, "position:absolute;inset:0;") else {
        return false;
    };
    if root.append_child(&canvas).is_err()
        || root.append_child(&css_layer).is_err()
        || body.append_child(&root).is_err()
    {
        root.remove();
        return false;
    }
    let Some(surface) = CanvasSurface::from_canvas(&canvas) else {
        // no 2D context in this environment
        root.remove();
        return false;
    };

    {
        let mut m = mgr.borrow_mut();
        m.root = Some(root.clone());
        m.canvas = Some(canvas.clone());
        m.css_layer = Some(css_layer.clone());
        m.surface = Some(surface);
        m.sync_backing_size();
    }

    // debounced window resize -> backing-size resync
    let mgr_resize = mgr.clone();
    let timer_slot = mgr.borrow().resize_timer.clone();
    let listener = Closure::<dyn FnMut()>::new(move || {
        if let Some(old) = timer_slot.take() {
            dom::clear_timeout(old);
        }
        let mgr_fire = mgr_resize.clone();
        let slot_fire = timer_slot.clone();
        let id = dom::set_timeout(
            move || {
                slot_fire.set(None);
                mgr_fire.borrow_mut().sync_backing_size();
            },
            RESIZE_DEBOUNCE_MS,
        );
        timer_slot.set(id);
    });
    _ = window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
    mgr.borrow_mut().resize_listener = Some(listener);

    mgr.borrow().notifier.notify(&EngineEvent::OverlayReady {
        root,
        canvas,
        css_layer,
    });
    true
}

/// Stop the loop, clear the surface, drop every owned node and reset size
/// state. Safe to call repeatedly.
pub fn remove_overlay(mgr: &Rc<RefCell<SurfaceManager>>) {
    let mut m = mgr.borrow_mut();
    if m.root.is_none() {
        return;
    }
    if let Some(id) = m.raf_id.take() {
        dom::cancel_frame(id);
    }
    m.loop_running = false;
    m.theme = None;
    let remaining = {
        let mut pool = m.particles.borrow_mut();
        pool.clear_all();
        pool.len()
    };
    m.notifier.notify(&EngineEvent::ParticlesCleared { remaining });
    let (w, h) = (m.css_w, m.css_h);
    if let Some(surface) = &mut m.surface {
        surface.clear(w, h);
    }
    if let Some(listener) = m.resize_listener.take() {
        if let Some(w) = web::window() {
            _ = w.remove_event_listener_with_callback(
                "resize",
                listener.as_ref().unchecked_ref(),
            );
        }
    }
    if let Some(id) = m.resize_timer.take() {
        dom::clear_timeout(id);
    }
    if let Some(root) = m.root.take() {
        root.remove();
    }
    m.canvas = None;
    m.css_layer = None;
    m.surface = None;
    m.css_w = 0.0;
    m.css_h = 0.0;
    m.notifier.notify(&EngineEvent::OverlayRemoved);
}

/// Start the shared loop if it is idle. Call after appending particles or
/// installing a theme.
pub fn request_frame(mgr: &Rc<RefCell<SurfaceManager>>) {
    {
        let m = mgr.borrow();
        if m.loop_running || m.root.is_none() {
            return;
        }
    }
    {
        let mut m = mgr.borrow_mut();
        m.loop_running = true;
        m.last_tick = Instant::now();
    }
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let mgr_tick = mgr.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let keep_going = mgr_tick.borrow_mut().frame();
        if keep_going {
            let id = tick_clone
                .borrow()
                .as_ref()
                .and_then(dom::request_frame);
            mgr_tick.borrow_mut().raf_id = id;
        } else {
            let mut m = mgr_tick.borrow_mut();
            m.loop_running = false;
            m.raf_id = None;
        }
    }) as Box<dyn FnMut()>));
    let id = tick.borrow().as_ref().and_then(dom::request_frame);
    mgr.borrow_mut().raf_id = id;
}
