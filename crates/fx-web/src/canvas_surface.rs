//! `Surface` implemented over `CanvasRenderingContext2d`.

use fx_core::surface::{Rgba, Surface};
use web_sys as web;

pub struct CanvasSurface {
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Wrap a canvas, `None` when no 2D context is available.
    pub fn from_canvas(canvas: &web::HtmlCanvasElement) -> Option<Self> {
        crate::dom::context_2d(canvas).map(Self::new)
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, w: f32, h: f32) {
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.ctx
            .quadratic_curve_to(cx as f64, cy as f64, x as f64, y as f64);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn circle(&mut self, x: f32, y: f32, r: f32) {
        _ = self.ctx.arc(
            x as f64,
            y as f64,
            r.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
    }

    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, rotation: f32) {
        _ = self.ctx.ellipse(
            x as f64,
            y as f64,
            rx.max(0.0) as f64,
            ry.max(0.0) as f64,
            rotation as f64,
            0.0,
            std::f64::consts::TAU,
        );
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.css());
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.css());
    }

    fn set_line_width(&mut self, w: f32) {
        self.ctx.set_line_width(w as f64);
    }

    fn set_global_alpha(&mut self, a: f32) {
        self.ctx.set_global_alpha(a.clamp(0.0, 1.0) as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        _ = self.ctx.translate(x as f64, y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        _ = self.ctx.rotate(radians as f64);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        _ = self.ctx.scale(sx as f64, sy as f64);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        _ = self.ctx.fill_text(text, x as f64, y as f64);
    }
}
