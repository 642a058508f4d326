//! Abstract 2D drawing capability.
//!
//! Every particle variant and procedural generator renders through this
//! trait so the simulation can run headlessly. The web frontend provides a
//! `CanvasRenderingContext2d` implementation; tests use [`NullSurface`] or
//! the counting [`TraceSurface`].

/// 8-bit RGB color with a float alpha channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string, e.g. `rgba(255,0,0,0.50)`.
    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            self.a.clamp(0.0, 1.0)
        )
    }

    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
}

/// Minimal 2D surface in logical-pixel coordinates.
pub trait Surface {
    fn clear(&mut self, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    /// Append a full circle sub-path centered at (x, y).
    fn circle(&mut self, x: f32, y: f32, r: f32);
    /// Append a rotated ellipse sub-path.
    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, rotation: f32);

    fn set_fill_color(&mut self, color: Rgba);
    fn set_stroke_color(&mut self, color: Rgba);
    fn set_line_width(&mut self, w: f32);
    fn set_global_alpha(&mut self, a: f32);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn set_font(&mut self, font: &str);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

/// Surface that discards everything. Used to advance simulations in tests
/// without rendering.
#[derive(Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self, _w: f32, _h: f32) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _x: f32, _y: f32) {}
    fn line_to(&mut self, _x: f32, _y: f32) {}
    fn quad_to(&mut self, _cx: f32, _cy: f32, _x: f32, _y: f32) {}
    fn close_path(&mut self) {}
    fn fill(&mut self) {}
    fn stroke(&mut self) {}
    fn circle(&mut self, _x: f32, _y: f32, _r: f32) {}
    fn ellipse(&mut self, _x: f32, _y: f32, _rx: f32, _ry: f32, _rotation: f32) {}
    fn set_fill_color(&mut self, _color: Rgba) {}
    fn set_stroke_color(&mut self, _color: Rgba) {}
    fn set_line_width(&mut self, _w: f32) {}
    fn set_global_alpha(&mut self, _a: f32) {}
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _x: f32, _y: f32) {}
    fn rotate(&mut self, _radians: f32) {}
    fn scale(&mut self, _sx: f32, _sy: f32) {}
    fn set_font(&mut self, _font: &str) {}
    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32) {}
}

/// Surface that counts draw operations and records translation targets.
///
/// Enough bookkeeping to assert "was drawn" and "where was it drawn"
/// without rasterizing anything.
#[derive(Default)]
pub struct TraceSurface {
    pub fills: usize,
    pub strokes: usize,
    pub rects: usize,
    pub texts: usize,
    pub translates: Vec<(f32, f32)>,
    pub lines: Vec<(f32, f32)>,
}

impl Surface for TraceSurface {
    fn clear(&mut self, _w: f32, _h: f32) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.rects += 1;
    }
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _x: f32, _y: f32) {}
    fn line_to(&mut self, x: f32, y: f32) {
        self.lines.push((x, y));
    }
    fn quad_to(&mut self, _cx: f32, _cy: f32, _x: f32, _y: f32) {}
    fn close_path(&mut self) {}
    fn fill(&mut self) {
        self.fills += 1;
    }
    fn stroke(&mut self) {
        self.strokes += 1;
    }
    fn circle(&mut self, _x: f32, _y: f32, _r: f32) {}
    fn ellipse(&mut self, _x: f32, _y: f32, _rx: f32, _ry: f32, _rotation: f32) {}
    fn set_fill_color(&mut self, _color: Rgba) {}
    fn set_stroke_color(&mut self, _color: Rgba) {}
    fn set_line_width(&mut self, _w: f32) {}
    fn set_global_alpha(&mut self, _a: f32) {}
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, x: f32, y: f32) {
        self.translates.push((x, y));
    }
    fn rotate(&mut self, _radians: f32) {}
    fn scale(&mut self, _sx: f32, _sy: f32) {}
    fn set_font(&mut self, _font: &str) {}
    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32) {
        self.texts += 1;
    }
}
