//! Matrix-style text rain: per-column glyph runs with a bright head,
//! wrapping speed-randomized columns and periodic glyph mutation.

use crate::rng::FxRng;
use crate::surface::{Rgba, Surface};

const CHARSET: &[char] = &[
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス', 'セ', 'ソ',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'Z', 'X', 'K', 'R', 'W',
];

pub struct RainColumn {
    pub x: f32,
    /// Head position in cell units.
    pub head: f32,
    pub speed: f32,
    pub glyphs: Vec<char>,
    pub trail: usize,
    mutate_acc: f32,
}

pub struct TextRainField {
    pub columns: Vec<RainColumn>,
    pub cell: f32,
}

impl TextRainField {
    pub fn generate(w: f32, h: f32, cell: f32, rng: &mut FxRng) -> Self {
        let cell = cell.max(6.0);
        let cols = (w / cell).ceil() as usize;
        let rows = (h / cell).ceil() as usize + 2;
        let columns = (0..cols)
            .map(|c| RainColumn {
                x: c as f32 * cell,
                head: rng.range(-(rows as f32), 0.0),
                speed: rng.range(6.0, 22.0),
                glyphs: (0..rows)
                    .map(|_| *rng.pick(CHARSET).unwrap_or(&'0'))
                    .collect(),
                trail: rng.range_i(6, 18) as usize,
                mutate_acc: 0.0,
            })
            .collect();
        Self { columns, cell }
    }

    /// Advance heads, wrap finished columns back above the stage with a
    /// fresh speed, and mutate a few glyphs per column per interval.
    pub fn step(&mut self, dt: f32, h: f32, rng: &mut FxRng) {
        let rows = (h / self.cell).ceil() as f32 + 2.0;
        for col in &mut self.columns {
            col.head += col.speed * dt;
            if col.head - col.trail as f32 > rows {
                col.head = rng.range(-10.0, 0.0);
                col.speed = rng.range(6.0, 22.0);
            }
            col.mutate_acc += dt;
            if col.mutate_acc > 0.09 {
                col.mutate_acc = 0.0;
                let n = col.glyphs.len();
                if n > 0 {
                    let i = rng.range_i(0, (n - 1) as i64) as usize;
                    col.glyphs[i] = *rng.pick(CHARSET).unwrap_or(&'1');
                }
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, h: f32) {
        surface.set_font(&format!("{}px monospace", (self.cell * 0.85) as u32));
        for col in &self.columns {
            let head_row = col.head.floor() as i64;
            for k in 0..=col.trail as i64 {
                let row = head_row - k;
                if row < 0 {
                    continue;
                }
                let y = row as f32 * self.cell;
                if y > h + self.cell {
                    continue;
                }
                let glyph = col.glyphs[(row as usize) % col.glyphs.len()];
                let fade = 1.0 - k as f32 / (col.trail as f32 + 1.0);
                let color = if k == 0 {
                    Rgba::new(0xd8, 0xff, 0xd8, 1.0)
                } else {
                    Rgba::new(0x28, 0xe4, 0x5c, fade * 0.85)
                };
                surface.set_global_alpha(color.a);
                surface.set_fill_color(color);
                let mut buf = [0u8; 4];
                surface.fill_text(glyph.encode_utf8(&mut buf), col.x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FxRng;

    #[test]
    fn columns_cover_the_stage() {
        let mut rng = FxRng::seeded(3);
        let field = TextRainField::generate(320.0, 240.0, 16.0, &mut rng);
        assert_eq!(field.columns.len(), 20);
        assert!(field.columns.iter().all(|c| c.x < 320.0));
    }

    #[test]
    fn heads_wrap_instead_of_running_away() {
        let mut rng = FxRng::seeded(4);
        let mut field = TextRainField::generate(160.0, 120.0, 12.0, &mut rng);
        for _ in 0..2000 {
            field.step(0.05, 120.0, &mut rng);
        }
        let rows = (120.0_f32 / 12.0).ceil() + 2.0;
        for col in &field.columns {
            assert!(col.head - col.trail as f32 <= rows + col.speed * 0.05 + 1.0);
        }
    }

    #[test]
    fn tiny_cell_is_clamped() {
        let mut rng = FxRng::seeded(5);
        let field = TextRainField::generate(100.0, 100.0, 0.0, &mut rng);
        assert!(field.cell >= 6.0);
    }
}
