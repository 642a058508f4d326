//! Slow ambient variants: sparkles, glitter, dust motes, smoke, bubbles
//! and drifting leaves.

use crate::kinetics::{fade_envelope, out_of_bounds, wobble};
use crate::rng::FxRng;
use crate::surface::{Rgba, Surface};

use super::{Particle, ParticleKind};

/// Four-armed twinkle. Stays near its spawn point and pulses.
pub struct Sparkle {
    x: f32,
    y: f32,
    drift_x: f32,
    drift_y: f32,
    radius: f32,
    twinkle_phase: f32,
    twinkle_freq: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Sparkle {
    pub fn new(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: rng.range(0.0, h),
            drift_x: rng.range(-8.0, 8.0),
            drift_y: rng.range(-8.0, 8.0),
            radius: rng.range(2.0, 6.0),
            twinkle_phase: rng.range(0.0, std::f32::consts::TAU),
            twinkle_freq: rng.range(6.0, 12.0),
            age: 0.0,
            life: life_s * rng.range(0.5, 1.0),
            alive: true,
        }
    }
}

impl Particle for Sparkle {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.twinkle_phase += self.twinkle_freq * dt;
        self.x += self.drift_x * dt;
        self.y += self.drift_y * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 10.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let pulse = 0.6 + 0.4 * self.twinkle_phase.sin();
        let alpha = fade_envelope(self.age, self.life, 0.2, 0.3) * pulse;
        let r = self.radius * pulse;
        surface.save();
        surface.translate(self.x, self.y);
        surface.set_global_alpha(alpha);
        surface.set_fill_color(Rgba::opaque(0xff, 0xf7, 0xd0));
        // four thin arms
        surface.fill_rect(-r, -r * 0.18, r * 2.0, r * 0.36);
        surface.fill_rect(-r * 0.18, -r, r * 0.36, r * 2.0);
        surface.begin_path();
        surface.circle(0.0, 0.0, r * 0.35);
        surface.fill();
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Sparkle
    }
}

/// Tiny falling flecks with a fast random flicker.
pub struct Glitter {
    x: f32,
    y: f32,
    vy: f32,
    size: f32,
    color: Rgba,
    flicker_seed: f32,
    age: f32,
    life: f32,
    alive: bool,
}

const GLITTER_PALETTE: &[Rgba] = &[
    Rgba::opaque(0xff, 0xd7, 0x00),
    Rgba::opaque(0xe8, 0xe8, 0xff),
    Rgba::opaque(0xff, 0xa8, 0xe0),
    Rgba::opaque(0xa8, 0xff, 0xe8),
];

impl Glitter {
    pub fn new(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: rng.range(-6.0, h * 0.6),
            vy: rng.range(24.0, 60.0),
            size: rng.range(1.5, 3.5),
            color: *rng.pick(GLITTER_PALETTE).unwrap_or(&Rgba::WHITE),
            flicker_seed: rng.range(0.0, 100.0),
            age: 0.0,
            life: life_s * rng.range(0.6, 1.0),
            alive: true,
        }
    }
}

impl Particle for Glitter {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.y += self.vy * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 8.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        // cheap deterministic flicker, no per-frame rng needed
        let flicker = ((self.age * 31.0 + self.flicker_seed).sin() * 43758.547).fract().abs();
        let alpha = fade_envelope(self.age, self.life, 0.1, 0.2) * (0.3 + 0.7 * flicker);
        surface.set_global_alpha(alpha);
        surface.set_fill_color(self.color);
        surface.fill_rect(
            self.x - self.size * 0.5,
            self.y - self.size * 0.5,
            self.size,
            self.size,
        );
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Glitter
    }
}

/// Slow mote that drifts on crossed sinusoids. Long-lived.
pub struct Dust {
    x: f32,
    y: f32,
    base_vx: f32,
    sway_phase: f32,
    sway_freq: f32,
    sway_amp: f32,
    radius: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Dust {
    pub fn new(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: rng.range(0.0, h),
            base_vx: rng.range(-12.0, 12.0),
            sway_phase: rng.range(0.0, std::f32::consts::TAU),
            sway_freq: rng.range(0.4, 1.2),
            sway_amp: rng.range(4.0, 14.0),
            radius: rng.range(0.8, 2.4),
            age: 0.0,
            life: life_s * rng.range(0.7, 1.0),
            alive: true,
        }
    }
}

impl Particle for Dust {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.sway_phase += self.sway_freq * dt;
        self.x += (self.base_vx + wobble(self.sway_phase, self.sway_amp)) * dt;
        self.y += wobble(self.sway_phase * 0.7, self.sway_amp * 0.5) * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 20.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.25, 0.25) * 0.5;
        surface.set_global_alpha(alpha);
        surface.set_fill_color(Rgba::opaque(0xd8, 0xd2, 0xc4));
        surface.begin_path();
        surface.circle(self.x, self.y, self.radius);
        surface.fill();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Dust
    }
}

/// Rising puff that expands while it fades.
pub struct Smoke {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    grow: f32,
    sway_phase: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Smoke {
    pub fn new(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(w * 0.2, w * 0.8),
            y: h + rng.range(0.0, 30.0),
            vx: rng.range(-10.0, 10.0),
            vy: rng.range(-70.0, -35.0),
            radius: rng.range(8.0, 18.0),
            grow: rng.range(6.0, 14.0),
            sway_phase: rng.range(0.0, std::f32::consts::TAU),
            age: 0.0,
            life: life_s * rng.range(0.7, 1.0),
            alive: true,
        }
    }
}

impl Particle for Smoke {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.sway_phase += 0.9 * dt;
        self.x += (self.vx + wobble(self.sway_phase, 12.0)) * dt;
        self.y += self.vy * dt;
        self.radius += self.grow * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 80.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.15, 0.5) * 0.35;
        surface.set_global_alpha(alpha);
        surface.set_fill_color(Rgba::opaque(0x9a, 0x9a, 0xa2));
        surface.begin_path();
        surface.circle(self.x, self.y, self.radius);
        surface.fill();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Smoke
    }
}

/// Rising soap bubble with a highlight arc. Pops (dies) at the top edge.
pub struct Bubble {
    x: f32,
    y: f32,
    vy: f32,
    radius: f32,
    wobble_phase: f32,
    wobble_freq: f32,
    wobble_amp: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Bubble {
    pub fn new(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: h + rng.range(4.0, 40.0),
            vy: rng.range(-90.0, -40.0),
            radius: rng.range(4.0, 16.0),
            wobble_phase: rng.range(0.0, std::f32::consts::TAU),
            wobble_freq: rng.range(1.5, 3.5),
            wobble_amp: rng.range(10.0, 26.0),
            age: 0.0,
            life: life_s * rng.range(0.7, 1.0),
            alive: true,
        }
    }
}

impl Particle for Bubble {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.wobble_phase += self.wobble_freq * dt;
        self.x += wobble(self.wobble_phase, self.wobble_amp) * dt;
        self.y += self.vy * dt;
        if self.age >= self.life
            || self.y < -self.radius
            || out_of_bounds(self.x, self.y, w, h, 40.0)
        {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.1, 0.2);
        surface.save();
        surface.set_global_alpha(alpha * 0.85);
        surface.set_stroke_color(Rgba::opaque(0xcf, 0xec, 0xff));
        surface.set_line_width(1.2);
        surface.begin_path();
        surface.circle(self.x, self.y, self.radius);
        surface.stroke();
        // highlight
        surface.set_fill_color(Rgba::new(0xff, 0xff, 0xff, 0.7));
        surface.begin_path();
        surface.circle(
            self.x - self.radius * 0.35,
            self.y - self.radius * 0.35,
            self.radius * 0.2,
        );
        surface.fill();
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Bubble
    }
}

const LEAF_PALETTE: &[Rgba] = &[
    Rgba::opaque(0xc9, 0x6b, 0x2a),
    Rgba::opaque(0xa8, 0x52, 0x1f),
    Rgba::opaque(0xd9, 0x9a, 0x30),
    Rgba::opaque(0x7d, 0x8a, 0x2e),
];

/// Falling leaf: heavy sway, flutter rotation tied to the sway.
pub struct Leaf {
    x: f32,
    y: f32,
    vy: f32,
    sway_phase: f32,
    sway_freq: f32,
    sway_amp: f32,
    size: f32,
    color: Rgba,
    age: f32,
    life: f32,
    alive: bool,
}

impl Leaf {
    pub fn new(w: f32, _h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: rng.range(-38.0, -6.0),
            vy: rng.range(28.0, 70.0),
            sway_phase: rng.range(0.0, std::f32::consts::TAU),
            sway_freq: rng.range(1.0, 2.2),
            sway_amp: rng.range(30.0, 70.0),
            size: rng.range(6.0, 13.0),
            color: *rng.pick(LEAF_PALETTE).unwrap_or(&Rgba::WHITE),
            age: 0.0,
            life: life_s * rng.range(0.7, 1.0),
            alive: true,
        }
    }
}

impl Particle for Leaf {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.sway_phase += self.sway_freq * dt;
        self.x += wobble(self.sway_phase, self.sway_amp) * dt;
        self.y += self.vy * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 40.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.1, 0.2);
        // flutter follows the sway derivative so the leaf banks into turns
        let bank = self.sway_phase.cos() * 0.9;
        surface.save();
        surface.translate(self.x, self.y);
        surface.rotate(bank);
        surface.set_global_alpha(alpha);
        surface.set_fill_color(self.color);
        surface.begin_path();
        surface.ellipse(0.0, 0.0, self.size, self.size * 0.55, 0.4);
        surface.fill();
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Leaf
    }
}
