//! Fire, water-spray and ember variants.

use crate::kinetics::{fade_envelope, lerp, out_of_bounds, wobble};
use crate::rng::FxRng;
use crate::surface::{Rgba, Surface};

use super::{Particle, ParticleKind};

/// Flame tongue: rises from the emitter line, shrinks, and cools from
/// yellow through orange to deep red over its life.
pub struct Flame {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    sway_phase: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Flame {
    pub fn new(w: f32, h: f32, life_s: f32, origin_y_frac: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(w * 0.1, w * 0.9),
            y: h * origin_y_frac + rng.range(-6.0, 6.0),
            vx: rng.range(-16.0, 16.0),
            vy: rng.range(-160.0, -80.0),
            radius: rng.range(4.0, 11.0),
            sway_phase: rng.range(0.0, std::f32::consts::TAU),
            age: 0.0,
            life: life_s * rng.range(0.5, 1.0),
            alive: true,
        }
    }
}

impl Particle for Flame {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.sway_phase += 5.0 * dt;
        self.x += (self.vx + wobble(self.sway_phase, 14.0)) * dt;
        self.y += self.vy * dt;
        self.radius = (self.radius - 3.0 * dt).max(0.5);
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 30.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let t = (self.age / self.life).clamp(0.0, 1.0);
        let alpha = fade_envelope(self.age, self.life, 0.08, 0.4);
        // yellow -> orange -> red ramp
        let r = 0xff;
        let g = lerp(0xd9 as f32, 0x32 as f32, t) as u8;
        let b = lerp(0x4e as f32, 0x12 as f32, t) as u8;
        surface.set_global_alpha(alpha * 0.9);
        surface.set_fill_color(Rgba::opaque(r, g, b));
        surface.begin_path();
        surface.circle(self.x, self.y, self.radius);
        surface.fill();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Fire
    }
}

/// Ballistic water droplet sprayed from a point; dies on the floor.
pub struct Droplet {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    age: f32,
    life: f32,
    alive: bool,
}

const DROPLET_GRAVITY: f32 = 680.0;

impl Droplet {
    pub fn new(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        let angle = rng.range(-2.6, -0.5); // upward fan
        let speed = rng.range(180.0, 420.0);
        Self {
            x: w * 0.5 + rng.range(-20.0, 20.0),
            y: h * 0.7,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            radius: rng.range(1.5, 3.5),
            age: 0.0,
            life: life_s * rng.range(0.6, 1.0),
            alive: true,
        }
    }
}

impl Particle for Droplet {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.vy += DROPLET_GRAVITY * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        if self.age >= self.life || self.y > h + 4.0 || out_of_bounds(self.x, self.y, w, h, 20.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.05, 0.2);
        surface.set_global_alpha(alpha * 0.85);
        surface.set_fill_color(Rgba::opaque(0x8f, 0xc8, 0xf2));
        surface.begin_path();
        surface.circle(self.x, self.y, self.radius);
        surface.fill();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Water
    }
}

/// Slowly rising spark with a flicker and a lazy drift.
pub struct Ember {
    x: f32,
    y: f32,
    vy: f32,
    drift_phase: f32,
    drift_freq: f32,
    drift_amp: f32,
    radius: f32,
    flicker_seed: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Ember {
    pub fn new(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: h + rng.range(0.0, 24.0),
            vy: rng.range(-60.0, -24.0),
            drift_phase: rng.range(0.0, std::f32::consts::TAU),
            drift_freq: rng.range(0.6, 1.6),
            drift_amp: rng.range(10.0, 26.0),
            radius: rng.range(1.2, 3.0),
            flicker_seed: rng.range(0.0, 100.0),
            age: 0.0,
            life: life_s * rng.range(0.6, 1.0),
            alive: true,
        }
    }
}

impl Particle for Ember {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.drift_phase += self.drift_freq * dt;
        self.x += wobble(self.drift_phase, self.drift_amp) * dt;
        self.y += self.vy * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 30.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let flicker = 0.7 + 0.3 * (self.age * 17.0 + self.flicker_seed).sin();
        let alpha = fade_envelope(self.age, self.life, 0.15, 0.35) * flicker;
        surface.set_global_alpha(alpha);
        surface.set_fill_color(Rgba::opaque(0xff, 0x8c, 0x2e));
        surface.begin_path();
        surface.circle(self.x, self.y, self.radius * flicker);
        surface.fill();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Ember
    }
}
