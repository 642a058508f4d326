use crate::kinetics::{apply_drag, fade_envelope, out_of_bounds, wobble};
use crate::rng::FxRng;
use crate::surface::{Rgba, Surface};

use super::{Particle, ParticleKind};

const GRAVITY: f32 = 240.0;
const DRAG: f32 = 0.6;
const OOB_MARGIN: f32 = 40.0;

const PALETTE: &[Rgba] = &[
    Rgba::opaque(0xf9, 0x4f, 0x6d),
    Rgba::opaque(0xff, 0xb3, 0x40),
    Rgba::opaque(0xff, 0xe9, 0x4e),
    Rgba::opaque(0x53, 0xd7, 0x69),
    Rgba::opaque(0x3c, 0xa8, 0xf6),
    Rgba::opaque(0xb8, 0x6e, 0xff),
];

/// Paper-scrap confetti: gravity, drag, sinusoidal wobble, and a
/// tilt-based vertical squash on draw.
pub struct Confetti {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    size: f32,
    color: Rgba,
    rotation: f32,
    rot_speed: f32,
    wobble_phase: f32,
    wobble_freq: f32,
    wobble_amp: f32,
    tilt: f32,
    tilt_speed: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Confetti {
    pub fn new(w: f32, _h: f32, life_s: f32, size_min: f32, size_max: f32, rng: &mut FxRng) -> Self {
        let color = *rng.pick(PALETTE).unwrap_or(&Rgba::WHITE);
        Self {
            x: rng.range(0.0, w),
            y: rng.range(-36.0, -6.0),
            vx: rng.range(-60.0, 60.0),
            vy: rng.range(40.0, 140.0),
            size: rng.range(size_min, size_max),
            color,
            rotation: rng.range(0.0, std::f32::consts::TAU),
            rot_speed: rng.range(-4.0, 4.0),
            wobble_phase: rng.range(0.0, std::f32::consts::TAU),
            wobble_freq: rng.range(3.0, 7.0),
            wobble_amp: rng.range(18.0, 46.0),
            tilt: rng.range(0.0, std::f32::consts::TAU),
            tilt_speed: rng.range(2.0, 6.0),
            age: 0.0,
            life: life_s * rng.range(0.75, 1.0),
            alive: true,
        }
    }
}

impl Particle for Confetti {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.vy += GRAVITY * dt;
        self.vx = apply_drag(self.vx, DRAG, dt);
        self.vy = apply_drag(self.vy, DRAG * 0.25, dt);
        self.wobble_phase += self.wobble_freq * dt;
        self.x += (self.vx + wobble(self.wobble_phase, self.wobble_amp)) * dt;
        self.y += self.vy * dt;
        self.rotation += self.rot_speed * dt;
        self.tilt += self.tilt_speed * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, OOB_MARGIN) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.05, 0.25);
        let squash = self.tilt.cos().abs().max(0.15);
        surface.save();
        surface.translate(self.x, self.y);
        surface.rotate(self.rotation);
        surface.set_global_alpha(alpha);
        surface.set_fill_color(self.color);
        surface.fill_rect(
            -self.size * 0.5,
            -self.size * 0.5 * squash,
            self.size,
            self.size * squash,
        );
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Confetti
    }
}
