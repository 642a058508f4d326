//! Event variants: eggs, firework shells, seasonal emoji and falling
//! stars.

use smallvec::SmallVec;

use crate::kinetics::{fade_envelope, out_of_bounds, wobble};
use crate::rng::FxRng;
use crate::surface::{Rgba, Surface};

use super::{Particle, ParticleKind};

const EGG_PALETTE: &[Rgba] = &[
    Rgba::opaque(0xf6, 0xd4, 0xe2),
    Rgba::opaque(0xcd, 0xe8, 0xf6),
    Rgba::opaque(0xfb, 0xf0, 0xc8),
    Rgba::opaque(0xd5, 0xf0, 0xcd),
];

/// Decorated egg tumbling down.
pub struct Egg {
    x: f32,
    y: f32,
    vy: f32,
    rotation: f32,
    rot_speed: f32,
    size: f32,
    color: Rgba,
    age: f32,
    life: f32,
    alive: bool,
}

impl Egg {
    pub fn new(w: f32, _h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: rng.range(-28.0, -6.0),
            vy: rng.range(60.0, 130.0),
            rotation: rng.range(0.0, std::f32::consts::TAU),
            rot_speed: rng.range(-2.0, 2.0),
            size: rng.range(7.0, 13.0),
            color: *rng.pick(EGG_PALETTE).unwrap_or(&Rgba::WHITE),
            age: 0.0,
            life: life_s * rng.range(0.7, 1.0),
            alive: true,
        }
    }
}

impl Particle for Egg {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.y += self.vy * dt;
        self.rotation += self.rot_speed * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 30.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.1, 0.15);
        surface.save();
        surface.translate(self.x, self.y);
        surface.rotate(self.rotation);
        surface.set_global_alpha(alpha);
        surface.set_fill_color(self.color);
        surface.begin_path();
        surface.ellipse(0.0, 0.0, self.size * 0.72, self.size, 0.0);
        surface.fill();
        // band
        surface.set_fill_color(self.color.with_alpha(0.6));
        surface.fill_rect(-self.size * 0.72, -self.size * 0.18, self.size * 1.44, self.size * 0.36);
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Egg
    }
}

struct Spark {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    age: f32,
    life: f32,
}

enum FireworkPhase {
    Rising,
    /// Burst sparks are owned by the shell itself so the pool never has
    /// to be mutated mid-iteration.
    Burst {
        sparks: SmallVec<[Spark; 48]>,
    },
}

const SPARK_GRAVITY: f32 = 160.0;

/// Firework: a rising shell that bursts at apex into radial sparks.
pub struct Firework {
    x: f32,
    y: f32,
    vy: f32,
    apex_y: f32,
    color: Rgba,
    spark_count: usize,
    phase: FireworkPhase,
    age: f32,
    life: f32,
    alive: bool,
}

const FIREWORK_PALETTE: &[Rgba] = &[
    Rgba::opaque(0xff, 0x5a, 0x5a),
    Rgba::opaque(0x5a, 0xb8, 0xff),
    Rgba::opaque(0xff, 0xd2, 0x5a),
    Rgba::opaque(0x7d, 0xff, 0x8a),
    Rgba::opaque(0xe8, 0x7d, 0xff),
];

impl Firework {
    pub fn new(w: f32, h: f32, life_s: f32, spark_count: usize, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(w * 0.15, w * 0.85),
            y: h + rng.range(0.0, 30.0),
            vy: rng.range(-620.0, -440.0),
            apex_y: rng.range(h * 0.15, h * 0.45),
            color: *rng.pick(FIREWORK_PALETTE).unwrap_or(&Rgba::WHITE),
            spark_count: spark_count.max(8),
            phase: FireworkPhase::Rising,
            age: 0.0,
            life: life_s,
            alive: true,
        }
    }

    fn burst(&mut self) {
        // deterministic fan; the launch randomness already decorrelates shells
        let mut sparks = SmallVec::new();
        for i in 0..self.spark_count {
            let a = i as f32 * std::f32::consts::TAU / self.spark_count as f32;
            let speed = 120.0 + 80.0 * ((i * 7 % 13) as f32 / 13.0);
            sparks.push(Spark {
                x: self.x,
                y: self.y,
                vx: a.cos() * speed,
                vy: a.sin() * speed,
                age: 0.0,
                life: 0.9 + 0.6 * ((i * 5 % 11) as f32 / 11.0),
            });
        }
        self.phase = FireworkPhase::Burst { sparks };
    }
}

impl Particle for Firework {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        if self.age >= self.life {
            self.alive = false;
            return;
        }
        match &mut self.phase {
            FireworkPhase::Rising => {
                self.y += self.vy * dt;
                self.vy += 120.0 * dt; // decelerate toward apex
                if self.y <= self.apex_y || self.vy >= -40.0 {
                    self.burst();
                }
                if out_of_bounds(self.x, self.y, w, h, 60.0) {
                    self.alive = false;
                }
            }
            FireworkPhase::Burst { sparks } => {
                let mut any = false;
                for s in sparks.iter_mut() {
                    s.age += dt;
                    if s.age < s.life {
                        any = true;
                        s.vy += SPARK_GRAVITY * dt;
                        s.x += s.vx * dt;
                        s.y += s.vy * dt;
                    }
                }
                if !any {
                    self.alive = false;
                }
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        match &self.phase {
            FireworkPhase::Rising => {
                surface.set_global_alpha(0.9);
                surface.set_fill_color(Rgba::opaque(0xff, 0xe8, 0xc8));
                surface.begin_path();
                surface.circle(self.x, self.y, 2.2);
                surface.fill();
            }
            FireworkPhase::Burst { sparks } => {
                surface.set_fill_color(self.color);
                for s in sparks.iter() {
                    if s.age >= s.life {
                        continue;
                    }
                    let alpha = fade_envelope(s.age, s.life, 0.02, 0.5);
                    surface.set_global_alpha(alpha);
                    surface.begin_path();
                    surface.circle(s.x, s.y, 1.6);
                    surface.fill();
                }
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Firework
    }
}

const HALLOWEEN_GLYPHS: &[&str] = &["🎃", "👻", "🦇", "🕸️"];

enum HalloweenMode {
    /// Glyph falls with a sway like a leaf.
    Falling,
    /// Spider descends on a thread and dangles at a stop line.
    SpiderDrop { stop_y: f32, dangle_phase: f32 },
}

/// Seasonal emoji glyph. Two behaviors share the variant: falling emoji
/// and spiders dropping on threads.
pub struct HalloweenEmoji {
    x: f32,
    y: f32,
    vy: f32,
    sway_phase: f32,
    sway_amp: f32,
    glyph: &'static str,
    size_px: f32,
    mode: HalloweenMode,
    age: f32,
    life: f32,
    alive: bool,
}

impl HalloweenEmoji {
    pub fn new(w: f32, _h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: rng.range(-38.0, -8.0),
            vy: rng.range(40.0, 100.0),
            sway_phase: rng.range(0.0, std::f32::consts::TAU),
            sway_amp: rng.range(16.0, 40.0),
            glyph: rng.pick(HALLOWEEN_GLYPHS).copied().unwrap_or("🎃"),
            size_px: rng.range(18.0, 30.0),
            mode: HalloweenMode::Falling,
            age: 0.0,
            life: life_s * rng.range(0.7, 1.0),
            alive: true,
        }
    }

    pub fn spider_drop(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: -10.0,
            vy: rng.range(90.0, 180.0),
            sway_phase: rng.range(0.0, std::f32::consts::TAU),
            sway_amp: 0.0,
            glyph: "🕷️",
            size_px: rng.range(16.0, 26.0),
            mode: HalloweenMode::SpiderDrop {
                stop_y: rng.range(h * 0.2, h * 0.6),
                dangle_phase: rng.range(0.0, std::f32::consts::TAU),
            },
            age: 0.0,
            life: life_s * rng.range(0.8, 1.0),
            alive: true,
        }
    }
}

impl Particle for HalloweenEmoji {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        match &mut self.mode {
            HalloweenMode::Falling => {
                self.sway_phase += 1.4 * dt;
                self.x += wobble(self.sway_phase, self.sway_amp) * dt;
                self.y += self.vy * dt;
                if out_of_bounds(self.x, self.y, w, h, 40.0) {
                    self.alive = false;
                }
            }
            HalloweenMode::SpiderDrop { stop_y, dangle_phase } => {
                if self.y < *stop_y {
                    self.y += self.vy * dt;
                } else {
                    *dangle_phase += 2.2 * dt;
                    self.x += dangle_phase.sin() * 6.0 * dt;
                }
            }
        }
        if self.age >= self.life {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.08, 0.15);
        surface.save();
        surface.set_global_alpha(alpha);
        if let HalloweenMode::SpiderDrop { .. } = self.mode {
            surface.set_stroke_color(Rgba::new(0xc8, 0xc8, 0xc8, 0.8));
            surface.set_line_width(1.0);
            surface.begin_path();
            surface.move_to(self.x, 0.0);
            surface.line_to(self.x, self.y);
            surface.stroke();
        }
        surface.set_font(&format!("{}px serif", self.size_px as u32));
        surface.fill_text(self.glyph, self.x - self.size_px * 0.5, self.y);
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Halloween
    }
}

/// Diagonal streak with a trail. `reverse` inverts it into a riser; the
/// optional circular clip kills the star once it leaves a circle centered
/// on the stage.
pub struct FallingStar {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    trail: f32,
    circular_clip: bool,
    age: f32,
    life: f32,
    alive: bool,
}

impl FallingStar {
    pub fn new(
        w: f32,
        h: f32,
        life_s: f32,
        reverse: bool,
        circular_clip: bool,
        rng: &mut FxRng,
    ) -> Self {
        let speed = rng.range(260.0, 520.0);
        let angle = rng.range(0.5, 0.9); // down-right diagonal
        let (vx, vy) = (angle.cos() * speed, angle.sin() * speed);
        let (y, vy) = if reverse {
            (h + rng.range(0.0, 100.0), -vy)
        } else {
            (rng.range(-100.0, 0.0), vy)
        };
        Self {
            x: rng.range(-100.0, w * 0.8),
            y,
            vx,
            vy,
            trail: rng.range(40.0, 110.0),
            circular_clip,
            age: 0.0,
            life: life_s * rng.range(0.5, 1.0),
            alive: true,
        }
    }

    fn clipped_out(&self, w: f32, h: f32) -> bool {
        if !self.circular_clip {
            return false;
        }
        let dx = self.x - w * 0.5;
        let dy = self.y - h * 0.5;
        let r = w.min(h) * 0.5;
        dx * dx + dy * dy > r * r
    }
}

impl Particle for FallingStar {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        if self.age >= self.life
            || out_of_bounds(self.x, self.y, w, h, 120.0)
            || self.clipped_out(w, h)
        {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.12, 0.25);
        let inv = 1.0 / (self.vx * self.vx + self.vy * self.vy).sqrt().max(1.0);
        let (tx, ty) = (-self.vx * inv * self.trail, -self.vy * inv * self.trail);
        surface.save();
        surface.set_global_alpha(alpha);
        surface.set_stroke_color(Rgba::opaque(0xff, 0xf2, 0xc8));
        surface.set_line_width(1.6);
        surface.begin_path();
        surface.move_to(self.x, self.y);
        surface.line_to(self.x + tx, self.y + ty);
        surface.stroke();
        surface.set_fill_color(Rgba::WHITE);
        surface.begin_path();
        surface.circle(self.x, self.y, 2.0);
        surface.fill();
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::FallingStar
    }
}
