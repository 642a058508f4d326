//! Weather variants: rain (with a splash sub-state), snow, large drawn
//! snowflakes and horizontal wind streaks.

use crate::kinetics::{fade_envelope, out_of_bounds, wobble};
use crate::rng::FxRng;
use crate::surface::{Rgba, Surface};

use super::{Particle, ParticleKind};

const RAIN_COLOR: Rgba = Rgba::opaque(0xa9, 0xc6, 0xe8);

enum RainState {
    Falling,
    /// Expanding floor ring; once it expires the drop is gone for good.
    Splash { t: f32 },
}

const SPLASH_LIFE: f32 = 0.22;

/// Fast slanted streak that splashes on the floor.
pub struct Rain {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    len: f32,
    state: RainState,
    age: f32,
    life: f32,
    alive: bool,
}

impl Rain {
    pub fn new(w: f32, h: f32, life_s: f32, slant: f32, rng: &mut FxRng) -> Self {
        let vy = rng.range(620.0, 940.0);
        Self {
            x: rng.range(-w * 0.1, w * 1.1),
            y: rng.range(-h, -4.0),
            vx: vy * slant * rng.range(0.8, 1.2),
            vy,
            len: rng.range(9.0, 20.0),
            state: RainState::Falling,
            age: 0.0,
            life: life_s * rng.range(0.8, 1.0),
            alive: true,
        }
    }
}

impl Particle for Rain {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        match &mut self.state {
            RainState::Falling => {
                self.x += self.vx * dt;
                self.y += self.vy * dt;
                if self.y >= h - 1.0 {
                    self.y = h - 1.0;
                    self.state = RainState::Splash { t: 0.0 };
                } else if self.age >= self.life
                    || self.x < -w * 0.15 - 32.0
                    || self.x > w * 1.15 + 32.0
                {
                    // drops start far above the stage, so only the
                    // horizontal margins can expire a falling drop
                    self.alive = false;
                }
            }
            RainState::Splash { t } => {
                *t += dt;
                if *t >= SPLASH_LIFE {
                    self.alive = false;
                }
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        match &self.state {
            RainState::Falling => {
                let alpha = fade_envelope(self.age, self.life, 0.05, 0.1) * 0.8;
                let inv = 1.0 / (self.vx * self.vx + self.vy * self.vy).sqrt().max(1.0);
                surface.set_global_alpha(alpha);
                surface.set_stroke_color(RAIN_COLOR);
                surface.set_line_width(1.2);
                surface.begin_path();
                surface.move_to(self.x, self.y);
                surface.line_to(
                    self.x - self.vx * inv * self.len,
                    self.y - self.vy * inv * self.len,
                );
                surface.stroke();
            }
            RainState::Splash { t } => {
                let k = (t / SPLASH_LIFE).clamp(0.0, 1.0);
                surface.set_global_alpha((1.0 - k) * 0.6);
                surface.set_stroke_color(RAIN_COLOR);
                surface.set_line_width(1.0);
                surface.begin_path();
                surface.ellipse(self.x, self.y, 2.0 + 7.0 * k, (2.0 + 7.0 * k) * 0.35, 0.0);
                surface.stroke();
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Rain
    }
}

/// Soft round flake on a sinusoidal sway.
pub struct Snow {
    x: f32,
    y: f32,
    vy: f32,
    sway_phase: f32,
    sway_freq: f32,
    sway_amp: f32,
    radius: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Snow {
    pub fn new(w: f32, h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: rng.range(-22.0, -4.0),
            vy: rng.range(34.0, 90.0),
            sway_phase: rng.range(0.0, std::f32::consts::TAU),
            sway_freq: rng.range(0.8, 2.0),
            sway_amp: rng.range(14.0, 38.0),
            radius: rng.range(1.5, 4.0),
            age: 0.0,
            life: life_s * rng.range(0.8, 1.0),
            alive: true,
        }
    }
}

impl Particle for Snow {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.sway_phase += self.sway_freq * dt;
        self.x += wobble(self.sway_phase, self.sway_amp) * dt;
        self.y += self.vy * dt;
        if self.age >= self.life || out_of_bounds(self.x, self.y, w, h, 24.0) {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.1, 0.15) * 0.9;
        surface.set_global_alpha(alpha);
        surface.set_fill_color(Rgba::WHITE);
        surface.begin_path();
        surface.circle(self.x, self.y, self.radius);
        surface.fill();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Snow
    }
}

/// Large six-armed flake, slower than [`Snow`], rotates as it falls.
pub struct Snowflake {
    x: f32,
    y: f32,
    vy: f32,
    sway_phase: f32,
    sway_amp: f32,
    size: f32,
    rotation: f32,
    rot_speed: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Snowflake {
    pub fn new(w: f32, _h: f32, life_s: f32, rng: &mut FxRng) -> Self {
        Self {
            x: rng.range(0.0, w),
            y: rng.range(-28.0, -6.0),
            vy: rng.range(20.0, 48.0),
            sway_phase: rng.range(0.0, std::f32::consts::TAU),
            sway_amp: rng.range(16.0, 34.0),
            size: rng.range(7.0, 15.0),
            rotation: rng.range(0.0, std::f32::consts::TAU),
            rot_speed: rng.range(-1.2, 1.2),
            age: 0.0,
            life: life_s * rng.range(0.8, 1.0),
            alive: true,
        }
    }
}

impl Particle for Snowflake {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.sway_phase += 1.1 * dt;
        self.x += wobble(self.sway_phase, self.sway_amp) * dt;
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
        surface.set_global_alpha(alpha * 0.95);
        surface.set_stroke_color(Rgba::WHITE);
        surface.set_line_width(1.2);
        surface.begin_path();
        for arm in 0..6 {
            let a = arm as f32 * std::f32::consts::TAU / 6.0;
            let (dx, dy) = (a.cos() * self.size, a.sin() * self.size);
            surface.move_to(0.0, 0.0);
            surface.line_to(dx, dy);
            // small side barbs
            let bx = dx * 0.6;
            let by = dy * 0.6;
            let (px, py) = (-dy * 0.22, dx * 0.22);
            surface.move_to(bx, by);
            surface.line_to(bx + px, by + py);
            surface.move_to(bx, by);
            surface.line_to(bx - px, by - py);
        }
        surface.stroke();
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Snowflake
    }
}

/// Horizontal streak. The lifetime floor is recomputed from the current
/// stage width every update so a streak can always cross the full screen,
/// whatever the viewport ends up being. Wraps vertically.
pub struct Wind {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    len: f32,
    age: f32,
    life: f32,
    alive: bool,
}

impl Wind {
    pub fn new(_w: f32, h: f32, life_s: f32, speed: f32, rng: &mut FxRng) -> Self {
        let vx = speed * rng.range(0.7, 1.3);
        let len = rng.range(30.0, 90.0);
        Self {
            x: rng.range(-len, 0.0),
            y: rng.range(0.0, h),
            vx,
            vy: rng.range(-14.0, 14.0),
            len,
            age: 0.0,
            life: life_s,
            alive: true,
        }
    }

    /// Seconds needed to traverse the stage plus the streak's own length.
    fn min_life_for(&self, w: f32) -> f32 {
        (w + self.len * 2.0 + 10.0) / self.vx.abs().max(1.0)
    }
}

impl Particle for Wind {
    fn update(&mut self, dt: f32, w: f32, h: f32) {
        self.age += dt;
        self.life = self.life.max(self.min_life_for(w));
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        // wrap vertically, expire horizontally
        if self.y < 0.0 {
            self.y += h;
        } else if self.y > h {
            self.y -= h;
        }
        if self.age >= self.life || self.x - self.len > w + 4.0 {
            self.alive = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let alpha = fade_envelope(self.age, self.life, 0.1, 0.1) * 0.4;
        surface.set_global_alpha(alpha);
        surface.set_stroke_color(Rgba::opaque(0xdc, 0xe6, 0xee));
        surface.set_line_width(1.4);
        surface.begin_path();
        surface.move_to(self.x - self.len, self.y);
        surface.line_to(self.x, self.y);
        surface.stroke();
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ParticleKind {
        ParticleKind::Wind
    }
}
