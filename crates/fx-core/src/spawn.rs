//! Per-effect particle batch construction.
//!
//! Each function is pure: merged config + stage size + RNG in, particle
//! batch out. Handlers on the web side only glue these to the pool, which
//! keeps every particle effect fully exercisable in native tests.

use crate::config::{ConfigValue, Motion};
use crate::particles::{
    Bubble, Confetti, Droplet, Dust, Egg, Ember, FallingStar, Firework, Flame, Glitter,
    HalloweenEmoji, Leaf, Particle, Rain, Smoke, Snow, Snowflake, Sparkle, Wind,
};
use crate::rng::FxRng;

const MAX_COUNT: f64 = 2000.0;

fn count(cfg: &ConfigValue, default: f64, motion: Motion) -> usize {
    let raw = cfg.number_clamped("count", default, 0.0, MAX_COUNT) as usize;
    motion.scale_count(raw)
}

/// Lifetime in seconds derived from `durationMs`, reduced-motion scaled.
fn life_s(cfg: &ConfigValue, default_ms: f64, motion: Motion) -> f32 {
    let ms = cfg.number_clamped("durationMs", default_ms, 50.0, 120_000.0);
    (motion.scale_duration_ms(ms) / 1000.0) as f32
}

type Batch = Vec<Box<dyn Particle>>;

fn batch_of(n: usize, mut make: impl FnMut() -> Box<dyn Particle>) -> Batch {
    (0..n).map(|_| make()).collect()
}

pub fn spawn_confetti(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 3000.0, motion);
    let size_min = cfg.number_clamped("sizeMin", 6.0, 1.0, 64.0) as f32;
    let size_max = cfg.number_clamped("sizeMax", 12.0, size_min as f64, 64.0) as f32;
    batch_of(count(cfg, 120.0, motion), || {
        Box::new(Confetti::new(w, h, life, size_min, size_max, rng))
    })
}

pub fn spawn_sparkle(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 2500.0, motion);
    batch_of(count(cfg, 40.0, motion), || Box::new(Sparkle::new(w, h, life, rng)))
}

pub fn spawn_glitter(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 2800.0, motion);
    batch_of(count(cfg, 90.0, motion), || Box::new(Glitter::new(w, h, life, rng)))
}

pub fn spawn_dust(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 9000.0, motion);
    batch_of(count(cfg, 50.0, motion), || Box::new(Dust::new(w, h, life, rng)))
}

pub fn spawn_rain(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 4000.0, motion);
    let slant = cfg.number_clamped("slant", 0.18, -1.0, 1.0) as f32;
    batch_of(count(cfg, 140.0, motion), || {
        Box::new(Rain::new(w, h, life, slant, rng))
    })
}

pub fn spawn_smoke(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 5000.0, motion);
    batch_of(count(cfg, 30.0, motion), || Box::new(Smoke::new(w, h, life, rng)))
}

pub fn spawn_snow(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 8000.0, motion);
    batch_of(count(cfg, 110.0, motion), || Box::new(Snow::new(w, h, life, rng)))
}

pub fn spawn_snowflakes(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 9000.0, motion);
    batch_of(count(cfg, 36.0, motion), || {
        Box::new(Snowflake::new(w, h, life, rng))
    })
}

pub fn spawn_bubbles(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 6000.0, motion);
    batch_of(count(cfg, 45.0, motion), || Box::new(Bubble::new(w, h, life, rng)))
}

pub fn spawn_leaves(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 8000.0, motion);
    batch_of(count(cfg, 40.0, motion), || Box::new(Leaf::new(w, h, life, rng)))
}

pub fn spawn_eggs(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 5000.0, motion);
    batch_of(count(cfg, 24.0, motion), || Box::new(Egg::new(w, h, life, rng)))
}

pub fn spawn_fire(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 3500.0, motion);
    let origin = cfg.number_clamped("originYFrac", 0.95, 0.0, 1.0) as f32;
    batch_of(count(cfg, 80.0, motion), || {
        Box::new(Flame::new(w, h, life, origin, rng))
    })
}

pub fn spawn_water(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 3000.0, motion);
    batch_of(count(cfg, 70.0, motion), || Box::new(Droplet::new(w, h, life, rng)))
}

pub fn spawn_wind(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 4000.0, motion);
    let speed = cfg.number_clamped("speed", 900.0, 100.0, 4000.0) as f32;
    batch_of(count(cfg, 50.0, motion), || {
        Box::new(Wind::new(w, h, life, speed, rng))
    })
}

pub fn spawn_embers(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 7000.0, motion);
    batch_of(count(cfg, 60.0, motion), || Box::new(Ember::new(w, h, life, rng)))
}

pub fn spawn_fireworks(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 5000.0, motion);
    let sparks = cfg.number_clamped("sparksPerShell", 48.0, 8.0, 256.0) as usize;
    batch_of(count(cfg, 6.0, motion), || {
        Box::new(Firework::new(w, h, life, sparks, rng))
    })
}

pub fn spawn_halloween(cfg: &ConfigValue, w: f32, h: f32, motion: Motion, rng: &mut FxRng) -> Batch {
    let life = life_s(cfg, 7000.0, motion);
    let spiders = cfg.string("mode", "emoji") == "spiderDrop";
    batch_of(count(cfg, 28.0, motion), || {
        if spiders {
            Box::new(HalloweenEmoji::spider_drop(w, h, life, rng)) as Box<dyn Particle>
        } else {
            Box::new(HalloweenEmoji::new(w, h, life, rng))
        }
    })
}

pub fn spawn_falling_stars(
    cfg: &ConfigValue,
    w: f32,
    h: f32,
    motion: Motion,
    rng: &mut FxRng,
) -> Batch {
    let life = life_s(cfg, 6000.0, motion);
    let reverse = cfg.boolean("reverse", false);
    let clip = cfg.boolean("circularClip", false);
    batch_of(count(cfg, 16.0, motion), || {
        Box::new(FallingStar::new(w, h, life, reverse, clip, rng))
    })
}

/// Dispatch on a canonical particle-effect name. `None` for effects that
/// are not particle-backed.
pub fn spawn_for(
    name: &str,
    cfg: &ConfigValue,
    w: f32,
    h: f32,
    motion: Motion,
    rng: &mut FxRng,
) -> Option<Batch> {
    let batch = match name {
        "confetti" => spawn_confetti(cfg, w, h, motion, rng),
        "sparkle" => spawn_sparkle(cfg, w, h, motion, rng),
        "glitter" => spawn_glitter(cfg, w, h, motion, rng),
        "dust" => spawn_dust(cfg, w, h, motion, rng),
        "rain" => spawn_rain(cfg, w, h, motion, rng),
        "smoke" => spawn_smoke(cfg, w, h, motion, rng),
        "snow" => spawn_snow(cfg, w, h, motion, rng),
        "snowflakes" => spawn_snowflakes(cfg, w, h, motion, rng),
        "bubbles" => spawn_bubbles(cfg, w, h, motion, rng),
        "leaves" => spawn_leaves(cfg, w, h, motion, rng),
        "eggs" => spawn_eggs(cfg, w, h, motion, rng),
        "fire" => spawn_fire(cfg, w, h, motion, rng),
        "water" => spawn_water(cfg, w, h, motion, rng),
        "wind" => spawn_wind(cfg, w, h, motion, rng),
        "embers" => spawn_embers(cfg, w, h, motion, rng),
        "fireworks" => spawn_fireworks(cfg, w, h, motion, rng),
        "halloween" => spawn_halloween(cfg, w, h, motion, rng),
        "fallingStars" => spawn_falling_stars(cfg, w, h, motion, rng),
        _ => return None,
    };
    Some(batch)
}
