// Spawn-function coverage: every particle effect builds a batch, counts
// honor the reduced-motion policy, and variant tags line up.

use fx_core::catalog::{defaults_for, is_particle_effect, EFFECT_NAMES};
use fx_core::config::{ConfigValue, Motion};
use fx_core::particles::ParticleKind;
use fx_core::rng::FxRng;
use fx_core::spawn::{spawn_falling_stars, spawn_for};
use fx_core::surface::NullSurface;

#[test]
fn every_particle_effect_spawns_and_nothing_else_does() {
    let mut rng = FxRng::seeded(1);
    for name in EFFECT_NAMES {
        let cfg = defaults_for(name);
        let batch = spawn_for(name, &cfg, 800.0, 600.0, Motion::default(), &mut rng);
        if is_particle_effect(name) {
            let batch = batch.unwrap_or_else(|| panic!("{name} spawned nothing"));
            assert!(!batch.is_empty(), "{name} spawned an empty batch");
            assert!(batch.iter().all(|p| p.is_alive()));
        } else {
            assert!(batch.is_none(), "{name} is not particle-backed");
        }
    }
}

#[test]
fn counts_follow_config_and_reduced_motion() {
    let mut rng = FxRng::seeded(2);
    let cfg = ConfigValue::obj(vec![("count", ConfigValue::num(100.0))]);
    let full = spawn_for("snow", &cfg, 800.0, 600.0, Motion { reduced: false }, &mut rng).unwrap();
    assert_eq!(full.len(), 100);
    let reduced =
        spawn_for("snow", &cfg, 800.0, 600.0, Motion { reduced: true }, &mut rng).unwrap();
    assert_eq!(reduced.len(), 40);
}

#[test]
fn variant_tags_match_their_effect() {
    let mut rng = FxRng::seeded(3);
    let cases = [
        ("confetti", ParticleKind::Confetti),
        ("rain", ParticleKind::Rain),
        ("snowflakes", ParticleKind::Snowflake),
        ("fireworks", ParticleKind::Firework),
        ("halloween", ParticleKind::Halloween),
        ("embers", ParticleKind::Ember),
    ];
    for (name, kind) in cases {
        let cfg = defaults_for(name);
        let batch = spawn_for(name, &cfg, 800.0, 600.0, Motion::default(), &mut rng).unwrap();
        assert!(batch.iter().all(|p| p.kind() == kind), "{name}");
    }
}

#[test]
fn nan_count_falls_back_to_the_default() {
    let mut rng = FxRng::seeded(4);
    let cfg = ConfigValue::obj(vec![("count", ConfigValue::num(f64::NAN))]);
    let batch = spawn_for("sparkle", &cfg, 800.0, 600.0, Motion::default(), &mut rng).unwrap();
    assert_eq!(batch.len(), 40, "sparkle default count");
}

#[test]
fn reversed_stars_rise() {
    let mut rng = FxRng::seeded(6);
    let cfg = ConfigValue::obj(vec![
        ("count", ConfigValue::num(12.0)),
        ("durationMs", ConfigValue::num(60000.0)),
        ("reverse", ConfigValue::Bool(true)),
    ]);
    let mut batch = spawn_falling_stars(&cfg, 800.0, 600.0, Motion::default(), &mut rng);
    let mut surface = fx_core::surface::TraceSurface::default();
    // first frame: heads at their spawn height
    for p in batch.iter_mut() {
        p.update(1.0 / 60.0, 800.0, 600.0);
        p.draw(&mut surface);
    }
    let first: Vec<f32> = surface.lines.iter().map(|&(_, y)| y).collect();
    surface.lines.clear();
    for _ in 0..30 {
        for p in batch.iter_mut() {
            p.update(1.0 / 60.0, 800.0, 600.0);
        }
    }
    for p in batch.iter() {
        if p.is_alive() {
            p.draw(&mut surface);
        }
    }
    assert!(!surface.lines.is_empty(), "all stars died unexpectedly fast");
    let later_min = surface.lines.iter().map(|&(_, y)| y).fold(f32::MAX, f32::min);
    let first_min = first.iter().copied().fold(f32::MAX, f32::min);
    assert!(
        later_min < first_min,
        "reversed stars should rise: {later_min} vs {first_min}"
    );
}

#[test]
fn circular_clip_kills_stars_outside_the_center_circle() {
    let mut rng = FxRng::seeded(7);
    let cfg = ConfigValue::obj(vec![
        ("count", ConfigValue::num(20.0)),
        ("durationMs", ConfigValue::num(60000.0)),
        ("circularClip", ConfigValue::Bool(true)),
    ]);
    let mut batch = spawn_falling_stars(&cfg, 800.0, 600.0, Motion::default(), &mut rng);
    let mut surface = NullSurface;
    let mut ps = fx_core::particles::ParticleSystem::new();
    ps.add_particles(batch.drain(..).collect());
    // long simulation: every star eventually exits the circle and dies
    for _ in 0..60 * 20 {
        ps.update_and_draw(&mut surface, 1.0 / 60.0, 800.0, 600.0);
        if ps.is_empty() {
            break;
        }
    }
    assert!(ps.is_empty());
}
