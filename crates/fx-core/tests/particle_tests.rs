// Pool-level behavior: decay, compaction order, and the documented
// confetti scenario, all driven headlessly through the Surface trait.

use std::cell::RefCell;
use std::rc::Rc;

use fx_core::config::{ConfigValue, Motion};
use fx_core::particles::{Particle, ParticleKind, ParticleSystem, Rain, Wind};
use fx_core::rng::FxRng;
use fx_core::spawn::{spawn_confetti, spawn_snow};
use fx_core::surface::{NullSurface, Surface, TraceSurface};

/// Scripted particle: lives for a fixed number of updates and records the
/// order it was drawn in.
struct Scripted {
    id: u32,
    updates_left: i32,
    drawn: Rc<RefCell<Vec<u32>>>,
}

impl Particle for Scripted {
    fn update(&mut self, _dt: f32, _w: f32, _h: f32) {
        self.updates_left -= 1;
    }
    fn draw(&self, _surface: &mut dyn Surface) {
        self.drawn.borrow_mut().push(self.id);
    }
    fn is_alive(&self) -> bool {
        self.updates_left > 0
    }
    fn kind(&self) -> ParticleKind {
        ParticleKind::Dust
    }
}

#[test]
fn compaction_preserves_survivor_order() {
    let drawn = Rc::new(RefCell::new(Vec::new()));
    let mut ps = ParticleSystem::new();
    let mk = |id, updates_left| -> Box<dyn Particle> {
        Box::new(Scripted {
            id,
            updates_left,
            drawn: drawn.clone(),
        })
    };
    // A dies on the first update, B and D survive it, C dies
    ps.add_particles(vec![mk(1, 1), mk(2, 5), mk(3, 1), mk(4, 5)]);
    let mut surface = NullSurface;
    ps.update_and_draw(&mut surface, 0.016, 800.0, 600.0);
    assert_eq!(ps.len(), 2);
    assert_eq!(*drawn.borrow(), vec![2, 4]);

    drawn.borrow_mut().clear();
    ps.update_and_draw(&mut surface, 0.016, 800.0, 600.0);
    assert_eq!(*drawn.borrow(), vec![2, 4], "relative order must hold");
}

#[test]
fn dead_particles_are_never_drawn_again() {
    let drawn = Rc::new(RefCell::new(Vec::new()));
    let mut ps = ParticleSystem::new();
    ps.add_particles(vec![Box::new(Scripted {
        id: 7,
        updates_left: 3,
        drawn: drawn.clone(),
    })]);
    let mut surface = NullSurface;
    for _ in 0..5 {
        ps.update_and_draw(&mut surface, 0.016, 800.0, 600.0);
    }
    assert_eq!(*drawn.borrow(), vec![7, 7]);
    assert!(!ps.has_active_particles());
}

#[test]
fn add_particles_reports_total_and_ignores_empty() {
    let mut ps = ParticleSystem::new();
    assert_eq!(ps.add_particles(vec![]), 0);
    let drawn = Rc::new(RefCell::new(Vec::new()));
    let total = ps.add_particles(vec![Box::new(Scripted {
        id: 1,
        updates_left: 1,
        drawn,
    })]);
    assert_eq!(total, 1);
}

#[test]
fn clear_where_drops_one_category() {
    let mut rng = FxRng::seeded(11);
    let cfg = ConfigValue::obj(vec![("count", ConfigValue::num(10.0))]);
    let mut ps = ParticleSystem::new();
    ps.add_particles(spawn_confetti(&cfg, 800.0, 600.0, Motion::default(), &mut rng));
    ps.add_particles(spawn_snow(&cfg, 800.0, 600.0, Motion::default(), &mut rng));
    assert_eq!(ps.len(), 20);
    let remaining = ps.clear_where(|p| p.kind() == ParticleKind::Snow);
    assert_eq!(remaining, 10);
    let remaining = ps.clear_where(|p| p.kind() == ParticleKind::Confetti);
    assert_eq!(remaining, 0);
}

#[test]
fn confetti_scenario_160_particles_3500ms() {
    let mut rng = FxRng::seeded(2024);
    let cfg = ConfigValue::obj(vec![
        ("count", ConfigValue::num(160.0)),
        ("durationMs", ConfigValue::num(3500.0)),
    ]);
    let batch = spawn_confetti(&cfg, 800.0, 600.0, Motion::default(), &mut rng);
    assert_eq!(batch.len(), 160, "pool must grow by exactly `count`");

    let mut ps = ParticleSystem::new();
    ps.add_particles(batch);
    assert_eq!(ps.len(), 160);

    let dt = 1.0 / 60.0;
    let mut surface = TraceSurface::default();
    let mut elapsed = 0.0;
    while elapsed < 3.5 + 2.0 * dt {
        ps.update_and_draw(&mut surface, dt, 800.0, 600.0);
        elapsed += dt;
    }
    assert_eq!(ps.len(), 0, "pool must return to its prior size");

    // out-of-bounds expiry margin: nothing is ever drawn below h + 40
    for &(_, y) in &surface.translates {
        assert!(y <= 600.0 + 40.0 + 1e-3, "drawn at y = {y}");
    }
}

#[test]
fn rain_always_expires_after_its_splash() {
    let mut rng = FxRng::seeded(5);
    // lifetime far longer than the fall time: the splash sub-state must
    // still terminate the particle
    let mut drop: Box<dyn Particle> = Box::new(Rain::new(800.0, 600.0, 30.0, 0.15, &mut rng));
    let dt = 1.0 / 60.0;
    let mut elapsed = 0.0;
    while drop.is_alive() && elapsed < 10.0 {
        drop.update(dt, 800.0, 600.0);
        elapsed += dt;
    }
    assert!(!drop.is_alive(), "drop never expired");
    assert!(elapsed < 5.0, "expiry should follow the splash, not the lifetime");
}

#[test]
fn wind_lifetime_covers_a_full_traverse() {
    // even with a tiny configured lifetime, the width-derived floor must
    // let every streak reach the right edge; the head position is
    // recovered from the line_to trace
    let mut rng = FxRng::seeded(9);
    let (w, h) = (1600.0, 900.0);
    for _ in 0..20 {
        let mut streak = Wind::new(w, h, 0.05, 900.0, &mut rng);
        let dt = 1.0 / 60.0;
        let mut surface = TraceSurface::default();
        let mut guard = 0;
        while streak.is_alive() && guard < 100_000 {
            streak.update(dt, w, h);
            if streak.is_alive() {
                streak.draw(&mut surface);
            }
            guard += 1;
        }
        let last_head_x = surface
            .lines
            .iter()
            .fold(f32::MIN, |acc, &(x, _)| acc.max(x));
        assert!(
            last_head_x >= w,
            "streak died at x = {last_head_x}, before traversing the stage"
        );
    }
}
