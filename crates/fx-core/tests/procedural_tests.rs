// Generator invariants: crack depth bounds, lattice containment, impact
// scheduling.

use glam::Vec2;

use fx_core::procedural::crack::{impacts_due, CrackParams, CrackTree};
use fx_core::procedural::lattice::{EdgeKind, LatticeParams, WebLattice};
use fx_core::rng::FxRng;
use fx_core::surface::TraceSurface;

#[test]
fn crack_branch_chains_respect_the_depth_bound() {
    for seed in 0..64 {
        let mut rng = FxRng::seeded(seed);
        let params = CrackParams {
            branch_depth: 3,
            ..CrackParams::default()
        };
        let tree = CrackTree::generate(Vec2::new(100.0, 100.0), 1.0, &params, &mut rng);
        assert!(tree.max_depth() <= 3, "seed {seed}: depth {}", tree.max_depth());
        assert!((8..=20).contains(&tree.rays.len()), "seed {seed}");
    }
}

#[test]
fn crack_depth_zero_means_bare_rays() {
    let mut rng = FxRng::seeded(3);
    let params = CrackParams {
        branch_depth: 0,
        ..CrackParams::default()
    };
    let tree = CrackTree::generate(Vec2::ZERO, 1.5, &params, &mut rng);
    assert_eq!(tree.max_depth(), 0);
    assert!(tree.rays.iter().all(|r| r.branches.is_empty()));
}

#[test]
fn crack_draw_emits_strokes_once_progress_starts() {
    let mut rng = FxRng::seeded(8);
    let params = CrackParams::default();
    let tree = CrackTree::generate(Vec2::new(50.0, 50.0), 1.0, &params, &mut rng);
    let mut surface = TraceSurface::default();
    tree.draw(&mut surface, 0.0, &params, &mut rng);
    assert_eq!(surface.strokes, 0, "nothing visible at zero progress");
    tree.draw(&mut surface, 1.0, &params, &mut rng);
    assert!(surface.strokes >= tree.rays.len());
}

#[test]
fn impact_schedule_reaches_exactly_count() {
    let count = 5;
    let duration = 1000.0;
    let mut seen = 0;
    let mut t = 0.0;
    while t <= duration {
        let due = impacts_due(count, duration, t);
        assert!(due >= seen, "monotonic");
        assert!(due <= count);
        seen = due;
        t += 16.0;
    }
    assert_eq!(seen, count);
    assert_eq!(impacts_due(count, duration, duration * 10.0), count);
    assert_eq!(impacts_due(0, duration, 500.0), 0);
    assert_eq!(impacts_due(count, 0.0, 500.0), 0);
}

#[test]
fn lattice_nodes_stay_inside_the_stage() {
    for seed in 0..32 {
        let mut rng = FxRng::seeded(seed + 100);
        let params = LatticeParams::default();
        let (w, h) = (400.0, 300.0);
        let mut web =
            WebLattice::generate(Vec2::new(200.0, 150.0), &params, w, h, &mut rng);
        web.clamp_to_stage(w, h);
        for n in &web.nodes {
            assert!((0.0..=w).contains(&n.pos.x), "seed {seed}: x = {}", n.pos.x);
            assert!((0.0..=h).contains(&n.pos.y), "seed {seed}: y = {}", n.pos.y);
        }
    }
}

#[test]
fn lattice_edges_reference_valid_nodes_and_adjacent_rings() {
    let mut rng = FxRng::seeded(77);
    let web = WebLattice::generate(
        Vec2::new(160.0, 120.0),
        &LatticeParams::default(),
        320.0,
        240.0,
        &mut rng,
    );
    assert!(!web.nodes.is_empty());
    for e in &web.edges {
        assert!(e.a < web.nodes.len() && e.b < web.nodes.len());
        let (ra, rb) = (web.nodes[e.a].ring, web.nodes[e.b].ring);
        match e.kind {
            EdgeKind::Radial | EdgeKind::Diagonal => assert_eq!(rb, ra + 1),
            EdgeKind::Circumferential => assert_eq!(ra, rb),
        }
    }
}

#[test]
fn lattice_growth_stops_at_a_tiny_stage() {
    let mut rng = FxRng::seeded(5);
    let params = LatticeParams {
        base_radius: 30.0,
        ..LatticeParams::default()
    };
    // center near a corner of a small stage: every spoke exits within a
    // few rings, well before max_rings
    let web = WebLattice::generate(Vec2::new(10.0, 10.0), &params, 60.0, 60.0, &mut rng);
    assert!(web.rings <= 5, "rings = {}", web.rings);
    assert!(web.rings < params.max_rings);
}

#[test]
fn lattice_render_passes_draw_nothing_before_reveal() {
    let mut rng = FxRng::seeded(6);
    let web = WebLattice::generate(
        Vec2::new(100.0, 100.0),
        &LatticeParams::default(),
        200.0,
        200.0,
        &mut rng,
    );
    let mut surface = TraceSurface::default();
    web.draw_main(&mut surface, 0.0, &mut rng);
    assert_eq!(surface.strokes, 0);
    web.draw_main(&mut surface, 1.0, &mut rng);
    assert!(surface.strokes > 0);
}
