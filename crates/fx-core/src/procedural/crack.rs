//! Fractal crack propagation.
//!
//! A crack is a root point with 8–20 rays; each ray recursively grows 0–2
//! branches per level down to a configured depth. The tree is generated
//! once per impact and animated by advancing a shared `progress` scalar;
//! drawing re-renders the whole tree with fresh per-segment jitter while
//! `progress < 1`, after which the tree is static.

use glam::Vec2;
use smallvec::SmallVec;

use crate::kinetics::smoothstep;
use crate::rng::FxRng;
use crate::surface::{Rgba, Surface};

#[derive(Clone, Debug)]
pub struct CrackParams {
    pub ray_min: usize,
    pub ray_max: usize,
    pub branch_depth: u32,
    /// Bound on per-segment lateral jitter, logical px.
    pub jaggedness: f32,
    pub shard_chance: f32,
    /// Base ray length before the intensity scale.
    pub ray_length: f32,
}

impl Default for CrackParams {
    fn default() -> Self {
        Self {
            ray_min: 8,
            ray_max: 20,
            branch_depth: 3,
            jaggedness: 3.0,
            shard_chance: 0.3,
            ray_length: 90.0,
        }
    }
}

/// One ray or branch. `attach` is the fraction along the parent where this
/// segment starts (0 for root rays).
#[derive(Clone, Debug)]
pub struct CrackSegment {
    pub angle: f32,
    pub length: f32,
    pub attach: f32,
    pub branches: SmallVec<[Box<CrackSegment>; 2]>,
}

#[derive(Clone, Debug)]
pub struct CrackTree {
    pub origin: Vec2,
    pub rays: Vec<CrackSegment>,
}

impl CrackTree {
    pub fn generate(origin: Vec2, intensity: f32, params: &CrackParams, rng: &mut FxRng) -> Self {
        let intensity = intensity.clamp(0.2, 3.0);
        let count = rng.range_i(params.ray_min as i64, params.ray_max as i64) as usize;
        let rays = (0..count)
            .map(|i| {
                // even fan plus jitter keeps rays from clumping
                let base = i as f32 * std::f32::consts::TAU / count as f32;
                let angle = base + rng.range(-0.25, 0.25);
                let length = params.ray_length * intensity * rng.range(0.5, 1.4);
                grow(angle, length, 0.0, 0, params, rng)
            })
            .collect();
        Self { origin, rays }
    }

    /// Longest branch chain below any ray root.
    pub fn max_depth(&self) -> u32 {
        fn depth(seg: &CrackSegment) -> u32 {
            seg.branches.iter().map(|b| 1 + depth(b)).max().unwrap_or(0)
        }
        self.rays.iter().map(depth).max().unwrap_or(0)
    }

    /// Re-render the tree at the given growth progress.
    ///
    /// Jitter is re-rolled every call; the shimmer while the crack grows is
    /// part of the look.
    pub fn draw(&self, surface: &mut dyn Surface, progress: f32, params: &CrackParams, rng: &mut FxRng) {
        let eased = smoothstep(progress.clamp(0.0, 1.0));
        surface.save();
        surface.set_stroke_color(Rgba::new(0xf2, 0xf6, 0xfa, 0.9));
        for ray in &self.rays {
            draw_segment(surface, self.origin, ray, eased, params, rng);
        }
        surface.restore();
    }
}

fn grow(
    angle: f32,
    length: f32,
    attach: f32,
    depth: u32,
    params: &CrackParams,
    rng: &mut FxRng,
) -> CrackSegment {
    let mut branches = SmallVec::new();
    if depth < params.branch_depth {
        let n = rng.range_i(0, 2);
        for _ in 0..n {
            let child_angle = angle + rng.range(-0.9, 0.9);
            let child_len = length * rng.range(0.3, 0.7);
            let child_attach = rng.range(0.3, 0.8);
            branches.push(Box::new(grow(
                child_angle,
                child_len,
                child_attach,
                depth + 1,
                params,
                rng,
            )));
        }
    }
    CrackSegment {
        angle,
        length,
        attach,
        branches,
    }
}

const JITTER_STEPS: usize = 7;

fn draw_segment(
    surface: &mut dyn Surface,
    start: Vec2,
    seg: &CrackSegment,
    progress: f32,
    params: &CrackParams,
    rng: &mut FxRng,
) {
    let dir = Vec2::new(seg.angle.cos(), seg.angle.sin());
    let normal = dir.perp();
    let visible = seg.length * progress;
    if visible <= 0.5 {
        return;
    }

    // jittered polyline
    let mut pts: SmallVec<[Vec2; JITTER_STEPS + 1]> = SmallVec::new();
    pts.push(start);
    for i in 1..=JITTER_STEPS {
        let t = i as f32 / JITTER_STEPS as f32;
        let lateral = rng.range(-params.jaggedness, params.jaggedness);
        pts.push(start + dir * (visible * t) + normal * lateral);
    }
    surface.set_line_width(1.1);
    surface.begin_path();
    surface.move_to(pts[0].x, pts[0].y);
    for p in &pts[1..] {
        surface.line_to(p.x, p.y);
    }
    surface.stroke();

    // low-alpha shard polygon, probability gated
    if rng.chance(params.shard_chance) {
        let spread = normal * (params.jaggedness * 2.5);
        let mid = start + dir * (visible * 0.55);
        surface.set_fill_color(Rgba::new(0xdd, 0xe8, 0xf0, 0.08));
        surface.begin_path();
        surface.move_to(start.x, start.y);
        surface.line_to(mid.x + spread.x, mid.y + spread.y);
        surface.line_to(start.x + dir.x * visible, start.y + dir.y * visible);
        surface.line_to(mid.x - spread.x, mid.y - spread.y);
        surface.close_path();
        surface.fill();
        surface.set_stroke_color(Rgba::new(0xf2, 0xf6, 0xfa, 0.9));
    }

    // branches appear once the parent has grown past their attach point
    for branch in &seg.branches {
        if progress > branch.attach {
            let branch_start = start + dir * (seg.length * branch.attach);
            let local = ((progress - branch.attach) / (1.0 - branch.attach)).clamp(0.0, 1.0);
            draw_segment(surface, branch_start, branch, local, params, rng);
        }
    }
}

/// How many impact points should exist `t_ms` after the effect started,
/// given `count` impacts spread over the first 60% of `duration_ms`.
///
/// Pure so the cracked-glass origin-count guarantee is testable without a
/// DOM.
pub fn impacts_due(count: usize, duration_ms: f64, t_ms: f64) -> usize {
    if count == 0 || duration_ms <= 0.0 {
        return 0;
    }
    let window = duration_ms * 0.6;
    if t_ms >= window {
        return count;
    }
    let interval = window / count as f64;
    ((t_ms / interval).floor() as usize + 1).min(count)
}
