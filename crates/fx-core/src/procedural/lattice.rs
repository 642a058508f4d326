//! Radial spider-web lattice.
//!
//! Ring 0 is `spokes` points evenly spaced by angle around the center;
//! each outer ring's point extends its spoke along a perturbed angle at a
//! radius that grows by a random factor > 1 per ring. A spoke stops
//! growing the first time its next point would fall outside the stage.
//!
//! The four render passes (reflection highlight, fracture band, jittered
//! main stroke, noise hatching) are separate functions so the web layer
//! can composite them on stacked canvases and control blend order without
//! per-pixel blend-mode switches.

use glam::Vec2;

use crate::rng::FxRng;
use crate::surface::{Rgba, Surface};

#[derive(Clone, Debug)]
pub struct LatticeParams {
    pub spokes: usize,
    pub base_radius: f32,
    /// Per-ring radius growth factor range; both ends must exceed 1.
    pub growth_min: f32,
    pub growth_max: f32,
    pub angle_jitter: f32,
    pub max_rings: usize,
    pub circumferential_chance: f32,
    pub diagonal_chance: f32,
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self {
            spokes: 12,
            base_radius: 26.0,
            growth_min: 1.25,
            growth_max: 1.6,
            angle_jitter: 0.09,
            max_rings: 9,
            circumferential_chance: 0.85,
            diagonal_chance: 0.18,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Radial,
    Circumferential,
    Diagonal,
}

#[derive(Clone, Copy, Debug)]
pub struct LatticeEdge {
    pub a: usize,
    pub b: usize,
    pub kind: EdgeKind,
}

#[derive(Clone, Copy, Debug)]
pub struct LatticeNode {
    pub pos: Vec2,
    pub ring: usize,
    pub spoke: usize,
}

#[derive(Clone, Debug)]
pub struct WebLattice {
    pub center: Vec2,
    pub nodes: Vec<LatticeNode>,
    pub edges: Vec<LatticeEdge>,
    pub rings: usize,
}

impl WebLattice {
    pub fn generate(
        center: Vec2,
        params: &LatticeParams,
        stage_w: f32,
        stage_h: f32,
        rng: &mut FxRng,
    ) -> Self {
        let spokes = params.spokes.max(3);
        let mut nodes: Vec<LatticeNode> = Vec::new();
        let mut edges: Vec<LatticeEdge> = Vec::new();

        let inside = |p: Vec2| p.x >= 0.0 && p.x <= stage_w && p.y >= 0.0 && p.y <= stage_h;

        // ring 0: even angular spacing, slight jitter
        let mut angles: Vec<f32> = (0..spokes)
            .map(|i| {
                i as f32 * std::f32::consts::TAU / spokes as f32
                    + rng.range(-params.angle_jitter, params.angle_jitter)
            })
            .collect();
        let mut radii: Vec<f32> = (0..spokes)
            .map(|_| params.base_radius * rng.range(0.9, 1.1))
            .collect();
        // index of the node for (ring, spoke); None once the spoke stopped
        let mut prev_ring: Vec<Option<usize>> = Vec::with_capacity(spokes);
        for s in 0..spokes {
            let p = center + Vec2::new(angles[s].cos(), angles[s].sin()) * radii[s];
            if inside(p) {
                nodes.push(LatticeNode {
                    pos: p,
                    ring: 0,
                    spoke: s,
                });
                prev_ring.push(Some(nodes.len() - 1));
            } else {
                prev_ring.push(None);
            }
        }

        let mut rings = 1;
        for ring in 1..params.max_rings {
            let mut cur_ring: Vec<Option<usize>> = vec![None; spokes];
            let mut grew = false;
            for s in 0..spokes {
                let Some(prev_idx) = prev_ring[s] else { continue };
                angles[s] += rng.range(-params.angle_jitter, params.angle_jitter);
                radii[s] *= rng.range(params.growth_min, params.growth_max);
                let p = center + Vec2::new(angles[s].cos(), angles[s].sin()) * radii[s];
                if !inside(p) {
                    // growth stops for this spoke the first time it exits
                    continue;
                }
                nodes.push(LatticeNode {
                    pos: p,
                    ring,
                    spoke: s,
                });
                let idx = nodes.len() - 1;
                cur_ring[s] = Some(idx);
                grew = true;
                edges.push(LatticeEdge {
                    a: prev_idx,
                    b: idx,
                    kind: EdgeKind::Radial,
                });
            }
            // circumferential edges between angular neighbors on this ring
            for s in 0..spokes {
                let (Some(a), Some(b)) = (cur_ring[s], cur_ring[(s + 1) % spokes]) else {
                    continue;
                };
                if rng.chance(params.circumferential_chance) {
                    edges.push(LatticeEdge {
                        a,
                        b,
                        kind: EdgeKind::Circumferential,
                    });
                }
            }
            // diagonal skips from the previous ring to this ring's next spoke
            for s in 0..spokes {
                let (Some(a), Some(b)) = (prev_ring[s], cur_ring[(s + 1) % spokes]) else {
                    continue;
                };
                if rng.chance(params.diagonal_chance) {
                    edges.push(LatticeEdge {
                        a,
                        b,
                        kind: EdgeKind::Diagonal,
                    });
                }
            }
            if !grew {
                break;
            }
            rings = ring + 1;
            prev_ring = cur_ring;
        }

        Self {
            center,
            nodes,
            edges,
            rings,
        }
    }

    /// Clamp every node into the stage rectangle. Generation already stops
    /// at the boundary; this guards the rendering passes against any
    /// post-resize drift.
    pub fn clamp_to_stage(&mut self, w: f32, h: f32) {
        for n in &mut self.nodes {
            n.pos.x = n.pos.x.clamp(0.0, w);
            n.pos.y = n.pos.y.clamp(0.0, h);
        }
    }

    fn edge_points(&self, e: &LatticeEdge) -> (Vec2, Vec2) {
        (self.nodes[e.a].pos, self.nodes[e.b].pos)
    }

    /// Edges visible at a grow-in fraction: every edge whose outermost
    /// endpoint ring is within the revealed ring count.
    fn visible(&self, e: &LatticeEdge, reveal: f32) -> bool {
        let ring = self.nodes[e.a].ring.max(self.nodes[e.b].ring);
        (ring as f32) < reveal * self.rings as f32
    }

    /// Pass 1: soft directional reflection highlight.
    pub fn draw_reflection(&self, surface: &mut dyn Surface, reveal: f32) {
        let light = Vec2::new(-0.42, -0.91); // fixed light direction
        surface.set_line_width(2.6);
        for e in &self.edges {
            if !self.visible(e, reveal) {
                continue;
            }
            let (a, b) = self.edge_points(e);
            let dir = (b - a).normalize_or_zero();
            // brightest where the edge faces the light
            let facing = dir.perp().dot(light).abs();
            surface.set_stroke_color(Rgba::new(0xff, 0xff, 0xff, 0.05 + 0.18 * facing));
            let off = light * -1.4;
            surface.begin_path();
            surface.move_to(a.x + off.x, a.y + off.y);
            surface.line_to(b.x + off.x, b.y + off.y);
            surface.stroke();
        }
    }

    /// Pass 2: fracture-noise band. Width follows a quadratic falloff from
    /// each endpoint, widest at the ends where stress concentrates.
    pub fn draw_fractures(&self, surface: &mut dyn Surface, reveal: f32, rng: &mut FxRng) {
        surface.set_stroke_color(Rgba::new(0xd2, 0xe4, 0xf2, 0.18));
        for e in &self.edges {
            if !self.visible(e, reveal) {
                continue;
            }
            let (a, b) = self.edge_points(e);
            let dir = (b - a).normalize_or_zero();
            let normal = dir.perp();
            let len = (b - a).length();
            let ticks = (len / 9.0) as usize;
            for i in 0..ticks {
                let t = (i as f32 + 0.5) / ticks as f32;
                let c = 2.0 * t - 1.0;
                let width = 1.0 + 3.2 * c * c; // quadratic endpoint falloff
                let p = a + dir * (len * t);
                let jig = normal * rng.range(-width, width);
                surface.set_line_width(0.7);
                surface.begin_path();
                surface.move_to(p.x - jig.x, p.y - jig.y);
                surface.line_to(p.x + jig.x, p.y + jig.y);
                surface.stroke();
            }
        }
    }

    /// Pass 3: the main line — two to three jittered strokes per edge,
    /// each a quadratic Bézier through a randomly offset midpoint.
    pub fn draw_main(&self, surface: &mut dyn Surface, reveal: f32, rng: &mut FxRng) {
        surface.set_stroke_color(Rgba::new(0xf4, 0xf8, 0xfc, 0.85));
        for e in &self.edges {
            if !self.visible(e, reveal) {
                continue;
            }
            let (a, b) = self.edge_points(e);
            let normal = (b - a).normalize_or_zero().perp();
            let strokes = rng.range_i(2, 3);
            for _ in 0..strokes {
                let mid = (a + b) * 0.5 + normal * rng.range(-2.2, 2.2);
                surface.set_line_width(rng.range(0.5, 1.1));
                surface.begin_path();
                surface.move_to(a.x, a.y);
                surface.quad_to(mid.x, mid.y, b.x, b.y);
                surface.stroke();
            }
        }
    }

    /// Pass 4: sparse noise cross-hatching.
    pub fn draw_noise(&self, surface: &mut dyn Surface, reveal: f32, rng: &mut FxRng) {
        surface.set_stroke_color(Rgba::new(0xff, 0xff, 0xff, 0.10));
        surface.set_line_width(0.5);
        for e in &self.edges {
            if !self.visible(e, reveal) {
                continue;
            }
            let (a, b) = self.edge_points(e);
            let dir = (b - a).normalize_or_zero();
            let normal = dir.perp();
            let len = (b - a).length();
            let mut t = 0.0;
            while t < 1.0 {
                t += rng.range(0.15, 0.45);
                if t >= 1.0 || !rng.chance(0.4) {
                    continue;
                }
                let p = a + dir * (len * t);
                let s = rng.range(1.5, 4.0);
                surface.begin_path();
                surface.move_to(p.x - normal.x * s - dir.x * s, p.y - normal.y * s - dir.y * s);
                surface.line_to(p.x + normal.x * s + dir.x * s, p.y + normal.y * s + dir.y * s);
                surface.stroke();
            }
        }
    }
}
