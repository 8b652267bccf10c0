//! Clock geometry, generated once at startup.
//!
//! All shapes live in normalized device coordinates: the face discs are
//! centered on the origin and the hand points along local +X from the pivot.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

use crate::config::ClockConfig;

/// A single 3D position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { pos: [x, y, z] }
    }

    /// Three tightly packed floats at attribute location 0.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// How the vertices of a [`VertexSet`] form triangles.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    /// Vertex 0 plus each consecutive pair forms a triangle.
    TriangleFan,
    /// Every three vertices form an independent triangle.
    TriangleList,
}

/// An ordered, immutable sequence of vertices with its topology.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexSet {
    vertices: Vec<Vertex>,
    topology: Topology,
}

impl VertexSet {
    pub fn new(vertices: Vec<Vertex>, topology: Topology) -> Self {
        Self { vertices, topology }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Size of the vertex data in bytes.
    pub fn byte_len(&self) -> usize {
        std::mem::size_of_val(self.vertices.as_slice())
    }

    /// Number of triangles the set describes.
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::TriangleFan => self.vertices.len().saturating_sub(2),
            Topology::TriangleList => self.vertices.len() / 3,
        }
    }
}

/// Builds a disc as a closed triangle fan.
///
/// Layout: the center, then `sides + 1` perimeter points at `θᵢ = i / sides · 2π`
/// for `i` in `0..=sides`. The last point repeats the first so the fan closes
/// without a seam.
pub fn disc_fan(sides: u32, radius: f32) -> VertexSet {
    let mut vertices = Vec::with_capacity(sides as usize + 2);
    vertices.push(Vertex::new(0.0, 0.0, 0.0));

    for i in 0..=sides {
        let theta = i as f32 / sides as f32 * TAU;
        vertices.push(Vertex::new(radius * theta.cos(), radius * theta.sin(), 0.0));
    }

    VertexSet::new(vertices, Topology::TriangleFan)
}

/// Hand outline: a short pointed base at the pivot and a long narrow shaft to x = 0.8.
const HAND_VERTICES: [Vertex; 9] = [
    // base
    Vertex::new(0.0, 0.0, 0.0),
    Vertex::new(0.05, 0.01, 0.0),
    Vertex::new(0.05, -0.01, 0.0),
    // shaft
    Vertex::new(0.05, 0.01, 0.0),
    Vertex::new(0.8, 0.01, 0.0),
    Vertex::new(0.8, -0.01, 0.0),
    Vertex::new(0.8, -0.01, 0.0),
    Vertex::new(0.05, -0.01, 0.0),
    Vertex::new(0.05, 0.01, 0.0),
];

/// The clock hand as a flat triangle list (3 triangles, 9 vertices).
pub fn hand_polygon() -> VertexSet {
    VertexSet::new(HAND_VERTICES.to_vec(), Topology::TriangleList)
}

/// Expands a fan of `vertex_count` vertices into triangle-list indices.
///
/// Produces `(0, i, i + 1)` for every `i` in `1..vertex_count - 1`. Callers keep
/// `vertex_count` within `u16` range (see [`ClockConfig::MAX_SIDES`]).
pub fn fan_indices(vertex_count: usize) -> Vec<u16> {
    if vertex_count < 3 {
        return Vec::new();
    }

    let mut indices = Vec::with_capacity((vertex_count - 2) * 3);
    for i in 1..vertex_count - 1 {
        indices.extend_from_slice(&[0, i as u16, (i + 1) as u16]);
    }
    indices
}

/// All vertex sets the clock draws.
#[derive(Debug, Clone)]
pub struct ClockGeometry {
    pub outer: VertexSet,
    pub inner: VertexSet,
    pub hand: VertexSet,
}

impl ClockGeometry {
    /// Generates the rim disc, face disc and hand for `config`.
    ///
    /// Both discs share the same angle sequence so the inner one sits exactly
    /// concentric over the outer one.
    pub fn generate(config: &ClockConfig) -> Self {
        Self {
            outer: disc_fan(config.sides, config.outer_radius),
            inner: disc_fan(config.sides, config.inner_radius),
            hand: hand_polygon(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPS)
    }

    // ── disc_fan ──────────────────────────────────────────────────────────

    #[test]
    fn fan_has_sides_plus_two_points() {
        for sides in [3, 4, 40, 100] {
            assert_eq!(disc_fan(sides, 1.0).len(), sides as usize + 2);
        }
    }

    #[test]
    fn fan_starts_at_origin() {
        assert_eq!(disc_fan(40, 0.8).vertices()[0], Vertex::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn fan_closes_on_first_perimeter_point() {
        let fan = disc_fan(40, 1.0);
        let v = fan.vertices();
        assert!(approx(v[1].pos, v[41].pos));
    }

    #[test]
    fn fan_points_follow_angle_sequence() {
        let r = 0.8;
        let fan = disc_fan(40, r);
        for (i, v) in fan.vertices().iter().enumerate().skip(1) {
            let theta = TAU * (i - 1) as f32 / 40.0;
            assert!(
                approx(v.pos, [r * theta.cos(), r * theta.sin(), 0.0]),
                "point {i} is {:?}",
                v.pos
            );
        }
    }

    #[test]
    fn fan_topology_and_triangles() {
        let fan = disc_fan(40, 1.0);
        assert_eq!(fan.topology(), Topology::TriangleFan);
        assert_eq!(fan.triangle_count(), 40);
        assert_eq!(fan.byte_len(), 42 * 12);
    }

    // ── hand_polygon ──────────────────────────────────────────────────────

    #[test]
    fn hand_has_nine_points() {
        let hand = hand_polygon();
        assert_eq!(hand.len(), 9);
        assert_eq!(hand.triangle_count(), 3);
        assert_eq!(hand.topology(), Topology::TriangleList);
    }

    #[test]
    fn hand_spans_pivot_to_tip() {
        let hand = hand_polygon();
        let max_x = hand.vertices().iter().map(|v| v.pos[0]).fold(f32::MIN, f32::max);
        let min_x = hand.vertices().iter().map(|v| v.pos[0]).fold(f32::MAX, f32::min);
        assert_eq!((min_x, max_x), (0.0, 0.8));
        assert!(hand.vertices().iter().all(|v| v.pos[1].abs() <= 0.01 && v.pos[2] == 0.0));
    }

    // ── fan_indices ───────────────────────────────────────────────────────

    #[test]
    fn fan_indices_expand_to_triangle_list() {
        assert_eq!(fan_indices(5), vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn fan_indices_count_matches_fan() {
        let fan = disc_fan(40, 1.0);
        let indices = fan_indices(fan.len());
        assert_eq!(indices.len(), fan.triangle_count() * 3);
        assert_eq!(indices.iter().copied().max(), Some(41));
    }

    #[test]
    fn fan_indices_degenerate_input_is_empty() {
        assert!(fan_indices(0).is_empty());
        assert!(fan_indices(2).is_empty());
    }

    // ── ClockGeometry ─────────────────────────────────────────────────────

    #[test]
    fn generated_discs_are_concentric() {
        let g = ClockGeometry::generate(&ClockConfig::default());
        assert_eq!(g.outer.len(), g.inner.len());
        for (o, i) in g.outer.vertices().iter().zip(g.inner.vertices()).skip(1) {
            // Same direction, radii 1.0 and 0.8.
            assert!(approx([o.pos[0] * 0.8, o.pos[1] * 0.8, 0.0], i.pos));
        }
    }
}
