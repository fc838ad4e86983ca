//! Hexagon laid out for a triangle fan
use std::f32::consts::TAU;

/// Number of ring points around the fan centre
pub const SIDES: usize = 6;

/// Centre + ring + closing vertex
pub const VERTEX_COUNT: usize = SIDES + 2;

/// Depth of the ring points
pub const RING_DEPTH: f32 = -0.5;

/// Hexagon fan: the origin, six ring points at `k * 60°`, then a closing
/// vertex at `(radius, 0, 0)` that repeats the first ring point's x/y at z = 0.
pub fn hexagon(radius: f32) -> Vec<[f32; 3]> {
    let step = TAU / SIDES as f32;

    let ring = (0..SIDES).map(|k| {
        let angle = k as f32 * step;
        [angle.cos() * radius, angle.sin() * radius, RING_DEPTH]
    });

    std::iter::once([0.0, 0.0, 0.0])
        .chain(ring)
        .chain(std::iter::once([radius, 0.0, 0.0]))
        .collect()
}
