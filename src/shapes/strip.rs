//! Cylinder ring laid out for a triangle strip
use std::f32::consts::TAU;

use crate::error::ShapeError;

/// Depth of the front and back rims
pub const FRONT_DEPTH: f32 = -0.5;
pub const BACK_DEPTH: f32 = 0.5;

/// Upper bound on generated vertices (indices are u32, buffers stay small)
pub const MAX_VERTICES: usize = 65_536;

fn validate(step: f32) -> Result<usize, ShapeError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(ShapeError::InvalidStep(step));
    }

    let samples = (TAU / step).floor();
    let count = if samples.is_finite() && samples < u32::MAX as f32 {
        (samples as usize + 1) * 2 + 2
    } else {
        usize::MAX
    };

    if count > MAX_VERTICES {
        return Err(ShapeError::TooManyVertices {
            count,
            max: MAX_VERTICES,
        });
    }

    Ok(count)
}

/// Exact number of vertices `cylinder` emits for `step`:
/// `2 * (floor(2π / step) + 1) + 2`
pub fn vertex_count(step: f32) -> Result<usize, ShapeError> {
    validate(step)
}

/// Cylinder ring: for each sample angle `i * step` in `[0, 2π]` a front/back
/// pair at the same x/y, then a copy of the first pair to seal the ring.
pub fn cylinder(radius: f32, step: f32) -> Result<Vec<[f32; 3]>, ShapeError> {
    let count = validate(step)?;
    let samples = (count - 2) / 2;

    let mut vertices = Vec::with_capacity(count);
    for i in 0..samples {
        let angle = i as f32 * step;
        let x = radius * angle.sin();
        let y = radius * angle.cos();

        vertices.push([x, y, FRONT_DEPTH]);
        vertices.push([x, y, BACK_DEPTH]);
    }

    let [x0, y0, _] = vertices[0];
    let [x1, y1, _] = vertices[1];
    vertices.push([x0, y0, FRONT_DEPTH]);
    vertices.push([x1, y1, BACK_DEPTH]);

    debug_assert_eq!(vertices.len(), count);
    Ok(vertices)
}
