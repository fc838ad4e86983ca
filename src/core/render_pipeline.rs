use glam::Mat4;

use super::window::WindowDimensions;
use crate::batch::VertexBatch;
use crate::render_state::RenderFlags;
use crate::shapes::ShapeKind;

/// RGBA colour, components in 0..1
pub type Color = [f32; 4];

pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];

/// Rendering backend: draws a batch in a single flat colour under a combined
/// model-view-projection transform.
pub trait FlatShader {
    type Error;

    /// Viewport changed size
    fn resize(&mut self, _dimensions: WindowDimensions) {}

    /// Start collecting draws for a new frame
    fn begin_frame(&mut self) {}

    /// Draw `batch` (the batch registered for `shape`) with the given flags
    fn draw_flat(
        &mut self,
        shape: ShapeKind,
        batch: &VertexBatch,
        mvp: &Mat4,
        color: Color,
        flags: &RenderFlags,
    );

    /// Submit and present everything drawn since `begin_frame`
    fn end_frame(&mut self) -> Result<(), Self::Error>;
}
